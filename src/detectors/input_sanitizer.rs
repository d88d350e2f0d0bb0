// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use tracing::info;

use crate::engine::patterns::{first_script_injection, strip_script_injection};
use crate::engine_core::constants::input::{TEXT_TAGS, UNNAMED_FIELD};
use crate::engine_core::constants::notice::SANITIZED_INPUT_MESSAGE;
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::models::NodeId;
use crate::engine_core::registry::Registrations;
use crate::engine_core::traits::{listener, ContentTree, Page, PageEvent, Propagation, Topic};
use crate::notify::Notifier;

use super::{field_label, has_tag, Detector};

/// Cleans script-injection payloads out of text fields as they are typed.
/// Never blocks the keystroke.
pub struct InputSanitizer {
    log: Arc<EventLog>,
}

impl InputSanitizer {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for InputSanitizer {
    fn name(&self) -> &'static str {
        "input_sanitizer"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        let log = self.log.clone();
        let notifier = Notifier::new(registrations.deferred());
        registrations.listen(
            page,
            Topic::Input,
            listener(move |page, event| {
                if let PageEvent::Input { target } = event {
                    sanitize_field(page, *target, &log, &notifier);
                }
                Propagation::Continue
            }),
        )?;
        Ok(())
    }
}

fn sanitize_field(page: &mut dyn Page, field: NodeId, log: &EventLog, notifier: &Notifier) {
    if !has_tag(page, field, &TEXT_TAGS) {
        return;
    }
    let Some(value) = page.value(field) else {
        return;
    };
    let Some(signature) = first_script_injection(&value) else {
        return;
    };

    let label = field_label(page, field, UNNAMED_FIELD);
    info!("Sanitizing field '{}' ({})", label, signature.name);
    log.record(
        EventKind::XssAttempt,
        format!("XSS attempt detected in field: {}", label),
    );

    page.set_value(field, &strip_script_injection(&value));
    notifier.warn(page, SANITIZED_INPUT_MESSAGE);
}
