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

use crate::engine::patterns::has_query_injection;
use crate::engine_core::constants::form::{CONTROL_TAGS, MAX_FIELD_LENGTH, UNKNOWN_ACTION};
use crate::engine_core::constants::input::UNNAMED_FIELD;
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::models::NodeId;
use crate::engine_core::registry::Registrations;
use crate::engine_core::traits::{listener, ContentTree, Page, PageEvent, Propagation, Topic};

use super::{field_label, has_tag, Detector};

/// Checks every control of a form on submit and cancels the submission if
/// any of them fails. All fields are checked, not just the first failure.
pub struct FormValidator {
    log: Arc<EventLog>,
}

impl FormValidator {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for FormValidator {
    fn name(&self) -> &'static str {
        "form_validator"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        let log = self.log.clone();
        registrations.listen(
            page,
            Topic::Submit,
            listener(move |page, event| match event {
                PageEvent::Submit { form } => validate_form(page, *form, &log),
                _ => Propagation::Continue,
            }),
        )?;
        Ok(())
    }
}

fn validate_form(page: &mut dyn Page, form: NodeId, log: &EventLog) -> Propagation {
    let mut failed = false;

    for node in page.descendants(form) {
        if !has_tag(page, node, &CONTROL_TAGS) {
            continue;
        }
        let value = page.value(node).unwrap_or_default();
        if value.is_empty() {
            continue;
        }

        if value.encode_utf16().count() > MAX_FIELD_LENGTH {
            log.record(
                EventKind::OversizedInput,
                format!(
                    "Input too long in field: {}",
                    field_label(page, node, UNNAMED_FIELD)
                ),
            );
            failed = true;
        }
        if has_query_injection(&value) {
            log.record(
                EventKind::SqlInjectionAttempt,
                format!(
                    "Potential SQL injection in field: {}",
                    field_label(page, node, UNNAMED_FIELD)
                ),
            );
            failed = true;
        }
    }

    if !failed {
        return Propagation::Continue;
    }

    let action = page
        .attribute(form, "action")
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| UNKNOWN_ACTION.to_string());
    info!("Cancelled submission to {}", action);
    log.record(
        EventKind::FormValidationFailed,
        format!("Form validation failed for: {}", action),
    );
    Propagation::PreventDefault
}
