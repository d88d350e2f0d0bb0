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

use tracing::debug;

use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::registry::Registrations;
use crate::engine_core::traits::{listener, Page, PageEvent, Propagation, Topic};

use super::Detector;

/// Records every CSP violation the browser reports. Never blocks.
pub struct PolicyViolationReporter {
    log: Arc<EventLog>,
}

impl PolicyViolationReporter {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for PolicyViolationReporter {
    fn name(&self) -> &'static str {
        "policy_violation_reporter"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        let log = self.log.clone();
        registrations.listen(
            page,
            Topic::SecurityPolicyViolation,
            listener(move |_, event| {
                if let PageEvent::SecurityPolicyViolation(report) = event {
                    debug!("CSP violation on {}", report.violated_directive);
                    log.record(
                        EventKind::CspViolation,
                        format!(
                            "Blocked URI: {}, Directive: {}",
                            report.blocked_uri, report.violated_directive
                        ),
                    );
                }
                Propagation::Continue
            }),
        )?;
        Ok(())
    }
}
