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

//! Detectors.
//!
//! Each detector observes one class of page activity and appends what it
//! finds to the shared event log. Detectors never reference each other.

pub mod content_scanner;
pub mod devtools;
pub mod form_validator;
pub mod frame_guard;
pub mod input_sanitizer;
pub mod policy_violation;

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::models::NodeId;
use crate::engine_core::registry::{GuardSwitch, Registrations};
use crate::engine_core::traits::{ContentTree, Page};
use crate::guards::GuardActivation;

pub use content_scanner::ContentScanner;
pub use devtools::{ContextMenuLogger, DevtoolsHeuristic};
pub use form_validator::FormValidator;
pub use frame_guard::FrameGuard;
pub use input_sanitizer::InputSanitizer;
pub use policy_violation::PolicyViolationReporter;

/// An independently activatable observer.
pub trait Detector {
    fn name(&self) -> &'static str;

    /// Subscribe to whatever the detector observes. All handles go through
    /// `registrations`; on error the caller releases them.
    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError>;
}

/// Enabled detectors in activation order.
pub fn plan(
    config: &SecurityConfig,
    log: &Arc<EventLog>,
    network: &GuardSwitch,
    storage: &GuardSwitch,
) -> Vec<Box<dyn Detector>> {
    let mut detectors: Vec<Box<dyn Detector>> = Vec::new();

    if config.enable_csp {
        detectors.push(Box::new(PolicyViolationReporter::new(log.clone())));
    }
    if config.enable_xss_protection {
        detectors.push(Box::new(FrameGuard::new(log.clone())));
        detectors.push(Box::new(ContentScanner::new(log.clone())));
    }
    if config.enable_input_sanitization {
        detectors.push(Box::new(InputSanitizer::new(log.clone())));
    }
    if config.enable_form_validation {
        detectors.push(Box::new(FormValidator::new(log.clone())));
    }
    if config.enable_network_security {
        detectors.push(Box::new(GuardActivation::new("network_guard", network.clone())));
    }
    if config.enable_storage_security {
        detectors.push(Box::new(GuardActivation::new("storage_guard", storage.clone())));
    }
    if config.strict_mode {
        detectors.push(Box::new(DevtoolsHeuristic::new(log.clone())));
        detectors.push(Box::new(ContextMenuLogger::new(log.clone())));
    }

    detectors
}

/// Human-readable field name: `name`, else `id`, else `fallback`.
pub(crate) fn field_label(page: &dyn Page, node: NodeId, fallback: &str) -> String {
    ["name", "id"]
        .iter()
        .filter_map(|attr| page.attribute(node, attr))
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub(crate) fn has_tag(page: &dyn Page, node: NodeId, tags: &[&str]) -> bool {
    page.tag_name(node)
        .is_some_and(|tag| tags.iter().any(|t| *t == tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(config: &SecurityConfig) -> Vec<&'static str> {
        let log = Arc::new(EventLog::default());
        plan(config, &log, &GuardSwitch::new(), &GuardSwitch::new())
            .iter()
            .map(|d| d.name())
            .collect()
    }

    #[test]
    fn test_default_plan_order() {
        assert_eq!(
            names(&SecurityConfig::default()),
            vec![
                "policy_violation_reporter",
                "frame_guard",
                "content_scanner",
                "input_sanitizer",
                "form_validator",
                "network_guard",
                "storage_guard",
            ]
        );
    }

    #[test]
    fn test_strict_mode_appends_telemetry_detectors() {
        let config = SecurityConfig {
            strict_mode: true,
            enable_csp: false,
            ..SecurityConfig::default()
        };
        let planned = names(&config);
        assert_eq!(planned.first(), Some(&"frame_guard"));
        assert_eq!(&planned[planned.len() - 2..], &["devtools_heuristic", "context_menu_logger"]);
    }

    #[test]
    fn test_everything_disabled() {
        let config = SecurityConfig::disabled();
        assert!(names(&config).is_empty());
    }
}
