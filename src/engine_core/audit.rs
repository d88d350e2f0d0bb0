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

use crate::engine_core::constants::log::AUDIT_TARGET;
use crate::engine_core::events::SecurityEvent;
use crate::engine_core::models::MonitorId;
use tracing::warn;

/// Emits security events as structured log records.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    monitor_id: MonitorId,
    enabled: bool,
}

impl AuditLogger {
    pub fn new(monitor_id: MonitorId, enabled: bool) -> Self {
        Self {
            monitor_id,
            enabled,
        }
    }

    /// Audit sink that never emits; events are still stored by the log.
    pub fn disabled() -> Self {
        Self::new(MonitorId::generate(), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log(&self, event: &SecurityEvent) {
        if !self.enabled {
            return;
        }

        let payload = serde_json::to_string(event).unwrap_or_default();

        warn!(
            target: AUDIT_TARGET,
            monitor = %self.monitor_id,
            kind = %event.kind(),
            payload = %payload,
            "SECURITY_EVENT"
        );
    }
}
