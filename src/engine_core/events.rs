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

//! Security events.
//!
//! Every detector reports what it observed as a `SecurityEvent`. Events are
//! immutable once created; they are only appended to the event log and
//! eventually evicted from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of observations a detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    CspViolation,
    FrameBustingBlocked,
    XssAttempt,
    XssAttribute,
    ScriptInjection,
    DangerousElement,
    FormValidationFailed,
    OversizedInput,
    SqlInjectionAttempt,
    SuspiciousRequest,
    SensitiveStorage,
    DevtoolsOpened,
    ContextMenu,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CspViolation => "CSP_VIOLATION",
            Self::FrameBustingBlocked => "FRAME_BUSTING_BLOCKED",
            Self::XssAttempt => "XSS_ATTEMPT",
            Self::XssAttribute => "XSS_ATTRIBUTE",
            Self::ScriptInjection => "SCRIPT_INJECTION",
            Self::DangerousElement => "DANGEROUS_ELEMENT",
            Self::FormValidationFailed => "FORM_VALIDATION_FAILED",
            Self::OversizedInput => "OVERSIZED_INPUT",
            Self::SqlInjectionAttempt => "SQL_INJECTION_ATTEMPT",
            Self::SuspiciousRequest => "SUSPICIOUS_REQUEST",
            Self::SensitiveStorage => "SENSITIVE_STORAGE",
            Self::DevtoolsOpened => "DEVTOOLS_OPENED",
            Self::ContextMenu => "CONTEXT_MENU",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classified observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    #[serde(rename = "type")]
    kind: EventKind,
    /// Milliseconds since the Unix epoch
    timestamp: i64,
    details: String,
}

impl SecurityEvent {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind, details: impl Into<String>) -> Self {
        Self::at(kind, crate::utils::time::now_millis(), details)
    }

    /// Create an event with an explicit timestamp.
    pub fn at(kind: EventKind, timestamp: i64, details: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp,
            details: details.into(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}
