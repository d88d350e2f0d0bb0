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

//! lilith-shield Constants - Single source of truth for all tunable values.
//!
//! This module centralizes capacities, thresholds, timings and element/attribute
//! names used by the detectors.

/// Security event log
pub mod log {
    /// Maximum number of retained security events (oldest evicted first)
    pub const EVENT_LOG_CAPACITY: usize = 100;
    /// tracing target for audited security events
    pub const AUDIT_TARGET: &str = "audit";
}

/// Form validation limits
pub mod form {
    /// Maximum accepted length of a single form value, in UTF-16 code units
    pub const MAX_FIELD_LENGTH: usize = 10_000;
    /// Elements considered form controls
    pub const CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];
    /// Label used when a form carries no action
    pub const UNKNOWN_ACTION: &str = "current page";
}

/// Input sanitizer
pub mod input {
    /// Elements whose edits are sanitized
    pub const TEXT_TAGS: [&str; 2] = ["input", "textarea"];
    /// Label used when a field has neither name nor id
    pub const UNNAMED_FIELD: &str = "unnamed field";
}

/// Transient warning banner
pub mod notice {
    use std::time::Duration;

    /// Time a warning stays on screen
    pub const DISMISS_AFTER: Duration = Duration::from_secs(5);
    /// Text shown to the user when input was rewritten
    pub const SANITIZED_INPUT_MESSAGE: &str =
        "Potentially dangerous content was removed from your input.";
    /// Marker attribute carried by warning banners
    pub const MARKER_ATTRIBUTE: &str = "data-security-notice";
}

/// Content mutation scanner
pub mod content {
    /// Event-handler attributes stripped from inserted and pre-existing elements
    pub const DANGEROUS_ATTRIBUTES: [&str; 4] = ["onclick", "onload", "onerror", "onmouseover"];
    /// Elements removed outright during the initial sweep
    pub const SWEEP_REMOVED_TAGS: [&str; 2] = ["object", "embed"];
    /// Elements removed during the sweep when their `src` uses a script scheme
    pub const SWEEP_SCRIPTED_SRC_TAGS: [&str; 2] = ["script", "iframe"];
}

/// Devtools geometry heuristic
pub mod devtools {
    use std::time::Duration;

    /// Polling period of the geometry check
    pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
    /// Outer/inner viewport gap (px) above which devtools are assumed open
    pub const GAP_THRESHOLD_PX: u32 = 200;
}

/// Network guard
pub mod network {
    /// Hosts allowed by default for absolute URLs
    pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["localhost", "127.0.0.1"];
    /// Prefixes of same-origin relative URLs
    pub const RELATIVE_PREFIXES: [&str; 3] = ["/", "./", "../"];
}
