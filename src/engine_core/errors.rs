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

// Domain error types

use thiserror::Error;

/// Main error type for the shield.
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Outbound request rejected by the network guard (fail closed).
    #[error("Request to '{url}' blocked: {reason}")]
    RequestBlocked { url: String, reason: String },

    /// The host refused to register an event listener
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// The host refused to schedule a timer
    #[error("Scheduling error: {0}")]
    Scheduling(String),

    /// Invalid configuration or allow-list entry
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The underlying key-value store refused a write
    #[error("Storage error: {0}")]
    Storage(String),

    /// The underlying network primitive failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O Error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ShieldError {
    /// True for the network guard's blocking failure.
    pub fn is_blocked(&self) -> bool {
        matches!(self, ShieldError::RequestBlocked { .. })
    }
}
