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

//! lilith-shield: a runtime defense monitor for browser-like pages.
//!
//! The monitor observes user input, form submissions, outbound network calls,
//! storage writes and inserted content, and reacts to patterns indicative of
//! client-side injection or data exfiltration. Every observation lands in a
//! bounded security-event log.
//!
//! The page is reached only through the traits in [`engine_core::traits`];
//! [`page::MemoryPage`] implements them headlessly.

pub mod config;
pub mod detectors;
pub mod engine;
pub mod engine_core;
pub mod guards;
pub mod notify;
pub mod page;
pub mod utils;

pub use config::{ConfigOverrides, LoggingConfig, SecurityConfig};
pub use engine_core::errors::ShieldError;
pub use engine_core::events::{EventKind, SecurityEvent};
pub use engine_core::models::LifecycleState;
pub use engine_core::monitor::SecurityMonitor;
