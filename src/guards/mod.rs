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

//! Guarded clients.
//!
//! The host routes its network calls and storage writes through these
//! decorators instead of the raw primitives. A guard only inspects traffic
//! while its switch is armed, which the monitor does during activation and
//! undoes on cleanup.

pub mod http;
pub mod network;
pub mod storage;

pub use http::ReqwestTransport;
pub use network::GuardedTransport;
pub use storage::{GuardedStorage, MemoryStorage};

use tracing::debug;

use crate::detectors::Detector;
use crate::engine_core::errors::ShieldError;
use crate::engine_core::registry::{GuardSwitch, Registrations};
use crate::engine_core::traits::Page;

/// Activation step that arms a guard switch.
pub struct GuardActivation {
    name: &'static str,
    switch: GuardSwitch,
}

impl GuardActivation {
    pub fn new(name: &'static str, switch: GuardSwitch) -> Self {
        Self { name, switch }
    }
}

impl Detector for GuardActivation {
    fn name(&self) -> &'static str {
        self.name
    }

    fn activate(
        &self,
        _page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        registrations.arm(&self.switch);
        debug!("Armed {}", self.name);
        Ok(())
    }
}
