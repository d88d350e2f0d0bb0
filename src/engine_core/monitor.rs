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

//! Security Monitor.
//!
//! The lifecycle controller. It owns the configuration, the event log, every
//! subscription and timer handle, and the two guard switches. Activation is
//! all-or-nothing: a failing detector rolls the monitor back to
//! `UNINITIALIZED` with nothing left registered (fail inert).

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ConfigOverrides, SecurityConfig};
use crate::detectors::{content_scanner, plan};
use crate::engine::url_classifier::UrlClassifier;
use crate::engine_core::audit::AuditLogger;
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::SecurityEvent;
use crate::engine_core::models::{LifecycleState, MonitorId};
use crate::engine_core::registry::{GuardSwitch, Registrations};
use crate::engine_core::traits::{ContentTree, KeyValueStore, Page, Transport};
use crate::guards::{GuardedStorage, GuardedTransport};

pub struct SecurityMonitor {
    id: MonitorId,
    config: Arc<SecurityConfig>,
    state: LifecycleState,
    log: Arc<EventLog>,
    classifier: Arc<UrlClassifier>,
    registrations: Registrations,
    network: GuardSwitch,
    storage: GuardSwitch,
}

impl SecurityMonitor {
    /// Fails only on an unusable origin allow-list.
    pub fn new(config: SecurityConfig) -> Result<Self, ShieldError> {
        config.validate()?;
        let classifier = UrlClassifier::new(config.allowed_origins.as_slice())?;
        let id = MonitorId::generate();
        let audit = AuditLogger::new(id, config.log_security_events);

        debug!("Created security monitor {}", id);
        Ok(Self {
            id,
            config: Arc::new(config),
            state: LifecycleState::Uninitialized,
            log: Arc::new(EventLog::new(audit)),
            classifier: Arc::new(classifier),
            registrations: Registrations::new(),
            network: GuardSwitch::new(),
            storage: GuardSwitch::new(),
        })
    }

    /// Monitor whose configuration is the defaults with `overrides` applied.
    pub fn with_overrides(overrides: ConfigOverrides) -> Result<Self, ShieldError> {
        Self::new(SecurityConfig::default().apply(overrides))
    }

    pub fn id(&self) -> MonitorId {
        self.id
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }

    /// Activate every enabled detector, then sweep existing content.
    ///
    /// Does nothing unless the monitor is `UNINITIALIZED` and the page has a
    /// content tree. Never returns an error: on failure everything already
    /// registered is released and the monitor stays `UNINITIALIZED`.
    pub fn initialize(&mut self, page: &mut dyn Page) -> LifecycleState {
        if self.state != LifecycleState::Uninitialized {
            debug!("Monitor {} already {}, skipping initialize", self.id, self.state);
            return self.state;
        }
        if !page.has_content_tree() {
            info!("No content tree available, monitor {} stays inert", self.id);
            return self.state;
        }

        self.state = LifecycleState::Initializing;
        info!("Initializing security monitor {}", self.id);

        match self.activate(page) {
            Ok(()) => {
                self.state = LifecycleState::Active;
                info!(
                    "Security monitor {} active ({} listeners, {} timers)",
                    self.id,
                    self.registrations.listener_count(),
                    self.registrations.timer_count()
                );
            }
            Err(e) => {
                warn!("Security monitor initialization failed, rolling back: {}", e);
                self.registrations.release_all(page);
                self.state = LifecycleState::Uninitialized;
            }
        }
        self.state
    }

    fn activate(&mut self, page: &mut dyn Page) -> Result<(), ShieldError> {
        for detector in plan(&self.config, &self.log, &self.network, &self.storage) {
            detector.activate(page, &mut self.registrations)?;
            debug!("Activated {}", detector.name());
        }

        if self.config.enable_xss_protection {
            content_scanner::sweep(page, &self.log);
        }
        Ok(())
    }

    /// Unsubscribe every listener, cancel every timer (pending warning
    /// dismissals included) and disarm both guards. Safe to call repeatedly.
    pub fn cleanup(&mut self, page: &mut dyn Page) {
        self.registrations.release_all(page);
        if self.state != LifecycleState::Uninitialized {
            info!("Security monitor {} stopped", self.id);
        }
        self.state = LifecycleState::Uninitialized;
    }

    /// Copy of the retained events, oldest first.
    pub fn security_events(&self) -> Vec<SecurityEvent> {
        self.log.snapshot()
    }

    /// Empty the log. Independent of the lifecycle state.
    pub fn clear_security_events(&self) {
        self.log.clear();
    }

    /// Network client the host should route every outbound call through.
    pub fn guard_transport<T: Transport>(&self, inner: T) -> GuardedTransport<T> {
        GuardedTransport::new(
            inner,
            self.classifier.clone(),
            self.log.clone(),
            self.network.clone(),
        )
    }

    /// Store the host should route every persistent write through.
    pub fn guard_storage<S: KeyValueStore>(&self, inner: S) -> GuardedStorage<S> {
        GuardedStorage::new(inner, self.log.clone(), self.storage.clone())
    }
}

impl std::fmt::Debug for SecurityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityMonitor")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("events", &self.log.len())
            .finish_non_exhaustive()
    }
}
