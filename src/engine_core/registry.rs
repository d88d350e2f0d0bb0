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

//! Subscription and timer bookkeeping.
//!
//! The monitor is the only owner of listener ids, timer ids and guard
//! switches. Detectors register through `Registrations` during activation and
//! never keep the handles themselves, so one `release_all` undoes everything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::engine_core::errors::ShieldError;
use crate::engine_core::models::{ListenerId, TimerId};
use crate::engine_core::traits::{EventTarget, Listener, Page, Scheduler, TimerTask, Topic};

/// On/off state shared between the monitor and a guarded client.
#[derive(Debug, Clone, Default)]
pub struct GuardSwitch(Arc<AtomicBool>);

impl GuardSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, armed: bool) {
        self.0.store(armed, Ordering::Release);
    }
}

/// Timers created on the monitor's behalf after activation (warning
/// dismissals). Entries leave the ledger when they fire or on teardown.
#[derive(Debug, Clone, Default)]
pub struct TimerLedger(Arc<Mutex<Vec<TimerId>>>);

impl TimerLedger {
    pub fn track(&self, id: TimerId) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(id);
    }

    pub fn untrack(&self, id: TimerId) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|t| *t != id);
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn drain(&self) -> Vec<TimerId> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[derive(Debug, Default)]
pub struct Registrations {
    listeners: Vec<ListenerId>,
    intervals: Vec<TimerId>,
    deferred: TimerLedger,
    switches: Vec<GuardSwitch>,
}

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(
        &mut self,
        page: &mut dyn Page,
        topic: Topic,
        listener: Listener,
    ) -> Result<ListenerId, ShieldError> {
        let id = page.add_listener(topic, listener)?;
        debug!("Subscribed to {:?} ({:?})", topic, id);
        self.listeners.push(id);
        Ok(id)
    }

    pub fn every(
        &mut self,
        page: &mut dyn Page,
        period: Duration,
        task: TimerTask,
    ) -> Result<TimerId, ShieldError> {
        let id = page.set_interval(period, task)?;
        debug!("Scheduled interval every {:?} ({:?})", period, id);
        self.intervals.push(id);
        Ok(id)
    }

    pub fn arm(&mut self, switch: &GuardSwitch) {
        switch.set(true);
        self.switches.push(switch.clone());
    }

    /// Ledger handed to components that schedule one-shot timers later on.
    pub fn deferred(&self) -> TimerLedger {
        self.deferred.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn timer_count(&self) -> usize {
        self.intervals.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
            && self.intervals.is_empty()
            && self.deferred.is_empty()
            && self.switches.is_empty()
    }

    /// Unsubscribe, cancel and disarm everything registered so far.
    pub fn release_all(&mut self, page: &mut dyn Page) {
        for id in self.listeners.drain(..) {
            page.remove_listener(id);
        }
        for id in self.intervals.drain(..) {
            page.clear_timer(id);
        }
        for id in self.deferred.drain() {
            page.clear_timer(id);
        }
        for switch in self.switches.drain(..) {
            switch.set(false);
        }
    }
}
