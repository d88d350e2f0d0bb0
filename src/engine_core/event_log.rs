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

//! Bounded security event log.
//!
//! Detectors only append; reading and clearing go through the monitor. When the
//! log is full the oldest entry is evicted first.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::engine_core::audit::AuditLogger;
use crate::engine_core::constants::log::EVENT_LOG_CAPACITY;
use crate::engine_core::events::{EventKind, SecurityEvent};

#[derive(Debug)]
pub struct EventLog {
    entries: Mutex<VecDeque<SecurityEvent>>,
    capacity: usize,
    audit: AuditLogger,
}

impl EventLog {
    pub fn new(audit: AuditLogger) -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY, audit)
    }

    pub fn with_capacity(capacity: usize, audit: AuditLogger) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            audit,
        }
    }

    /// Stamp and append a new event.
    pub fn record(&self, kind: EventKind, details: impl Into<String>) {
        self.push(SecurityEvent::new(kind, details));
    }

    pub fn push(&self, event: SecurityEvent) {
        self.audit.log(&event);

        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        if self.capacity > 0 {
            entries.push_back(event);
        }
    }

    /// Copy of the retained events, oldest first.
    pub fn snapshot(&self) -> Vec<SecurityEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.lock().iter().filter(|e| e.kind() == kind).count()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<SecurityEvent>> {
        // Appends never leave the deque half-written, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(AuditLogger::disabled())
    }
}
