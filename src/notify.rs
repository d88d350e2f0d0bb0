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

//! Transient on-page warnings.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::engine_core::constants::notice::{DISMISS_AFTER, MARKER_ATTRIBUTE};
use crate::engine_core::models::{NodeId, TimerId};
use crate::engine_core::registry::TimerLedger;
use crate::engine_core::traits::{timer_task, ContentTree, Page, Scheduler};

/// Shows a warning banner and schedules its removal.
#[derive(Debug, Clone)]
pub struct Notifier {
    ledger: TimerLedger,
}

impl Notifier {
    pub fn new(ledger: TimerLedger) -> Self {
        Self { ledger }
    }

    /// Append a banner to the body. Returns the banner node, or `None` when
    /// the page has no body.
    pub fn warn(&self, page: &mut dyn Page, message: &str) -> Option<NodeId> {
        let Some(body) = page.body() else {
            debug!("No body to attach warning to");
            return None;
        };

        let banner = page.create_element("div");
        page.set_attribute(banner, "role", "alert");
        page.set_attribute(banner, MARKER_ATTRIBUTE, "true");
        page.set_text(banner, message);
        page.append_child(body, banner);

        let own_id: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let slot = own_id.clone();
        let ledger = self.ledger.clone();
        let dismiss = timer_task(move |page| {
            page.remove_node(banner);
            if let Some(id) = slot.take() {
                ledger.untrack(id);
            }
        });

        match page.set_timeout(DISMISS_AFTER, dismiss) {
            Ok(id) => {
                own_id.set(Some(id));
                self.ledger.track(id);
            }
            Err(e) => {
                // Without a dismissal timer the banner would stay forever.
                warn!("Could not schedule warning dismissal: {}", e);
                page.remove_node(banner);
                return None;
            }
        }

        Some(banner)
    }
}
