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

//! Strict-mode telemetry: developer-tools heuristic and context-menu logging.
//! Both are observational and never interfere with the page.

use std::sync::Arc;

use tracing::debug;

use crate::engine_core::constants::devtools::{GAP_THRESHOLD_PX, POLL_INTERVAL};
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::registry::Registrations;
use crate::engine_core::traits::{
    listener, timer_task, ContentTree, Page, PageEvent, Propagation, Topic, Window,
};

use super::Detector;

/// Polls window geometry; a large gap between outer and inner size suggests
/// docked developer tools. Logs once per closed to open transition.
pub struct DevtoolsHeuristic {
    log: Arc<EventLog>,
}

impl DevtoolsHeuristic {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for DevtoolsHeuristic {
    fn name(&self) -> &'static str {
        "devtools_heuristic"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        let log = self.log.clone();
        let mut was_open = false;
        registrations.every(
            page,
            POLL_INTERVAL,
            timer_task(move |page| {
                let gap = page.viewport().chrome_gap();
                let is_open = gap > GAP_THRESHOLD_PX;
                if is_open && !was_open {
                    log.record(
                        EventKind::DevtoolsOpened,
                        format!("Developer tools may be open (viewport gap: {}px)", gap),
                    );
                } else if !is_open && was_open {
                    debug!("Developer tools appear closed");
                }
                was_open = is_open;
            }),
        )?;
        Ok(())
    }
}

pub struct ContextMenuLogger {
    log: Arc<EventLog>,
}

impl ContextMenuLogger {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for ContextMenuLogger {
    fn name(&self) -> &'static str {
        "context_menu_logger"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        let log = self.log.clone();
        registrations.listen(
            page,
            Topic::ContextMenu,
            listener(move |page, event| {
                if let PageEvent::ContextMenu { target } = event {
                    let details = match (*target).and_then(|node| page.tag_name(node)) {
                        Some(tag) => format!("Context menu opened on <{}>", tag),
                        None => "Context menu opened".to_string(),
                    };
                    log.record(EventKind::ContextMenu, details);
                }
                Propagation::Continue
            }),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_core::models::Viewport;
    use crate::page::MemoryPage;
    use std::time::Duration;

    #[test]
    fn test_logs_once_per_opening() {
        let mut page = MemoryPage::new();
        let log = Arc::new(EventLog::default());
        DevtoolsHeuristic::new(log.clone())
            .activate(&mut page, &mut Registrations::new())
            .unwrap();

        page.advance(Duration::from_secs(2));
        assert!(log.is_empty());

        let docked = Viewport {
            outer_width: 1280,
            outer_height: 800,
            inner_width: 1280,
            inner_height: 450,
        };
        page.set_viewport(docked);
        page.advance(Duration::from_secs(3));
        assert_eq!(log.count_of(EventKind::DevtoolsOpened), 1);

        page.set_viewport(Viewport::uniform(1280, 800));
        page.advance(Duration::from_secs(1));
        page.set_viewport(docked);
        page.advance(Duration::from_secs(1));
        assert_eq!(log.count_of(EventKind::DevtoolsOpened), 2);
    }

    #[test]
    fn test_gap_at_threshold_is_closed() {
        let mut page = MemoryPage::new();
        page.set_viewport(Viewport {
            outer_width: 1480,
            outer_height: 800,
            inner_width: 1280,
            inner_height: 800,
        });
        let log = Arc::new(EventLog::default());
        DevtoolsHeuristic::new(log.clone())
            .activate(&mut page, &mut Registrations::new())
            .unwrap();
        page.advance(Duration::from_secs(1));
        assert!(log.is_empty());
    }

    #[test]
    fn test_context_menu_logged_not_blocked() {
        let mut page = MemoryPage::new();
        let log = Arc::new(EventLog::default());
        ContextMenuLogger::new(log.clone())
            .activate(&mut page, &mut Registrations::new())
            .unwrap();
        let body = page.body().unwrap();
        let img = page.element("img", &[]);
        page.insert(body, img);

        assert!(page.open_context_menu(Some(img)));
        assert!(page.open_context_menu(None));

        let details: Vec<String> = log.snapshot().iter().map(|e| e.details().to_string()).collect();
        assert_eq!(details, vec!["Context menu opened on <img>", "Context menu opened"]);
    }
}
