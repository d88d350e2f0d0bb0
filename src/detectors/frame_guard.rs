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

use std::sync::Arc;

use tracing::{debug, info};

use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::registry::Registrations;
use crate::engine_core::traits::{Page, Window};

use super::Detector;

/// One-shot check at activation: a framed page tries to take over the
/// top-level context. A refusal is logged, never retried.
pub struct FrameGuard {
    log: Arc<EventLog>,
}

impl FrameGuard {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for FrameGuard {
    fn name(&self) -> &'static str {
        "frame_guard"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        _registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        if !page.is_framed() {
            debug!("Page is top-level, frame guard idle");
            return Ok(());
        }

        match page.break_out_of_frame() {
            Ok(()) => info!("Broke out of embedding frame"),
            Err(denied) => self.log.record(
                EventKind::FrameBustingBlocked,
                format!("Frame busting attempt blocked: {}", denied),
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    fn run(framed: bool, allowed: bool) -> (MemoryPage, Arc<EventLog>) {
        let mut page = MemoryPage::new();
        page.set_framed(framed, allowed);
        let log = Arc::new(EventLog::default());
        FrameGuard::new(log.clone())
            .activate(&mut page, &mut Registrations::new())
            .unwrap();
        (page, log)
    }

    #[test]
    fn test_denied_breakout_is_logged() {
        let (page, log) = run(true, false);
        assert!(page.is_framed());
        assert_eq!(log.count_of(EventKind::FrameBustingBlocked), 1);
    }

    #[test]
    fn test_allowed_breakout_is_silent() {
        let (page, log) = run(true, true);
        assert!(!page.is_framed());
        assert!(log.is_empty());
    }

    #[test]
    fn test_top_level_page_untouched() {
        let (_, log) = run(false, false);
        assert!(log.is_empty());
    }
}
