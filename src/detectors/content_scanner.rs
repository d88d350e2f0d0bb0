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

//! Content Mutation Scanner.
//!
//! Watches structural insertions and cleans what arrives: dangerous inline
//! handlers are stripped and inserted `script` elements are removed. The
//! one-time [`sweep`] applies a similar treatment to content that was
//! already present when the monitor started.

use std::sync::Arc;

use tracing::debug;

use crate::engine_core::constants::content::{
    DANGEROUS_ATTRIBUTES, SWEEP_REMOVED_TAGS, SWEEP_SCRIPTED_SRC_TAGS,
};
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::models::NodeId;
use crate::engine_core::registry::Registrations;
use crate::engine_core::traits::{listener, ContentTree, Page, PageEvent, Propagation, Topic};

use super::Detector;

pub struct ContentScanner {
    log: Arc<EventLog>,
}

impl ContentScanner {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }
}

impl Detector for ContentScanner {
    fn name(&self) -> &'static str {
        "content_scanner"
    }

    fn activate(
        &self,
        page: &mut dyn Page,
        registrations: &mut Registrations,
    ) -> Result<(), ShieldError> {
        let log = self.log.clone();
        registrations.listen(
            page,
            Topic::Mutation,
            listener(move |page, event| {
                if let PageEvent::Mutation { added } = event {
                    for node in added.iter() {
                        scan_inserted(page, *node, &log);
                    }
                }
                Propagation::Continue
            }),
        )?;
        Ok(())
    }
}

fn scan_inserted(page: &mut dyn Page, inserted: NodeId, log: &EventLog) {
    for node in page.descendants(inserted) {
        // Gone with an ancestor removed earlier in this pass.
        let Some(tag) = page.tag_name(node) else {
            continue;
        };

        if tag == "script" {
            let src = page.attribute(node, "src").unwrap_or_default();
            page.remove_node(node);
            log.record(
                EventKind::ScriptInjection,
                if src.is_empty() {
                    "Removed dynamically inserted inline script".to_string()
                } else {
                    format!("Removed dynamically inserted script: {}", src)
                },
            );
            continue;
        }

        for attr in DANGEROUS_ATTRIBUTES {
            if page.remove_attribute(node, attr) {
                log.record(
                    EventKind::XssAttribute,
                    format!("Removed {} attribute from <{}>", attr, tag),
                );
            }
        }
    }
}

fn has_script_src(page: &dyn Page, node: NodeId) -> bool {
    page.attribute(node, "src").is_some_and(|src| {
        src.trim_start()
            .get(..11)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
    })
}

/// Clean the existing tree once. Returns the number of findings logged.
pub fn sweep(page: &mut dyn Page, log: &EventLog) -> usize {
    let Some(root) = page.root() else {
        return 0;
    };

    let mut findings = 0;
    for node in page.descendants(root) {
        let Some(tag) = page.tag_name(node) else {
            continue;
        };

        let remove = SWEEP_REMOVED_TAGS.contains(&tag.as_str())
            || (SWEEP_SCRIPTED_SRC_TAGS.contains(&tag.as_str()) && has_script_src(page, node));
        if remove {
            page.remove_node(node);
            log.record(
                EventKind::DangerousElement,
                format!("Removed dangerous <{}> element", tag),
            );
            findings += 1;
            continue;
        }

        for attr in DANGEROUS_ATTRIBUTES {
            if page.remove_attribute(node, attr) {
                log.record(
                    EventKind::DangerousElement,
                    format!("Removed {} attribute from <{}>", attr, tag),
                );
                findings += 1;
            }
        }
    }

    debug!("Initial sweep finished with {} findings", findings);
    findings
}
