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

//! Headless page host.
//!
//! `MemoryPage` implements every host trait in memory: an arena element tree,
//! a listener table, a virtual-clock scheduler and settable window state.
//! Host-side methods (`type_text`, `submit`, `insert`, `advance`, ...) play the
//! role of the browser dispatching events.
//!
//! Insertions made while a listener or timer runs are queued and delivered as
//! one mutation batch after the callback returns, the way a mutation observer
//! sees them.

pub mod dom;

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::engine_core::errors::ShieldError;
use crate::engine_core::models::{
    CspViolationReport, FrameAccessDenied, ListenerId, NodeId, TimerId, Viewport,
};
use crate::engine_core::traits::{
    ContentTree, EventTarget, Listener, PageEvent, Propagation, Scheduler, TimerTask, Topic,
    Window,
};
use dom::{DomTree, NodeKind};

/// Upper bound on chained mutation batches delivered after one host action
const MAX_MUTATION_ROUNDS: usize = 32;

struct ListenerSlot {
    id: ListenerId,
    topic: Topic,
    callback: Option<Listener>,
}

struct TimerSlot {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    task: Option<TimerTask>,
}

pub struct MemoryPage {
    tree: Option<DomTree>,
    html: Option<NodeId>,
    body: Option<NodeId>,
    listeners: Vec<ListenerSlot>,
    timers: Vec<TimerSlot>,
    next_handle: u64,
    clock: Duration,
    pending_mutations: Vec<NodeId>,
    viewport: Viewport,
    framed: bool,
    top_navigation_allowed: bool,
    failing_topics: HashSet<Topic>,
    failing_timers: bool,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Page with an `html > head + body` skeleton.
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.document(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree: Some(tree),
            html: Some(html),
            body: Some(body),
            ..Self::headless()
        }
    }

    /// Environment without a content tree.
    pub fn headless() -> Self {
        Self {
            tree: None,
            html: None,
            body: None,
            listeners: Vec::new(),
            timers: Vec::new(),
            next_handle: 1,
            clock: Duration::ZERO,
            pending_mutations: Vec::new(),
            viewport: Viewport::uniform(1280, 800),
            framed: false,
            top_navigation_allowed: true,
            failing_topics: HashSet::new(),
            failing_timers: false,
        }
    }

    pub fn tree(&self) -> Option<&DomTree> {
        self.tree.as_ref()
    }

    // ----- building content -------------------------------------------------

    /// Create a detached element with the given attributes.
    pub fn element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = ContentTree::create_element(self, tag);
        for (name, value) in attributes {
            ContentTree::set_attribute(self, id, name, value);
        }
        id
    }

    /// Attach `child` under `parent` and deliver the resulting mutation.
    pub fn insert(&mut self, parent: NodeId, child: NodeId) {
        ContentTree::append_child(self, parent, child);
        self.flush_mutations();
    }

    /// Attach without queuing a mutation record (content present at load).
    pub fn preload(&mut self, parent: NodeId, child: NodeId) {
        if let Some(tree) = self.tree.as_mut() {
            tree.append_child(parent, child);
        }
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree
            .as_ref()
            .map(|t| t.text_content(node))
            .unwrap_or_default()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.tree.as_ref().is_some_and(|t| t.is_attached(node))
    }

    /// Attached elements carrying `name` (any value).
    pub fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        tree.elements()
            .into_iter()
            .filter(|id| tree.element(*id).is_some_and(|e| e.attribute(name).is_some()))
            .collect()
    }

    // ----- browser dispatch -------------------------------------------------

    /// Replace a field's value as the user would and fire an input event.
    pub fn type_text(&mut self, field: NodeId, value: &str) {
        ContentTree::set_value(self, field, value);
        self.dispatch(&PageEvent::Input { target: field });
        self.flush_mutations();
    }

    /// Fire a submit event. Returns true if the submission proceeds.
    pub fn submit(&mut self, form: NodeId) -> bool {
        let outcome = self.dispatch(&PageEvent::Submit { form });
        self.flush_mutations();
        outcome == Propagation::Continue
    }

    pub fn report_csp_violation(&mut self, report: &CspViolationReport) {
        self.dispatch(&PageEvent::SecurityPolicyViolation(report));
        self.flush_mutations();
    }

    /// Fire a context-menu event. Returns true if the menu opens.
    pub fn open_context_menu(&mut self, target: Option<NodeId>) -> bool {
        let outcome = self.dispatch(&PageEvent::ContextMenu { target });
        self.flush_mutations();
        outcome == Propagation::Continue
    }

    pub fn dispatch(&mut self, event: &PageEvent<'_>) -> Propagation {
        let topic = event.topic();
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|slot| slot.topic == topic)
            .map(|slot| slot.id)
            .collect();

        let mut outcome = Propagation::Continue;
        for id in ids {
            let Some(mut callback) = self
                .listeners
                .iter_mut()
                .find(|slot| slot.id == id)
                .and_then(|slot| slot.callback.take())
            else {
                continue;
            };

            if callback(&mut *self, event) == Propagation::PreventDefault {
                outcome = Propagation::PreventDefault;
            }

            // The listener may have unsubscribed itself while running.
            if let Some(slot) = self.listeners.iter_mut().find(|slot| slot.id == id) {
                slot.callback = Some(callback);
            }
        }
        outcome
    }

    /// Deliver queued insertions until no listener queues more.
    pub fn flush_mutations(&mut self) {
        for _ in 0..MAX_MUTATION_ROUNDS {
            if self.pending_mutations.is_empty() {
                return;
            }
            let batch: Vec<NodeId> = std::mem::take(&mut self.pending_mutations)
                .into_iter()
                .filter(|id| self.is_attached(*id))
                .collect();
            if !batch.is_empty() {
                self.dispatch(&PageEvent::Mutation { added: &batch });
            }
        }
        debug!("Dropping mutation records after {} rounds", MAX_MUTATION_ROUNDS);
        self.pending_mutations.clear();
    }

    // ----- virtual clock ----------------------------------------------------

    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Move the clock forward, firing every timer that falls due on the way.
    pub fn advance(&mut self, by: Duration) {
        let target = self.clock + by;
        loop {
            let next = self
                .timers
                .iter()
                .filter(|t| t.due <= target && t.task.is_some())
                .min_by_key(|t| (t.due, t.id.0))
                .map(|t| t.id);
            let Some(id) = next else { break };

            let Some(slot) = self.timers.iter_mut().find(|t| t.id == id) else {
                break;
            };
            let due = slot.due;
            let period = slot.period;
            let Some(mut task) = slot.task.take() else {
                break;
            };
            self.clock = due;

            task(&mut *self);
            self.flush_mutations();

            match period {
                Some(period) => {
                    if let Some(slot) = self.timers.iter_mut().find(|t| t.id == id) {
                        // Zero periods would never let the clock move.
                        slot.due = due + period.max(Duration::from_millis(1));
                        slot.task = Some(task);
                    }
                }
                None => self.timers.retain(|t| t.id != id),
            }
        }
        self.clock = target;
    }

    // ----- window state -----------------------------------------------------

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Embed the page in a foreign frame; `navigation_allowed` decides whether
    /// the top-level context may be navigated from inside.
    pub fn set_framed(&mut self, framed: bool, navigation_allowed: bool) {
        self.framed = framed;
        self.top_navigation_allowed = navigation_allowed;
    }

    // ----- failure injection and inspection ---------------------------------

    /// Make every later `add_listener` for `topic` fail.
    pub fn fail_subscriptions(&mut self, topic: Topic) {
        self.failing_topics.insert(topic);
    }

    /// Make every later `set_interval`/`set_timeout` fail.
    pub fn fail_timers(&mut self) {
        self.failing_timers = true;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_count_for(&self, topic: Topic) -> usize {
        self.listeners.iter().filter(|l| l.topic == topic).count()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn schedule(
        &mut self,
        delay: Duration,
        period: Option<Duration>,
        task: TimerTask,
    ) -> Result<TimerId, ShieldError> {
        if self.failing_timers {
            return Err(ShieldError::Scheduling(
                "timer creation refused by host".to_string(),
            ));
        }
        let id = TimerId(self.next_id());
        self.timers.push(TimerSlot {
            id,
            due: self.clock + delay,
            period,
            task: Some(task),
        });
        Ok(id)
    }
}

impl ContentTree for MemoryPage {
    fn has_content_tree(&self) -> bool {
        self.tree.is_some()
    }

    fn root(&self) -> Option<NodeId> {
        self.html.filter(|id| self.is_attached(*id))
    }

    fn body(&self) -> Option<NodeId> {
        self.body.filter(|id| self.is_attached(*id))
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.tree.as_ref()?.element(node).map(|e| e.tag.clone())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .as_ref()
            .map(|t| t.children(node))
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .as_ref()?
            .element(node)?
            .attribute(name)
            .map(str::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.tree.as_mut().and_then(|t| t.element_mut(node)) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match element.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => element.attributes.push((name, value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        let Some(element) = self.tree.as_mut().and_then(|t| t.element_mut(node)) else {
            return false;
        };
        let before = element.attributes.len();
        element
            .attributes
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        element.attributes.len() != before
    }

    fn value(&self, node: NodeId) -> Option<String> {
        self.tree
            .as_ref()?
            .element(node)
            .map(|e| e.value.clone())
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.tree.as_mut().and_then(|t| t.element_mut(node)) {
            element.value = value.to_string();
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(tree) = self.tree.as_mut() {
            tree.set_text(node, text);
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        // A headless page stays headless; the id resolves to nothing.
        match self.tree.as_mut() {
            Some(tree) => tree.create_element(tag),
            None => NodeId::new(usize::MAX),
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        if tree.append_child(parent, child) && tree.is_attached(child) {
            let is_element = matches!(
                tree.get(child).map(|n| &n.kind),
                Some(NodeKind::Element(_))
            );
            if is_element {
                self.pending_mutations.push(child);
            }
        }
    }

    fn remove_node(&mut self, node: NodeId) -> bool {
        self.tree.as_mut().is_some_and(|t| t.remove(node))
    }
}

impl EventTarget for MemoryPage {
    fn add_listener(
        &mut self,
        topic: Topic,
        listener: Listener,
    ) -> Result<ListenerId, ShieldError> {
        if self.failing_topics.contains(&topic) {
            return Err(ShieldError::Subscription(format!(
                "listener for {:?} refused by host",
                topic
            )));
        }
        let id = ListenerId(self.next_id());
        self.listeners.push(ListenerSlot {
            id,
            topic,
            callback: Some(listener),
        });
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|slot| slot.id != id);
    }
}

impl Scheduler for MemoryPage {
    fn set_interval(&mut self, period: Duration, task: TimerTask) -> Result<TimerId, ShieldError> {
        self.schedule(period, Some(period), task)
    }

    fn set_timeout(&mut self, delay: Duration, task: TimerTask) -> Result<TimerId, ShieldError> {
        self.schedule(delay, None, task)
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }
}

impl Window for MemoryPage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_framed(&self) -> bool {
        self.framed
    }

    fn break_out_of_frame(&mut self) -> Result<(), FrameAccessDenied> {
        if !self.framed {
            return Ok(());
        }
        if self.top_navigation_allowed {
            self.framed = false;
            Ok(())
        } else {
            Err(FrameAccessDenied {
                reason: "cross-origin top-level navigation denied".to_string(),
            })
        }
    }
}
