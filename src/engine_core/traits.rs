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

//! Host Platform Traits.
//!
//! The monitor never touches browser globals. Everything it observes or
//! mutates goes through these traits, which the hosting application implements
//! over its real page (or uses [`crate::page::MemoryPage`] for headless runs).

use std::time::Duration;

use async_trait::async_trait;

use crate::engine_core::errors::ShieldError;
use crate::engine_core::models::{
    CspViolationReport, FetchRequest, FetchResponse, FrameAccessDenied, ListenerId, NodeId,
    TimerId, Viewport,
};

/// Classes of page activity a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Input,
    Submit,
    Mutation,
    SecurityPolicyViolation,
    ContextMenu,
}

/// A dispatched page event.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent<'a> {
    /// The value of an editable element changed
    Input { target: NodeId },
    /// A form is about to be submitted
    Submit { form: NodeId },
    /// Nodes were inserted into the content tree
    Mutation { added: &'a [NodeId] },
    /// The browser reported a CSP breach
    SecurityPolicyViolation(&'a CspViolationReport),
    /// The user opened the context menu
    ContextMenu { target: Option<NodeId> },
}

impl PageEvent<'_> {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Input { .. } => Topic::Input,
            Self::Submit { .. } => Topic::Submit,
            Self::Mutation { .. } => Topic::Mutation,
            Self::SecurityPolicyViolation(_) => Topic::SecurityPolicyViolation,
            Self::ContextMenu { .. } => Topic::ContextMenu,
        }
    }
}

/// Whether the default action of an event may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    PreventDefault,
}

/// Callback invoked for every dispatched event of its topic.
pub type Listener = Box<dyn FnMut(&mut dyn Page, &PageEvent<'_>) -> Propagation>;

/// Callback invoked when a timer fires.
pub type TimerTask = Box<dyn FnMut(&mut dyn Page)>;

/// Box a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: FnMut(&mut dyn Page, &PageEvent<'_>) -> Propagation + 'static,
{
    Box::new(f)
}

/// Box a closure as a [`TimerTask`].
pub fn timer_task<F>(f: F) -> TimerTask
where
    F: FnMut(&mut dyn Page) + 'static,
{
    Box::new(f)
}

/// The page's element tree.
pub trait ContentTree {
    /// False when running outside a browser-like environment.
    fn has_content_tree(&self) -> bool;

    /// Document element, if any.
    fn root(&self) -> Option<NodeId>;

    fn body(&self) -> Option<NodeId>;

    /// Lowercase tag name; `None` for text nodes and detached/unknown ids.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Returns true if the attribute was present.
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool;

    /// Current value of a form control.
    fn value(&self, node: NodeId) -> Option<String>;

    fn set_value(&mut self, node: NodeId, value: &str);

    fn set_text(&mut self, node: NodeId, text: &str);

    fn create_element(&mut self, tag: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach a node and its subtree. Returns true if it was attached.
    fn remove_node(&mut self, node: NodeId) -> bool;

    /// `node` followed by all of its descendants, in document order.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        out
    }
}

/// Listener registration.
pub trait EventTarget {
    fn add_listener(&mut self, topic: Topic, listener: Listener)
        -> Result<ListenerId, ShieldError>;

    /// Removing an unknown id is a no-op.
    fn remove_listener(&mut self, id: ListenerId);
}

/// Deferred callbacks.
pub trait Scheduler {
    fn set_interval(&mut self, period: Duration, task: TimerTask) -> Result<TimerId, ShieldError>;

    fn set_timeout(&mut self, delay: Duration, task: TimerTask) -> Result<TimerId, ShieldError>;

    /// Clearing an unknown or already-fired timer is a no-op.
    fn clear_timer(&mut self, id: TimerId);
}

/// Window geometry and browsing-context signals.
pub trait Window {
    fn viewport(&self) -> Viewport;

    /// True when this page is embedded in another page's frame.
    fn is_framed(&self) -> bool;

    /// Try to make the top-level context navigate to this page.
    fn break_out_of_frame(&mut self) -> Result<(), FrameAccessDenied>;
}

/// Everything the monitor needs from the hosting page.
pub trait Page: ContentTree + EventTarget + Scheduler + Window {}

impl<T: ContentTree + EventTarget + Scheduler + Window + ?Sized> Page for T {}

/// The ambient network-call primitive.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ShieldError>;
}

/// The ambient persistent key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ShieldError>;

    fn remove_item(&mut self, key: &str);

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
