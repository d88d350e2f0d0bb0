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

//! Domain models for lilith-shield.
//!
//! This module contains pure data structures shared between the monitor, the
//! detectors and the host abstraction. It is free of I/O side effects.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Newtype wrapper around Uuid identifying one monitor instance in audit logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonitorId(Uuid);

impl MonitorId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generate a new random MonitorId
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for MonitorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(MonitorId)
    }
}

impl From<MonitorId> for String {
    fn from(id: MonitorId) -> Self {
        id.0.to_string()
    }
}

impl TryFrom<String> for MonitorId {
    type Error = uuid::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Uuid::parse_str(&s).map(MonitorId)
    }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Activation state of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initializing,
    Active,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Initializing => "INITIALIZING",
            Self::Active => "ACTIVE",
        };
        f.write_str(s)
    }
}

/// Handle to a node of the host's content tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle to a registered event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Handle to a scheduled timer (interval or timeout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Outer (window chrome included) and inner (content) viewport dimensions in px
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub outer_width: u32,
    pub outer_height: u32,
    pub inner_width: u32,
    pub inner_height: u32,
}

impl Viewport {
    /// Viewport with no chrome around the content area
    pub fn uniform(width: u32, height: u32) -> Self {
        Self {
            outer_width: width,
            outer_height: height,
            inner_width: width,
            inner_height: height,
        }
    }

    /// Largest of the horizontal and vertical outer/inner gaps
    pub fn chrome_gap(&self) -> u32 {
        let horizontal = self.outer_width.saturating_sub(self.inner_width);
        let vertical = self.outer_height.saturating_sub(self.inner_height);
        horizontal.max(vertical)
    }
}

/// Browser-issued content-security-policy violation report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CspViolationReport {
    #[serde(rename = "blockedURI", default)]
    pub blocked_uri: String,
    #[serde(rename = "violatedDirective", default)]
    pub violated_directive: String,
    #[serde(rename = "documentURI", default, skip_serializing_if = "Option::is_none")]
    pub document_uri: Option<String>,
    #[serde(rename = "effectiveDirective", default, skip_serializing_if = "Option::is_none")]
    pub effective_directive: Option<String>,
    #[serde(rename = "originalPolicy", default, skip_serializing_if = "Option::is_none")]
    pub original_policy: Option<String>,
}

impl CspViolationReport {
    pub fn new(blocked_uri: impl Into<String>, violated_directive: impl Into<String>) -> Self {
        Self {
            blocked_uri: blocked_uri.into(),
            violated_directive: violated_directive.into(),
            ..Self::default()
        }
    }

    /// Parse the JSON body of a violation report
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// The browser refused to let a framed page navigate its top-level context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAccessDenied {
    pub reason: String,
}

impl fmt::Display for FrameAccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Outbound network call issued by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl FetchRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new("POST", url).with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Response of the underlying network primitive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_id_round_trip() {
        let id = MonitorId::generate();
        let s: String = id.into();
        assert_eq!(s.parse::<MonitorId>().unwrap(), id);
    }

    #[test]
    fn test_chrome_gap_takes_larger_axis() {
        let vp = Viewport {
            outer_width: 1400,
            outer_height: 900,
            inner_width: 1380,
            inner_height: 600,
        };
        assert_eq!(vp.chrome_gap(), 300);
        assert_eq!(Viewport::uniform(800, 600).chrome_gap(), 0);
    }

    #[test]
    fn test_inner_larger_than_outer_saturates() {
        let vp = Viewport {
            outer_width: 100,
            outer_height: 100,
            inner_width: 400,
            inner_height: 400,
        };
        assert_eq!(vp.chrome_gap(), 0);
    }

    #[test]
    fn test_csp_report_from_browser_json() {
        let body = r#"{
            "documentURI": "https://app.example/",
            "blockedURI": "https://cdn.evil/x.js",
            "violatedDirective": "script-src-elem",
            "originalPolicy": "script-src 'self'"
        }"#;
        let report = CspViolationReport::from_json(body).unwrap();

        assert_eq!(report.blocked_uri, "https://cdn.evil/x.js");
        assert_eq!(report.violated_directive, "script-src-elem");
        assert_eq!(report.document_uri.as_deref(), Some("https://app.example/"));
        assert!(report.effective_directive.is_none());
    }
}
