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

use async_trait::async_trait;
use tracing::warn;

use crate::engine::url_classifier::{UrlClassifier, UrlVerdict};
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::models::{FetchRequest, FetchResponse};
use crate::engine_core::registry::GuardSwitch;
use crate::engine_core::traits::Transport;

/// Network decorator. While armed, requests to unsafe or unlisted URLs are
/// rejected before they reach the inner transport (fail closed). Allowed
/// requests are forwarded unchanged.
pub struct GuardedTransport<T> {
    inner: T,
    classifier: Arc<UrlClassifier>,
    log: Arc<EventLog>,
    switch: GuardSwitch,
}

impl<T: Transport> GuardedTransport<T> {
    pub fn new(
        inner: T,
        classifier: Arc<UrlClassifier>,
        log: Arc<EventLog>,
        switch: GuardSwitch,
    ) -> Self {
        Self {
            inner,
            classifier,
            log,
            switch,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn is_armed(&self) -> bool {
        self.switch.is_armed()
    }

    /// Classify `url`, logging and failing on a block. Always passes while
    /// the guard is disarmed.
    pub fn check(&self, url: &str) -> Result<(), ShieldError> {
        if !self.is_armed() {
            return Ok(());
        }
        match self.classifier.classify(url) {
            UrlVerdict::Allowed(_) => Ok(()),
            UrlVerdict::Blocked(reason) => {
                warn!("Blocked request to {} ({})", url, reason);
                self.log.record(
                    EventKind::SuspiciousRequest,
                    format!("Blocked suspicious request to: {}", url),
                );
                Err(ShieldError::RequestBlocked {
                    url: url.to_string(),
                    reason: reason.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for GuardedTransport<T> {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ShieldError> {
        self.check(&request.url)?;
        self.inner.fetch(request).await
    }
}
