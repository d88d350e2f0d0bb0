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

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::engine::patterns::is_sensitive;
use crate::engine_core::errors::ShieldError;
use crate::engine_core::event_log::EventLog;
use crate::engine_core::events::EventKind;
use crate::engine_core::registry::GuardSwitch;
use crate::engine_core::traits::KeyValueStore;

/// Storage decorator. Audit only: writes of credential-looking keys or
/// values are logged while armed, and every write still goes through.
pub struct GuardedStorage<S> {
    inner: S,
    log: Arc<EventLog>,
    switch: GuardSwitch,
}

impl<S: KeyValueStore> GuardedStorage<S> {
    pub fn new(inner: S, log: Arc<EventLog>, switch: GuardSwitch) -> Self {
        Self { inner, log, switch }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn is_armed(&self) -> bool {
        self.switch.is_armed()
    }
}

impl<S: KeyValueStore> KeyValueStore for GuardedStorage<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ShieldError> {
        if self.is_armed() && (is_sensitive(key) || is_sensitive(value)) {
            info!("Sensitive write to storage key '{}'", key);
            self.log.record(
                EventKind::SensitiveStorage,
                format!("Sensitive data stored with key: {}", key),
            );
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) {
        self.inner.remove_item(key)
    }

    fn clear(&mut self) {
        self.inner.clear()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// In-memory key-value store with an optional quota on the total byte size
/// of keys and values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ShieldError> {
        if let Some(quota) = self.quota {
            let replaced = self.items.get(key).map_or(0, |v| key.len() + v.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(ShieldError::Storage(format!(
                    "Quota of {} bytes exceeded writing '{}'",
                    quota, key
                )));
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_counts_replaced_entries() {
        let mut store = MemoryStorage::with_quota(10);
        store.set_item("k", "123456789").unwrap();
        store.set_item("k", "987654321").unwrap();
        assert!(matches!(
            store.set_item("x", "y"),
            Err(ShieldError::Storage(_))
        ));
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_disarmed_guard_is_silent() {
        let log = Arc::new(EventLog::default());
        let mut store = GuardedStorage::new(MemoryStorage::new(), log.clone(), GuardSwitch::new());
        store.set_item("password", "hunter2").unwrap();
        assert!(log.is_empty());
        assert_eq!(store.get_item("password").as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_sensitive_value_under_plain_key() {
        let log = Arc::new(EventLog::default());
        let switch = GuardSwitch::new();
        switch.set(true);
        let mut store = GuardedStorage::new(MemoryStorage::new(), log.clone(), switch);
        store.set_item("prefs", "theme=dark").unwrap();
        store.set_item("session", "Bearer token abc").unwrap();
        assert_eq!(log.count_of(EventKind::SensitiveStorage), 1);
        assert_eq!(store.len(), 2);
    }
}
