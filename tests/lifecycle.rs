use lilith_shield::engine_core::constants::notice::MARKER_ATTRIBUTE;
use lilith_shield::engine_core::traits::{ContentTree, Topic};
use lilith_shield::guards::MemoryStorage;
use lilith_shield::page::MemoryPage;
use lilith_shield::{ConfigOverrides, EventKind, LifecycleState, SecurityConfig, SecurityMonitor};
use std::time::Duration;

fn strict() -> SecurityMonitor {
    SecurityMonitor::with_overrides(ConfigOverrides {
        strict_mode: Some(true),
        ..ConfigOverrides::default()
    })
    .unwrap()
}

#[test]
fn test_one_subscription_per_detector_after_repeated_initialize() {
    let mut page = MemoryPage::new();
    let mut monitor = strict();

    assert_eq!(monitor.initialize(&mut page), LifecycleState::Active);
    assert_eq!(monitor.initialize(&mut page), LifecycleState::Active);

    for topic in [
        Topic::SecurityPolicyViolation,
        Topic::Mutation,
        Topic::Input,
        Topic::Submit,
        Topic::ContextMenu,
    ] {
        assert_eq!(page.listener_count_for(topic), 1, "{:?}", topic);
    }
    // devtools interval
    assert_eq!(page.pending_timer_count(), 1);
}

#[test]
fn test_forced_failure_leaves_nothing_behind() {
    let mut page = MemoryPage::new();
    page.fail_timers();
    let mut monitor = strict();
    let storage = monitor.guard_storage(MemoryStorage::new());

    assert_eq!(monitor.initialize(&mut page), LifecycleState::Uninitialized);
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.pending_timer_count(), 0);
    assert!(!storage.is_armed());
}

#[test]
fn test_failure_does_not_poison_later_attempt() {
    let mut failing = MemoryPage::new();
    failing.fail_subscriptions(Topic::Mutation);
    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    assert_eq!(monitor.initialize(&mut failing), LifecycleState::Uninitialized);

    let mut page = MemoryPage::new();
    assert_eq!(monitor.initialize(&mut page), LifecycleState::Active);
}

#[test]
fn test_cleanup_cancels_pending_notice_and_is_repeatable() {
    let mut page = MemoryPage::new();
    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    monitor.initialize(&mut page);

    let body = page.body().unwrap();
    let field = page.element("input", &[("name", "comment")]);
    page.insert(body, field);
    page.type_text(field, "<script>x()</script>");
    assert_eq!(page.pending_timer_count(), 1);

    monitor.cleanup(&mut page);
    assert_eq!(monitor.state(), LifecycleState::Uninitialized);
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.pending_timer_count(), 0);

    // The banner stays, nothing is left to dismiss it.
    page.advance(Duration::from_secs(10));
    assert_eq!(page.elements_with_attribute(MARKER_ATTRIBUTE).len(), 1);

    monitor.cleanup(&mut page);
    assert_eq!(monitor.state(), LifecycleState::Uninitialized);
}

#[test]
fn test_cleanup_then_reinitialize() {
    let mut page = MemoryPage::new();
    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    monitor.initialize(&mut page);
    monitor.cleanup(&mut page);

    assert_eq!(monitor.initialize(&mut page), LifecycleState::Active);
    assert_eq!(page.listener_count_for(Topic::Input), 1);
}

#[test]
fn test_sweep_strips_existing_onclick() {
    let mut page = MemoryPage::new();
    let body = page.body().unwrap();
    let button = page.element("button", &[("onclick", "steal()"), ("id", "buy")]);
    page.preload(body, button);

    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    monitor.initialize(&mut page);

    assert!(page.attribute(button, "onclick").is_none());
    let events = monitor.security_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::DangerousElement);
}

#[test]
fn test_sweep_skipped_without_xss_protection() {
    let mut page = MemoryPage::new();
    let body = page.body().unwrap();
    let button = page.element("button", &[("onclick", "ok()")]);
    page.preload(body, button);

    let mut monitor = SecurityMonitor::with_overrides(ConfigOverrides {
        enable_xss_protection: Some(false),
        ..ConfigOverrides::default()
    })
    .unwrap();
    monitor.initialize(&mut page);

    assert_eq!(page.attribute(button, "onclick").as_deref(), Some("ok()"));
    assert!(monitor.security_events().is_empty());
}

#[test]
fn test_events_survive_cleanup_and_clear_independently() {
    let mut page = MemoryPage::new();
    page.set_framed(true, false);
    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    monitor.initialize(&mut page);
    monitor.cleanup(&mut page);

    let events = monitor.security_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::FrameBustingBlocked);

    monitor.clear_security_events();
    assert!(monitor.security_events().is_empty());
}

#[test]
fn test_snapshot_is_detached() {
    let mut page = MemoryPage::new();
    page.set_framed(true, false);
    let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
    monitor.initialize(&mut page);

    let mut events = monitor.security_events();
    events.clear();
    assert_eq!(monitor.security_events().len(), 1);
}

#[test]
fn test_disabled_audit_still_stores_events() {
    let mut page = MemoryPage::new();
    page.set_framed(true, false);
    let mut monitor = SecurityMonitor::with_overrides(ConfigOverrides {
        log_security_events: Some(false),
        ..ConfigOverrides::default()
    })
    .unwrap();
    monitor.initialize(&mut page);
    assert_eq!(monitor.security_events().len(), 1);
}
