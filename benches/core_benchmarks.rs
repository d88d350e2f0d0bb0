use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lilith_shield::engine::patterns::{has_query_injection, strip_script_injection};
use lilith_shield::engine::url_classifier::UrlClassifier;
use lilith_shield::engine_core::event_log::EventLog;
use lilith_shield::engine_core::traits::ContentTree;
use lilith_shield::page::MemoryPage;
use lilith_shield::{EventKind, SecurityConfig, SecurityMonitor};

fn bench_sanitizer(c: &mut Criterion) {
    let payload = "hello <script>alert(document.cookie)</script> <img src=x onerror=steal()> \
                   <iframe src=javascript:void(0)></iframe> world";

    c.bench_function("strip_script_injection", |b| {
        b.iter(|| strip_script_injection(black_box(payload)))
    });
}

fn bench_query_signatures(c: &mut Criterion) {
    let clean = "a perfectly ordinary comment about the weather and nothing else";

    c.bench_function("query_injection_clean_text", |b| {
        b.iter(|| has_query_injection(black_box(clean)))
    });
}

fn bench_url_classifier(c: &mut Criterion) {
    let classifier = UrlClassifier::new(&["localhost", "127.0.0.1", "api.example.com"]).unwrap();

    c.bench_function("classify_allowed_origin", |b| {
        b.iter(|| classifier.classify(black_box("https://api.example.com:8443/v1/items?page=2")))
    });
}

fn bench_event_log_append(c: &mut Criterion) {
    let log = EventLog::default();

    c.bench_function("event_log_append_full", |b| {
        b.iter(|| log.record(EventKind::SuspiciousRequest, black_box("http://evil.example/")))
    });
}

fn bench_initialize(c: &mut Criterion) {
    c.bench_function("monitor_initialize_and_cleanup", |b| {
        b.iter(|| {
            let mut page = MemoryPage::new();
            let body = page.body().unwrap();
            for _ in 0..50 {
                let el = page.element("div", &[("onclick", "x()")]);
                page.preload(body, el);
            }
            let mut monitor = SecurityMonitor::new(SecurityConfig::default()).unwrap();
            monitor.initialize(&mut page);
            monitor.cleanup(&mut page);
        })
    });
}

criterion_group!(
    benches,
    bench_sanitizer,
    bench_query_signatures,
    bench_url_classifier,
    bench_event_log_append,
    bench_initialize
);
criterion_main!(benches);
