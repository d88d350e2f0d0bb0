// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use lilith_shield::engine::url_classifier::{AllowReason, UrlClassifier, UrlVerdict};

/// Allow-list entries plus a URL to classify against them.
#[derive(Debug, Arbitrary)]
struct FuzzUrlInput {
    origins: Vec<String>,
    url: String,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    if let Ok(input) = FuzzUrlInput::arbitrary(&mut unstructured) {
        // Invalid entries must be rejected, never panic.
        let Ok(classifier) = UrlClassifier::new(input.origins.as_slice()) else {
            return;
        };
        let verdict = classifier.classify(&input.url);

        if input.url.contains(['<', '>', '"', '\'']) {
            assert!(!verdict.is_allowed());
        }
        if UrlClassifier::normalize(&input.url).starts_with("//") {
            assert!(!matches!(verdict, UrlVerdict::Allowed(AllowReason::Relative)));
        }
    }
});
