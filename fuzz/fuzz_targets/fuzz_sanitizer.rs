// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use lilith_shield::engine::patterns::{has_script_injection, strip_script_injection};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let once = strip_script_injection(text);
        assert!(!has_script_injection(&once));
        assert_eq!(strip_script_injection(&once), once);
    }
});
