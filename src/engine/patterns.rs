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

//! Detection signature library.
//!
//! Static regular-expression sets grouped by concern. Matching is heuristic:
//! false positives and negatives are expected and accepted.

use regex::Regex;
use std::sync::LazyLock;

/// Identifier of the bundled signature set
pub const SIGNATURE_SET_VERSION: &str = "2026.1";

/// A named detection pattern.
#[derive(Debug)]
pub struct Signature {
    pub name: &'static str,
    pub regex: Regex,
}

impl Signature {
    fn compile(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            // Patterns are literals covered by the tests below.
            regex: Regex::new(pattern).expect("built-in signature must compile"),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Injected markup and script URIs.
pub static SCRIPT_INJECTION: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    vec![
        Signature::compile("script_block", r"(?is)<script\b[^>]*>.*?</script\s*>"),
        Signature::compile("javascript_uri", r"(?i)javascript:"),
        Signature::compile("inline_event_handler", r"(?i)\bon\w+\s*="),
        Signature::compile("iframe_block", r"(?is)<iframe\b[^>]*>.*?</iframe\s*>"),
        Signature::compile("object_block", r"(?is)<object\b[^>]*>.*?</object\s*>"),
        Signature::compile("embed_tag", r"(?i)<embed\b[^>]*>"),
    ]
});

/// SQL-injection-like shapes.
pub static QUERY_INJECTION: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    vec![
        Signature::compile(
            "sql_keyword",
            r"(?i)\b(?:SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|UNION)\b",
        ),
        Signature::compile("sql_comment_or_terminator", r"--|/\*|\*/|;"),
        Signature::compile("boolean_or", r"(?i)\bOR\b.*="),
        Signature::compile("boolean_and", r"(?i)\bAND\b.*="),
    ]
});

/// Names hinting at credentials.
pub static SENSITIVE_KEY: LazyLock<Signature> =
    LazyLock::new(|| Signature::compile("sensitive_key", r"(?i)password|token|secret|key|auth"));

fn first_match<'a>(set: &'a [Signature], text: &str) -> Option<&'a Signature> {
    set.iter().find(|sig| sig.is_match(text))
}

pub fn first_script_injection(text: &str) -> Option<&'static Signature> {
    first_match(&SCRIPT_INJECTION, text)
}

pub fn has_script_injection(text: &str) -> bool {
    first_script_injection(text).is_some()
}

pub fn first_query_injection(text: &str) -> Option<&'static Signature> {
    first_match(&QUERY_INJECTION, text)
}

pub fn has_query_injection(text: &str) -> bool {
    first_query_injection(text).is_some()
}

pub fn is_sensitive(text: &str) -> bool {
    SENSITIVE_KEY.is_match(text)
}

/// Remove every script-injection match, one signature after another, until
/// no signature matches any more.
///
/// Each pass only deletes text, so the loop terminates; the result is a fixed
/// point and cleaning it again returns it unchanged.
pub fn strip_script_injection(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut changed = false;
        for sig in SCRIPT_INJECTION.iter() {
            if sig.is_match(&current) {
                current = sig.regex.replace_all(&current, "").into_owned();
                changed = true;
            }
        }
        if !changed {
            return current;
        }
    }
}
