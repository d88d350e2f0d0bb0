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

//! Outbound URL classification.
//!
//! Fail closed: anything that is neither same-origin relative nor on the
//! origin allow-list is rejected.

use regex::{Regex, RegexBuilder};
use reqwest::Url;
use std::fmt;
use std::sync::LazyLock;

use crate::engine_core::constants::network::RELATIVE_PREFIXES;
use crate::engine_core::errors::ShieldError;

static UNSAFE_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>"']"#).expect("built-in pattern must compile"));
static SCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bjavascript:").expect("built-in pattern must compile"));
static DATA_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdata:").expect("built-in pattern must compile"));
/// Stand-in page origin used to check where a relative reference lands.
static SAME_ORIGIN_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("http://same-origin.invalid/page/").expect("built-in base URL must parse")
});
static HOST_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?$").expect("built-in pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    Relative,
    AllowListed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    UnsafeCharacters,
    ScriptScheme,
    DataScheme,
    UnlistedOrigin,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnsafeCharacters => "URL contains angle brackets or quotes",
            Self::ScriptScheme => "javascript: scheme",
            Self::DataScheme => "data: scheme",
            Self::UnlistedOrigin => "origin is not on the allow-list",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlVerdict {
    Allowed(AllowReason),
    Blocked(BlockReason),
}

impl UrlVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, UrlVerdict::Allowed(_))
    }
}

/// Classifier built from a list of allowed hosts.
///
/// An entry `example.com` admits `http(s)://example.com` and any of its
/// subdomains, with an optional port.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    allow_list: Option<Regex>,
}

impl UrlClassifier {
    pub fn new<S: AsRef<str>>(allowed_origins: &[S]) -> Result<Self, ShieldError> {
        let mut hosts = Vec::with_capacity(allowed_origins.len());
        for origin in allowed_origins {
            hosts.push(regex::escape(&Self::validate_host(origin.as_ref())?));
        }

        if hosts.is_empty() {
            return Ok(Self { allow_list: None });
        }

        let pattern = format!(
            r"^https?://(?:[a-z0-9-]+\.)*(?:{})(?::\d+)?(?:[/?#]|$)",
            hosts.join("|")
        );
        let allow_list = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ShieldError::Configuration(format!("Invalid allow-list: {}", e)))?;

        Ok(Self {
            allow_list: Some(allow_list),
        })
    }

    /// Reject allow-list entries that are not bare host names.
    pub fn validate_host(entry: &str) -> Result<String, ShieldError> {
        let host = entry.trim().to_ascii_lowercase();
        if host.is_empty() {
            return Err(ShieldError::Configuration(
                "Allowed origin cannot be empty".to_string(),
            ));
        }
        if !HOST_ENTRY.is_match(&host) {
            return Err(ShieldError::Configuration(format!(
                "Allowed origin '{}' must be a bare host name (no scheme, port or path)",
                entry
            )));
        }
        Ok(host)
    }

    /// Rewrite `url` the way a URL parser reads it: surrounding controls
    /// and spaces trimmed, tab/CR/LF dropped, `\` read as `/`.
    pub fn normalize(url: &str) -> String {
        url.trim_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .map(|c| if c == '\\' { '/' } else { c })
            .collect()
    }

    pub fn classify(&self, url: &str) -> UrlVerdict {
        if UNSAFE_CHARACTERS.is_match(url) {
            return UrlVerdict::Blocked(BlockReason::UnsafeCharacters);
        }

        let normalized = Self::normalize(url);
        if SCRIPT_SCHEME.is_match(&normalized) {
            return UrlVerdict::Blocked(BlockReason::ScriptScheme);
        }
        if DATA_SCHEME.is_match(&normalized) {
            return UrlVerdict::Blocked(BlockReason::DataScheme);
        }

        // `//host/path` is protocol-relative, not same-origin.
        if !normalized.starts_with("//")
            && RELATIVE_PREFIXES.iter().any(|p| normalized.starts_with(p))
            && stays_same_origin(url)
        {
            return UrlVerdict::Allowed(AllowReason::Relative);
        }

        match &self.allow_list {
            Some(re) if re.is_match(&normalized) => UrlVerdict::Allowed(AllowReason::AllowListed),
            _ => UrlVerdict::Blocked(BlockReason::UnlistedOrigin),
        }
    }
}

/// True when resolving `url` against a page keeps that page's origin.
fn stays_same_origin(url: &str) -> bool {
    let base = &*SAME_ORIGIN_BASE;
    base.join(url).is_ok_and(|resolved| {
        resolved.scheme() == base.scheme()
            && resolved.host_str() == base.host_str()
            && resolved.port_or_known_default() == base.port_or_known_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> UrlClassifier {
        UrlClassifier::new(&["localhost", "app.example.com"]).unwrap()
    }

    #[test]
    fn test_relative_urls_allowed() {
        let c = classifier();
        for url in ["/api/x", "./data.json", "../up/one", "/"] {
            assert_eq!(c.classify(url), UrlVerdict::Allowed(AllowReason::Relative), "{}", url);
        }
    }

    #[test]
    fn test_allow_list_is_anchored() {
        let c = classifier();
        assert!(c.classify("https://app.example.com/v1").is_allowed());
        assert!(c.classify("http://localhost:8080/health").is_allowed());
        assert!(c.classify("https://cdn.app.example.com").is_allowed());
        assert!(c.classify("HTTPS://APP.EXAMPLE.COM?x=1").is_allowed());

        assert_eq!(
            c.classify("http://evil.example/x"),
            UrlVerdict::Blocked(BlockReason::UnlistedOrigin)
        );
        assert!(!c.classify("https://app.example.com.evil.io/").is_allowed());
        assert!(!c.classify("https://evil.io/?next=https://app.example.com/").is_allowed());
        assert!(!c.classify("https://notlocalhost/").is_allowed());
    }

    #[test]
    fn test_script_and_data_schemes_blocked_regardless_of_origin() {
        let c = classifier();
        assert_eq!(
            c.classify("javascript:fetch('x')"),
            UrlVerdict::Blocked(BlockReason::UnsafeCharacters)
        );
        assert_eq!(
            c.classify("JavaScript:alert(1)"),
            UrlVerdict::Blocked(BlockReason::ScriptScheme)
        );
        assert_eq!(
            c.classify("https://app.example.com/go?to=javascript:alert(1)"),
            UrlVerdict::Blocked(BlockReason::ScriptScheme)
        );
        assert_eq!(
            c.classify("data:text/html,hi"),
            UrlVerdict::Blocked(BlockReason::DataScheme)
        );
        assert!(c.classify("/api/metadata:v2").is_allowed());
    }

    #[test]
    fn test_unsafe_characters_blocked_even_when_relative() {
        let c = classifier();
        assert_eq!(
            c.classify("/search?q=<svg>"),
            UrlVerdict::Blocked(BlockReason::UnsafeCharacters)
        );
        assert!(!c.classify("/a\"b").is_allowed());
    }

    #[test]
    fn test_protocol_relative_and_bare_paths_need_allow_list() {
        let c = classifier();
        assert!(!c.classify("//evil.example/x").is_allowed());
        assert!(!c.classify("api/x").is_allowed());

        for url in [
            "/\\evil.example/steal",
            "\\\\evil.example/steal",
            "/\t/evil.example/steal",
            "\t//evil.example/steal",
            "/\n/evil.example/steal",
            "/\r\\evil.example/steal",
            " //evil.example/steal",
        ] {
            assert_eq!(
                c.classify(url),
                UrlVerdict::Blocked(BlockReason::UnlistedOrigin),
                "{:?}",
                url
            );
        }
    }

    #[test]
    fn test_backslash_and_whitespace_read_like_a_url_parser() {
        let c = classifier();
        assert_eq!(UrlClassifier::normalize(" /a\\b\t/c\n"), "/a/b/c");
        assert!(c.classify("/api\\items").is_allowed());
        assert!(c.classify("http:\\\\localhost\\x").is_allowed());
        assert_eq!(
            c.classify("java\tscript:alert(1)"),
            UrlVerdict::Blocked(BlockReason::ScriptScheme)
        );
        assert!(!c.classify("http:\\\\evil.example\\localhost").is_allowed());
    }

    #[test]
    fn test_empty_allow_list_blocks_all_absolute() {
        let c = UrlClassifier::new::<&str>(&[]).unwrap();
        assert!(!c.classify("http://localhost/").is_allowed());
        assert!(c.classify("/ok").is_allowed());
    }

    #[test]
    fn test_invalid_allow_list_entries_rejected() {
        assert!(UrlClassifier::new(&["https://example.com"]).is_err());
        assert!(UrlClassifier::new(&["example.com/path"]).is_err());
        assert!(UrlClassifier::new(&[" "]).is_err());
    }
}
