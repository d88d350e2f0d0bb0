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

use crate::engine::url_classifier::UrlClassifier;
use crate::engine_core::constants::network::DEFAULT_ALLOWED_ORIGINS;
use crate::engine_core::errors::ShieldError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which detectors a monitor activates. Fixed for the life of a monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub enable_csp: bool,
    pub enable_xss_protection: bool,
    pub enable_input_sanitization: bool,
    pub enable_form_validation: bool,
    pub enable_network_security: bool,
    pub enable_storage_security: bool,
    /// Emit every stored event on the audit target
    pub log_security_events: bool,
    pub strict_mode: bool,
    /// Bare host names the network guard lets through
    pub allowed_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_csp: true,
            enable_xss_protection: true,
            enable_input_sanitization: true,
            enable_form_validation: true,
            enable_network_security: true,
            enable_storage_security: true,
            log_security_events: true,
            strict_mode: false,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SecurityConfig {
    /// Every detector off. Useful as a base for enabling a single one.
    pub fn disabled() -> Self {
        Self {
            enable_csp: false,
            enable_xss_protection: false,
            enable_input_sanitization: false,
            enable_form_validation: false,
            enable_network_security: false,
            enable_storage_security: false,
            log_security_events: false,
            strict_mode: false,
            ..Self::default()
        }
    }

    /// Merge the fields `overrides` sets over `self`.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            enable_csp,
            enable_xss_protection,
            enable_input_sanitization,
            enable_form_validation,
            enable_network_security,
            enable_storage_security,
            log_security_events,
            strict_mode,
            allowed_origins,
        } = overrides;

        if let Some(v) = enable_csp {
            self.enable_csp = v;
        }
        if let Some(v) = enable_xss_protection {
            self.enable_xss_protection = v;
        }
        if let Some(v) = enable_input_sanitization {
            self.enable_input_sanitization = v;
        }
        if let Some(v) = enable_form_validation {
            self.enable_form_validation = v;
        }
        if let Some(v) = enable_network_security {
            self.enable_network_security = v;
        }
        if let Some(v) = enable_storage_security {
            self.enable_storage_security = v;
        }
        if let Some(v) = log_security_events {
            self.log_security_events = v;
        }
        if let Some(v) = strict_mode {
            self.strict_mode = v;
        }
        if let Some(v) = allowed_origins {
            self.allowed_origins = v;
        }
        self
    }

    /// Fail fast on allow-list entries the network guard could not use.
    pub fn validate(&self) -> Result<(), ShieldError> {
        for origin in &self.allowed_origins {
            UrlClassifier::validate_host(origin)?;
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ShieldError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ShieldError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

/// Partial configuration; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub enable_csp: Option<bool>,
    pub enable_xss_protection: Option<bool>,
    pub enable_input_sanitization: Option<bool>,
    pub enable_form_validation: Option<bool>,
    pub enable_network_security: Option<bool>,
    pub enable_storage_security: Option<bool>,
    pub log_security_events: Option<bool>,
    pub strict_mode: Option<bool>,
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SecurityConfig::default();
        assert!(config.enable_csp && config.enable_network_security);
        assert!(!config.strict_mode);
        assert_eq!(config.allowed_origins, vec!["localhost", "127.0.0.1"]);
    }

    #[test]
    fn test_overrides_only_touch_set_fields() {
        let merged = SecurityConfig::default().apply(ConfigOverrides {
            strict_mode: Some(true),
            enable_csp: Some(false),
            ..ConfigOverrides::default()
        });
        assert!(merged.strict_mode);
        assert!(!merged.enable_csp);
        assert!(merged.enable_storage_security);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SecurityConfig::from_yaml_str(
            "strict_mode: true\nallowed_origins: [api.example.com]\n",
        )
        .unwrap();
        assert!(config.strict_mode);
        assert!(config.enable_form_validation);
        assert_eq!(config.allowed_origins, vec!["api.example.com"]);
    }

    #[test]
    fn test_rejects_origin_with_scheme() {
        let err = SecurityConfig::from_yaml_str("allowed_origins: ['https://evil.example']\n")
            .unwrap_err();
        assert!(matches!(err, ShieldError::Configuration(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enable_storage_security: false").unwrap();
        let config = SecurityConfig::from_path(file.path()).unwrap();
        assert!(!config.enable_storage_security);
        assert!(config.enable_csp);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SecurityConfig::from_path("/nonexistent/shield.yaml").unwrap_err();
        assert!(matches!(err, ShieldError::Io(_)));
    }

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(!logging.is_json());
    }
}
