//! Application settings for the upload workflow.
//!
//! Every field has a default, so a partial JSON document only overrides what
//! it names. Malformed input never blocks the app: it is logged and the
//! defaults are used instead.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name given to the company created on the first upload of a session.
    pub default_company_name: String,
    /// Session storage key holding the serialized record store.
    pub storage_key: String,
    /// Uploads larger than this are rejected before being read.
    pub max_file_size_mb: u64,
    /// Pause between a successful column read and showing the mapping step.
    pub settle_delay_ms: u64,
    /// How long the wizard stays on its processing screen after confirm.
    pub processing_delay_ms: u64,
    /// Simulated latency of the placeholder reader for unknown formats.
    pub placeholder_read_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_company_name: "My Company".to_string(),
            storage_key: "omni-insights.session".to_string(),
            max_file_size_mb: 50,
            settle_delay_ms: 2000,
            processing_delay_ms: 2000,
            placeholder_read_delay_ms: 100,
        }
    }
}

impl AppConfig {
    /// Parses `raw` over the defaults, falling back to `AppConfig::default()`
    /// when the document cannot be read.
    pub fn from_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<AppConfig>(raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("[config] Failed to parse app config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn placeholder_read_delay(&self) -> Duration {
        Duration::from_millis(self.placeholder_read_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = AppConfig::from_json(r#"{ "max_file_size_mb": 5, "settle_delay_ms": 0 }"#);
        assert_eq!(
            config,
            AppConfig {
                max_file_size_mb: 5,
                settle_delay_ms: 0,
                ..AppConfig::default()
            }
        );
        assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn malformed_document_falls_back_to_defaults() {
        assert_eq!(AppConfig::from_json("{ not json"), AppConfig::default());
        assert_eq!(AppConfig::from_json(""), AppConfig::default());
    }

    #[test]
    fn delays_are_milliseconds() {
        let config = AppConfig::default();
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.placeholder_read_delay(), Duration::from_millis(100));
    }
}
