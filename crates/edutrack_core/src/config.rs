//! Core runtime configuration.
//!
//! # Responsibility
//! - Collect tunables (log level, dashboard window, simulated latencies).
//! - Load them from JSON text or a JSON file with per-field defaults.
//!
//! # Invariants
//! - A validated config always has a supported log level and a non-zero
//!   recent-attendance window.

use crate::capture::flow::FlowTimings;
use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Default number of records shown under "recent attendance".
pub const DEFAULT_RECENT_WINDOW: usize = 5;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidLogLevel(String),
    ZeroRecentWindow,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config file: {err}"),
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::ZeroRecentWindow => write!(f, "recent_window must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidLogLevel(_) | Self::ZeroRecentWindow => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub log_level: String,
    pub recent_window: usize,
    pub task_latency_ms: u64,
    pub flow_timings: FlowTimings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            recent_window: DEFAULT_RECENT_WINDOW,
            task_latency_ms: 500,
            flow_timings: FlowTimings::default(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON document. Missing fields keep defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        if self.recent_window == 0 {
            return Err(ConfigError::ZeroRecentWindow);
        }
        Ok(())
    }

    pub fn task_latency(&self) -> Duration {
        Duration::from_millis(self.task_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_RECENT_WINDOW};

    #[test]
    fn partial_document_keeps_defaults() {
        let config =
            CoreConfig::from_json_str(r#"{"recent_window": 10, "flow_timings": {"qr_scan_ms": 0}}"#)
                .unwrap();
        assert_eq!(config.recent_window, 10);
        assert_eq!(config.flow_timings.qr_scan_ms, 0);
        assert_eq!(config.flow_timings.processing_ms, 3_000);
        assert_eq!(config.task_latency_ms, 500);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            CoreConfig::from_json_str(r#"{"recent_window": 0}"#),
            Err(ConfigError::ZeroRecentWindow)
        ));
        assert!(matches!(
            CoreConfig::from_json_str(r#"{"log_level": "loud"}"#),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            CoreConfig::from_json_str(r#"{"colour": "blue"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn file_loading_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edutrack.json");
        std::fs::write(&path, r#"{"task_latency_ms": 0, "log_level": "debug"}"#).unwrap();

        let config = CoreConfig::from_json_file(&path).unwrap();
        assert_eq!(config.task_latency(), std::time::Duration::ZERO);
        assert_eq!(config.log_level, "debug");

        assert!(matches!(
            CoreConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        let config = CoreConfig::default();
        config.validate().unwrap();
        assert_eq!(config.recent_window, DEFAULT_RECENT_WINDOW);
    }
}
