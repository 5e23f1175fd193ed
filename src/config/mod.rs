//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Configuration validation
//! - Default value handling
//!
//! # Example
//!
//! ```
//! use fitness_tracker::config::{Config, RecordPolicy, DEFAULT_DATABASE_PATH};
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     database_path: DEFAULT_DATABASE_PATH.to_string(),
//!     log_level: "info".to_string(),
//!     max_connections: 5,
//!     record_policy: RecordPolicy::BestEffort,
//! };
//!
//! assert_eq!(config.record_policy.as_str(), "best_effort");
//! ```

mod validation;

pub use validation::{validate_config, MAX_CONNECTIONS, MIN_CONNECTIONS};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Default database path.
pub const DEFAULT_DATABASE_PATH: &str = "./data/fitness_tracker.db";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default connection pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How a failed personal-record update affects the workout being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Log the failure, report it in the receipt and keep the workout.
    #[default]
    BestEffort,
    /// Abort and roll back the whole workout.
    Strict,
}

impl RecordPolicy {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BestEffort => "best_effort",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for RecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            _ => Err(ConfigError::InvalidValue {
                var: "RECORD_UPDATE_POLICY".into(),
                reason: format!("unknown policy '{s}', expected best_effort or strict"),
            }),
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database path.
    pub database_path: String,
    /// Log level (error, warn, info, debug, trace) or any `EnvFilter` directive.
    pub log_level: String,
    /// Maximum pooled database connections.
    pub max_connections: u32,
    /// Behaviour when a personal-record update fails inside a workout insert.
    pub record_policy: RecordPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.into(),
            log_level: DEFAULT_LOG_LEVEL.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            record_policy: RecordPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `DATABASE_PATH`: Path to `SQLite` database (default: `./data/fitness_tracker.db`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `MAX_CONNECTIONS`: Connection pool size (default: `5`)
    /// - `RECORD_UPDATE_POLICY`: `best_effort` or `strict` (default: `best_effort`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `MAX_CONNECTIONS` is not a valid positive integer
    /// - `RECORD_UPDATE_POLICY` names an unknown policy
    /// - Any value fails validation (see [`validate_config`])
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();
        Self::from_process_env()
    }

    /// Load configuration after reading variables from a specific env file.
    ///
    /// Variables already set in the process environment take precedence over
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the file cannot be read, or for
    /// any of the reasons listed on [`Config::from_env`].
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        dotenvy::from_path(path).map_err(|e| ConfigError::InvalidValue {
            var: path.display().to_string(),
            reason: format!("failed to read env file: {e}"),
        })?;
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self, ConfigError> {
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.into());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let max_connections = parse_env_u32("MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let record_policy = match std::env::var("RECORD_UPDATE_POLICY") {
            Ok(val) => val.parse()?,
            Err(_) => RecordPolicy::default(),
        };

        let config = Self {
            database_path,
            log_level,
            max_connections,
            record_policy,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Build the tracing filter for [`Config::log_level`].
    ///
    /// An unparseable directive falls back to `info`.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }

    /// Replace the database path, e.g. from a command-line override.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }
}

/// Parse an environment variable as u32, using a default if not set.
fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to set up a clean test environment.
    fn setup_test_env() {
        env::remove_var("DATABASE_PATH");
        env::remove_var("LOG_LEVEL");
        env::remove_var("MAX_CONNECTIONS");
        env::remove_var("RECORD_UPDATE_POLICY");
    }

    #[test]
    #[serial]
    fn test_config_from_env_with_all_vars() {
        setup_test_env();

        env::set_var("DATABASE_PATH", "/custom/gym.db");
        env::set_var("LOG_LEVEL", "debug");
        env::set_var("MAX_CONNECTIONS", "8");
        env::set_var("RECORD_UPDATE_POLICY", "strict");

        let config = Config::from_env().expect("should load config");

        assert_eq!(config.database_path, "/custom/gym.db");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.record_policy, RecordPolicy::Strict);

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        setup_test_env();

        let config = Config::from_env().expect("should load config");

        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.record_policy, RecordPolicy::BestEffort);
    }

    #[test]
    #[serial]
    fn test_config_invalid_connections_format() {
        setup_test_env();
        env::set_var("MAX_CONNECTIONS", "lots");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "MAX_CONNECTIONS"
        ));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_connections_validation_failure() {
        setup_test_env();
        env::set_var("MAX_CONNECTIONS", "0");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "MAX_CONNECTIONS"
        ));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_unknown_policy() {
        setup_test_env();
        env::set_var("RECORD_UPDATE_POLICY", "sometimes");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == "RECORD_UPDATE_POLICY"
        ));

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_log_level_from_env_file() {
        setup_test_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let env_file = temp_dir.path().join(".env");
        std::fs::write(&env_file, "LOG_LEVEL=debug\nDATABASE_PATH=/tmp/from-file.db\n").unwrap();

        let config = Config::from_env_file(&env_file).expect("should load config");

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database_path, "/tmp/from-file.db");
        assert_eq!(
            config.log_filter().max_level_hint(),
            Some(tracing::level_filters::LevelFilter::DEBUG)
        );

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_process_env_overrides_env_file() {
        setup_test_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let env_file = temp_dir.path().join(".env");
        std::fs::write(&env_file, "LOG_LEVEL=trace\n").unwrap();
        env::set_var("LOG_LEVEL", "warn");

        let config = Config::from_env_file(&env_file).expect("should load config");
        assert_eq!(config.log_level, "warn");

        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_missing_env_file() {
        setup_test_env();
        let temp_dir = tempfile::tempdir().unwrap();

        let result = Config::from_env_file(temp_dir.path().join("absent.env"));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_log_filter_levels() {
        let config = Config {
            log_level: "warn".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.log_filter().max_level_hint(),
            Some(tracing::level_filters::LevelFilter::WARN)
        );
    }

    #[test]
    fn test_log_filter_invalid_falls_back_to_info() {
        let config = Config {
            log_level: "fitness_tracker=loud".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.log_filter().max_level_hint(),
            Some(tracing::level_filters::LevelFilter::INFO)
        );
    }

    #[test]
    fn test_record_policy_parse() {
        assert_eq!("best_effort".parse::<RecordPolicy>().unwrap(), RecordPolicy::BestEffort);
        assert_eq!("Best-Effort".parse::<RecordPolicy>().unwrap(), RecordPolicy::BestEffort);
        assert_eq!(" STRICT ".parse::<RecordPolicy>().unwrap(), RecordPolicy::Strict);
        assert!("".parse::<RecordPolicy>().is_err());
    }

    #[test]
    fn test_record_policy_display() {
        assert_eq!(RecordPolicy::Strict.to_string(), "strict");
        assert_eq!(RecordPolicy::BestEffort.to_string(), "best_effort");
    }

    #[test]
    fn test_with_database_path() {
        let config = Config::default().with_database_path("/tmp/override.db");
        assert_eq!(config.database_path, "/tmp/override.db");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_parse_env_u32_default() {
        env::remove_var("TEST_FT_U32_MISSING");
        let result = parse_env_u32("TEST_FT_U32_MISSING", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_parse_env_u32_invalid() {
        env::set_var("TEST_FT_U32_INVALID", "-3");
        let result = parse_env_u32("TEST_FT_U32_INVALID", 0);
        assert!(result.is_err());
        env::remove_var("TEST_FT_U32_INVALID");
    }
}
