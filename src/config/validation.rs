//! Configuration validation.
//!
//! Ensures configuration values are within acceptable ranges.

use super::Config;
use crate::error::ConfigError;

/// Minimum pool size.
pub const MIN_CONNECTIONS: u32 = 1;

/// Maximum pool size. `SQLite` serializes writers, so more buys nothing.
pub const MAX_CONNECTIONS: u32 = 32;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `DATABASE_PATH` must not be empty
/// - `MAX_CONNECTIONS` must be between 1 and 32
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "DATABASE_PATH".into(),
            reason: "must not be empty".into(),
        });
    }

    if !(MIN_CONNECTIONS..=MAX_CONNECTIONS).contains(&config.max_connections) {
        return Err(ConfigError::InvalidValue {
            var: "MAX_CONNECTIONS".into(),
            reason: format!("must be between {MIN_CONNECTIONS} and {MAX_CONNECTIONS}"),
        });
    }

    Ok(())
}
