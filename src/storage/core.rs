//! Core `SQLite` storage implementation.
//!
//! This module provides the main [`SqliteStorage`] struct and core database operations.

#![allow(clippy::missing_errors_doc)]

use crate::config::{Config, RecordPolicy, DEFAULT_MAX_CONNECTIONS};
use crate::error::StorageError;
use chrono::NaiveDate;
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::types::DATE_FORMAT;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// `SQLite` storage backend.
///
/// Provides persistent storage for workouts, their exercises and personal
/// records. Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pub(crate) pool: SqlitePool,
    pub(crate) record_policy: RecordPolicy,
}

impl SqliteStorage {
    /// Get a clone of the connection pool.
    #[must_use]
    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// Policy applied when a personal-record update fails during a workout insert.
    #[must_use]
    pub const fn record_policy(&self) -> RecordPolicy {
        self.record_policy
    }

    /// Use a different record-update policy.
    #[must_use]
    pub const fn with_record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    /// Create a new `SQLite` storage instance with the default pool size.
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn new(database_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open(database_path.as_ref(), DEFAULT_MAX_CONNECTIONS, RecordPolicy::default()).await
    }

    /// Create a storage instance from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn from_config(config: &Config) -> Result<Self, StorageError> {
        Self::open(
            Path::new(&config.database_path),
            config.max_connections,
            config.record_policy,
        )
        .await
    }

    async fn open(
        path: &Path,
        max_connections: u32,
        record_policy: RecordPolicy,
    ) -> Result<Self, StorageError> {
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create database directory: {e}"),
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to connect to database: {e}"),
            })?;

        debug!(path = %path.display(), max_connections, "Opened database pool");

        let storage = Self {
            pool,
            record_policy,
        };
        storage.initialize().await?;

        Ok(storage)
    }

    /// Create a new in-memory `SQLite` storage instance for testing.
    ///
    /// The pool holds a single connection that never expires, since every
    /// in-memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn new_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Invalid memory database options: {e}"),
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create in-memory database: {e}"),
            })?;

        let storage = Self {
            pool,
            record_policy: RecordPolicy::default(),
        };
        storage.initialize().await?;

        Ok(storage)
    }

    /// Create the schema if absent.
    ///
    /// Every statement uses `IF NOT EXISTS`, so repeated calls never drop or
    /// duplicate anything.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let schema_001 = include_str!("../../migrations/001_initial_schema.sql");
        sqlx::raw_sql(schema_001)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::MigrationFailed {
                version: "001".to_string(),
                message: format!("Failed to run migration 001: {e}"),
            })?;

        info!("Database schema ready");
        Ok(())
    }

    /// Format a date for a `TEXT` column.
    pub(crate) fn format_date(date: NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string from the database.
    pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, StorageError> {
        NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| StorageError::Internal {
            message: format!("Failed to parse date '{s}': {e}"),
        })
    }

    /// Read a typed column from a row.
    pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, StorageError>
    where
        T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
    {
        row.try_get(name).map_err(|e| StorageError::Internal {
            message: format!("Failed to read column '{name}': {e}"),
        })
    }

    /// Read an integer column that must fit in a `u32`.
    pub(crate) fn column_u32(row: &SqliteRow, name: &str) -> Result<u32, StorageError> {
        let value: i64 = Self::column(row, name)?;
        u32::try_from(value).map_err(|_| StorageError::Internal {
            message: format!("Column '{name}' out of range: {value}"),
        })
    }

    /// Create a query error with the given query name and message.
    pub(crate) fn query_error(query: &str, message: String) -> StorageError {
        StorageError::QueryFailed {
            query: query.to_string(),
            message,
        }
    }
}
