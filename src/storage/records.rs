//! Personal-record storage operations.
//!
//! A record only ever moves up. The rule is a single conditional upsert, so two
//! writers racing on the same exercise are serialized by `SQLite` rather than by
//! a read-then-write in application code.

#![allow(clippy::missing_errors_doc)]

use crate::error::StorageError;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use tracing::{debug, info};

use super::core::SqliteStorage;
use super::types::{PersonalRecord, RecordMetric};

const UPSERT_RECORD: &str = "INSERT INTO personal_records (exercise_name, metric, value, date_achieved)
     VALUES (?, ?, ?, ?)
     ON CONFLICT(exercise_name, metric) DO UPDATE SET
         value = excluded.value,
         date_achieved = excluded.date_achieved
     WHERE excluded.value > personal_records.value";

/// Apply the record-update rule on an existing connection or transaction.
///
/// Inserts the record when none exists and replaces value and date only when
/// `value` is strictly greater than the stored one. Returns `true` when the row
/// was created or raised.
pub(crate) async fn upsert_record(
    conn: &mut SqliteConnection,
    exercise_name: &str,
    metric: RecordMetric,
    value: f64,
    date_achieved: NaiveDate,
) -> Result<bool, StorageError> {
    let result = sqlx::query(UPSERT_RECORD)
        .bind(exercise_name)
        .bind(metric.as_str())
        .bind(value)
        .bind(SqliteStorage::format_date(date_achieved))
        .execute(conn)
        .await
        .map_err(|e| SqliteStorage::query_error("UPSERT personal_records", format!("{e}")))?;

    let improved = result.rows_affected() > 0;
    if improved {
        info!(exercise = exercise_name, %metric, value, "Personal record set");
    } else {
        debug!(exercise = exercise_name, %metric, value, "Personal record unchanged");
    }

    Ok(improved)
}

impl SqliteStorage {
    /// Apply the record-update rule in its own transaction.
    ///
    /// Returns `true` when the record was created or raised.
    pub async fn update_personal_record(
        &self,
        exercise_name: &str,
        metric: RecordMetric,
        value: f64,
        date_achieved: NaiveDate,
    ) -> Result<bool, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        let improved = upsert_record(&mut tx, exercise_name, metric, value, date_achieved).await?;

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        Ok(improved)
    }

    /// Get the record for one exercise and metric.
    pub async fn get_personal_record(
        &self,
        exercise_name: &str,
        metric: RecordMetric,
    ) -> Result<Option<PersonalRecord>, StorageError> {
        let row = sqlx::query(
            "SELECT exercise_name, metric, value, date_achieved
             FROM personal_records WHERE exercise_name = ? AND metric = ?",
        )
        .bind(exercise_name)
        .bind(metric.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT personal_records", format!("{e}")))?;

        row.as_ref().map(Self::row_to_personal_record).transpose()
    }

    /// List all records ordered by exercise name, then metric.
    pub async fn list_personal_records(&self) -> Result<Vec<PersonalRecord>, StorageError> {
        let rows = sqlx::query(
            "SELECT exercise_name, metric, value, date_achieved
             FROM personal_records
             ORDER BY exercise_name ASC, metric ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT personal_records", format!("{e}")))?;

        rows.iter().map(Self::row_to_personal_record).collect()
    }

    /// Convert a database row to a `PersonalRecord`.
    fn row_to_personal_record(row: &SqliteRow) -> Result<PersonalRecord, StorageError> {
        let metric_str: String = Self::column(row, "metric")?;
        let metric =
            RecordMetric::from_str(&metric_str).ok_or_else(|| StorageError::Internal {
                message: format!("Unknown record metric '{metric_str}'"),
            })?;
        let date_str: String = Self::column(row, "date_achieved")?;

        Ok(PersonalRecord {
            exercise_name: Self::column(row, "exercise_name")?,
            metric,
            value: Self::column(row, "value")?,
            date_achieved: Self::parse_date(&date_str)?,
        })
    }
}
