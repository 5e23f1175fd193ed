//! Tracker service.
//!
//! [`FitnessTracker`] is what a presentation layer talks to: it validates a
//! submitted form, hands the workout to a [`WorkoutStore`], and assembles the
//! dashboard view. It holds no state of its own beyond the store handle.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::form::{parse_workout_form, SkippedExercise, WorkoutForm};
use crate::storage::{PersonalRecord, StoredWorkout, WorkoutReceipt};
use crate::traits::WorkoutStore;

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Workout history, newest first.
    pub workouts: Vec<StoredWorkout>,
    /// Current personal records, by exercise name.
    pub personal_records: Vec<PersonalRecord>,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// What storage wrote.
    pub receipt: WorkoutReceipt,
    /// Exercise rows dropped during validation.
    pub skipped: Vec<SkippedExercise>,
}

impl SubmissionReport {
    /// Whether the user should see a partial-success notice.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty() || !self.receipt.records_complete()
    }
}

/// Service facade over a workout store.
#[derive(Debug, Clone)]
pub struct FitnessTracker<S> {
    store: S,
}

impl<S: WorkoutStore> FitnessTracker<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create the schema if absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the schema cannot be applied.
    pub async fn initialize(&self) -> Result<(), AppError> {
        self.store.initialize().await?;
        Ok(())
    }

    /// Validate and store a submitted workout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] without touching storage when a
    /// required workout field is missing or malformed, and
    /// [`AppError::Storage`] when the insert fails.
    pub async fn submit_workout(&self, form: &WorkoutForm) -> Result<SubmissionReport, AppError> {
        let parsed = parse_workout_form(form)?;
        let receipt = self.store.add_workout(&parsed.workout).await?;

        let report = SubmissionReport {
            receipt,
            skipped: parsed.skipped,
        };

        if report.is_partial() {
            warn!(
                workout_id = report.receipt.workout_id,
                skipped = report.skipped.len(),
                record_failures = report.receipt.record_failures.len(),
                "Workout stored with omissions"
            );
        } else {
            info!(workout_id = report.receipt.workout_id, "Workout submitted");
        }

        Ok(report)
    }

    /// Workout history and personal records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if either listing fails.
    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let workouts = self.store.list_workouts().await?;
        let personal_records = self.store.list_personal_records().await?;
        Ok(Dashboard {
            workouts,
            personal_records,
        })
    }

    /// Personal records only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the listing fails.
    pub async fn personal_records(&self) -> Result<Vec<PersonalRecord>, AppError> {
        Ok(self.store.list_personal_records().await?)
    }

    /// Delete a workout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the workout does not exist or the
    /// delete fails.
    pub async fn delete_workout(&self, id: i64) -> Result<(), AppError> {
        self.store.delete_workout(id).await?;
        Ok(())
    }
}
