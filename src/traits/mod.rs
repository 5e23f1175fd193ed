//! Trait definitions for mockable dependencies.
//!
//! [`WorkoutStore`] is the narrow data-access interface a presentation layer
//! calls through. It is annotated with `#[cfg_attr(test, mockall::automock)]`
//! so service code can be tested without a database.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage::{NewWorkout, PersonalRecord, StoredWorkout, WorkoutReceipt};

/// Workout storage trait for mocking.
///
/// This trait abstracts database operations to allow for
/// dependency injection and testing with mock implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Create the schema if absent. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the schema cannot be applied.
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Store a workout and its exercises atomically, updating personal records.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the insert fails; nothing is persisted then.
    async fn add_workout(&self, workout: &NewWorkout) -> Result<WorkoutReceipt, StorageError>;

    /// All workouts, newest first, with their exercises.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn list_workouts(&self) -> Result<Vec<StoredWorkout>, StorageError>;

    /// All personal records ordered by exercise name, then metric.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn list_personal_records(&self) -> Result<Vec<PersonalRecord>, StorageError>;

    /// Delete a workout and, by cascade, its exercises.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WorkoutNotFound`] if no such workout exists.
    async fn delete_workout(&self, id: i64) -> Result<(), StorageError>;
}
