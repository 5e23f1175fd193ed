//! `WorkoutStore` implementation for `SqliteStorage`.

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::traits::WorkoutStore;

use super::core::SqliteStorage;
use super::types::{NewWorkout, PersonalRecord, StoredWorkout, WorkoutReceipt};

#[async_trait]
impl WorkoutStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), StorageError> {
        Self::initialize(self).await
    }

    async fn add_workout(&self, workout: &NewWorkout) -> Result<WorkoutReceipt, StorageError> {
        Self::add_workout(self, workout).await
    }

    async fn list_workouts(&self) -> Result<Vec<StoredWorkout>, StorageError> {
        Self::list_workouts(self).await
    }

    async fn list_personal_records(&self) -> Result<Vec<PersonalRecord>, StorageError> {
        Self::list_personal_records(self).await
    }

    async fn delete_workout(&self, id: i64) -> Result<(), StorageError> {
        Self::delete_workout(self, id).await
    }
}

/// Blanket implementation for `Arc<SqliteStorage>` to allow sharing storage across threads.
#[async_trait]
impl WorkoutStore for Arc<SqliteStorage> {
    async fn initialize(&self) -> Result<(), StorageError> {
        self.as_ref().initialize().await
    }

    async fn add_workout(&self, workout: &NewWorkout) -> Result<WorkoutReceipt, StorageError> {
        self.as_ref().add_workout(workout).await
    }

    async fn list_workouts(&self) -> Result<Vec<StoredWorkout>, StorageError> {
        self.as_ref().list_workouts().await
    }

    async fn list_personal_records(&self) -> Result<Vec<PersonalRecord>, StorageError> {
        self.as_ref().list_personal_records().await
    }

    async fn delete_workout(&self, id: i64) -> Result<(), StorageError> {
        self.as_ref().delete_workout(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::core::tests::test_storage;
    use crate::storage::NewExercise;
    use chrono::NaiveDate;
    use serial_test::serial;

    fn workout(day: &str, weight: f64) -> NewWorkout {
        NewWorkout::new(
            NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            "Strength",
            40,
        )
        .with_exercise(NewExercise::new("Overhead Press", 5, 5, weight))
    }

    async fn exercise_store(store: &dyn WorkoutStore) {
        store.initialize().await.unwrap();
        let receipt = store.add_workout(&workout("2024-04-01", 50.0)).await.unwrap();
        store.add_workout(&workout("2024-04-03", 55.0)).await.unwrap();

        let workouts = store.list_workouts().await.unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].exercises[0].weight, 55.0);

        let records = store.list_personal_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].value - 55.0).abs() < f64::EPSILON);

        store.delete_workout(receipt.workout_id).await.unwrap();
        assert_eq!(store.list_workouts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_trait_via_storage() {
        let storage = test_storage().await;
        exercise_store(&storage).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_trait_via_arc() {
        let storage = Arc::new(test_storage().await);
        exercise_store(&storage).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_trait_delete_missing() {
        let storage = test_storage().await;
        let store: &dyn WorkoutStore = &storage;
        let result = store.delete_workout(77).await;
        assert!(matches!(result, Err(StorageError::WorkoutNotFound { workout_id: 77 })));
    }
}
