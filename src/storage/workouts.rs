//! Workout storage operations.

#![allow(clippy::missing_errors_doc)]

use std::collections::HashMap;

use crate::config::RecordPolicy;
use crate::error::StorageError;
use sqlx::sqlite::SqliteRow;
use sqlx::Connection;
use tracing::{debug, info, warn};

use super::core::SqliteStorage;
use super::records::upsert_record;
use super::types::{
    NewWorkout, RecordFailure, RecordMetric, StoredExercise, StoredWorkout, WorkoutReceipt,
};

impl SqliteStorage {
    /// Insert a workout and its exercises as one transaction.
    ///
    /// Exercises with a blank name are skipped. Every exercise with a positive
    /// weight feeds the max-weight record inside the same transaction. A failed
    /// exercise insert rolls the whole workout back; a failed record update is
    /// handled according to [`SqliteStorage::record_policy`].
    pub async fn add_workout(&self, workout: &NewWorkout) -> Result<WorkoutReceipt, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        let result = sqlx::query("INSERT INTO workouts (date, type, duration) VALUES (?, ?, ?)")
            .bind(Self::format_date(workout.date))
            .bind(&workout.workout_type)
            .bind(i64::from(workout.duration))
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("INSERT workouts", format!("{e}")))?;

        let workout_id = result.last_insert_rowid();
        let mut receipt = WorkoutReceipt::new(workout_id);

        for exercise in &workout.exercises {
            let name = exercise.name.trim();
            if name.is_empty() {
                debug!(workout_id, "Skipping exercise with blank name");
                continue;
            }

            sqlx::query(
                "INSERT INTO exercises (workout_id, name, sets, reps, weight) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(workout_id)
            .bind(name)
            .bind(i64::from(exercise.sets))
            .bind(i64::from(exercise.reps))
            .bind(exercise.weight)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("INSERT exercises", format!("{e}")))?;
            receipt.exercises_recorded += 1;

            if exercise.weight <= 0.0 {
                continue;
            }

            // Savepoint so a failed upsert can be discarded without losing the workout.
            let mut savepoint = Connection::begin(&mut *tx)
                .await
                .map_err(|e| Self::query_error("SAVEPOINT", format!("{e}")))?;

            let outcome = upsert_record(
                &mut savepoint,
                name,
                RecordMetric::MaxWeight,
                exercise.weight,
                workout.date,
            )
            .await;

            match outcome {
                Ok(improved) => {
                    savepoint
                        .commit()
                        .await
                        .map_err(|e| Self::query_error("RELEASE SAVEPOINT", format!("{e}")))?;
                    if improved && !receipt.records_improved.iter().any(|n| n == name) {
                        receipt.records_improved.push(name.to_string());
                    }
                }
                Err(e) if self.record_policy == RecordPolicy::Strict => return Err(e),
                Err(e) => {
                    savepoint
                        .rollback()
                        .await
                        .map_err(|e| Self::query_error("ROLLBACK TO SAVEPOINT", format!("{e}")))?;
                    warn!(workout_id, exercise = name, error = %e, "Personal record update failed");
                    receipt.record_failures.push(RecordFailure {
                        exercise_name: name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        info!(
            workout_id,
            exercises = receipt.exercises_recorded,
            records_improved = receipt.records_improved.len(),
            "Workout stored"
        );

        Ok(receipt)
    }

    /// Get a workout and its exercises by ID.
    pub async fn get_workout(&self, id: i64) -> Result<Option<StoredWorkout>, StorageError> {
        let row = sqlx::query("SELECT id, date, type, duration FROM workouts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT workouts", format!("{e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let exercise_rows = sqlx::query(
            "SELECT id, workout_id, name, sets, reps, weight
             FROM exercises WHERE workout_id = ? ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT exercises", format!("{e}")))?;

        let exercises = exercise_rows
            .iter()
            .map(Self::row_to_stored_exercise)
            .collect::<Result<Vec<_>, _>>()?;

        Self::row_to_stored_workout(&row, exercises).map(Some)
    }

    /// List every workout, newest date first, most recently inserted first on ties.
    ///
    /// Each workout carries its exercises in insertion order. Both reads run in
    /// one transaction so the result is a consistent snapshot.
    pub async fn list_workouts(&self) -> Result<Vec<StoredWorkout>, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN", format!("{e}")))?;

        let workout_rows =
            sqlx::query("SELECT id, date, type, duration FROM workouts ORDER BY date DESC, id DESC")
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| Self::query_error("SELECT workouts", format!("{e}")))?;

        let exercise_rows = sqlx::query(
            "SELECT id, workout_id, name, sets, reps, weight
             FROM exercises ORDER BY workout_id ASC, id ASC",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| Self::query_error("SELECT exercises", format!("{e}")))?;

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT", format!("{e}")))?;

        let mut by_workout: HashMap<i64, Vec<StoredExercise>> = HashMap::new();
        for row in &exercise_rows {
            let exercise = Self::row_to_stored_exercise(row)?;
            by_workout
                .entry(exercise.workout_id)
                .or_default()
                .push(exercise);
        }

        let mut workouts = Vec::with_capacity(workout_rows.len());
        for row in &workout_rows {
            let id: i64 = Self::column(row, "id")?;
            let exercises = by_workout.remove(&id).unwrap_or_default();
            workouts.push(Self::row_to_stored_workout(row, exercises)?);
        }

        Ok(workouts)
    }

    /// Delete a workout. Its exercises go with it; personal records stay.
    pub async fn delete_workout(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE workouts", format!("{e}")))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::WorkoutNotFound { workout_id: id });
        }

        info!(workout_id = id, "Workout deleted");
        Ok(())
    }

    /// Convert a database row to a `StoredWorkout`.
    fn row_to_stored_workout(
        row: &SqliteRow,
        exercises: Vec<StoredExercise>,
    ) -> Result<StoredWorkout, StorageError> {
        let date_str: String = Self::column(row, "date")?;

        Ok(StoredWorkout {
            id: Self::column(row, "id")?,
            date: Self::parse_date(&date_str)?,
            workout_type: Self::column(row, "type")?,
            duration: Self::column_u32(row, "duration")?,
            exercises,
        })
    }

    /// Convert a database row to a `StoredExercise`.
    fn row_to_stored_exercise(row: &SqliteRow) -> Result<StoredExercise, StorageError> {
        Ok(StoredExercise {
            id: Self::column(row, "id")?,
            workout_id: Self::column(row, "workout_id")?,
            name: Self::column(row, "name")?,
            sets: Self::column_u32(row, "sets")?,
            reps: Self::column_u32(row, "reps")?,
            weight: Self::column(row, "weight")?,
        })
    }
}
