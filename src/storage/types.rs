//! Storage types for database operations.
//!
//! This module defines the types written to and read from the database:
//! - [`NewWorkout`] / [`NewExercise`]: Insert payloads
//! - [`StoredWorkout`] / [`StoredExercise`]: Workout history rows
//! - [`PersonalRecord`]: Best value per exercise and metric
//! - [`WorkoutReceipt`]: Summary of one stored workout

#![allow(clippy::should_implement_trait)]

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of personal record being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordMetric {
    /// Heaviest weight lifted for an exercise.
    #[default]
    MaxWeight,
}

impl RecordMetric {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaxWeight => "max_weight",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "max_weight" => Some(Self::MaxWeight),
            _ => None,
        }
    }
}

impl fmt::Display for RecordMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exercise to insert alongside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    /// Movement name, e.g. "Bench Press".
    pub name: String,
    /// Number of sets.
    pub sets: u32,
    /// Repetitions per set.
    pub reps: u32,
    /// Weight lifted.
    pub weight: f64,
}

impl NewExercise {
    /// Create a new exercise entry.
    #[must_use]
    pub fn new(name: impl Into<String>, sets: u32, reps: u32, weight: f64) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            weight,
        }
    }
}

/// A workout to insert, with its exercises in logging order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    /// Calendar date of the session.
    pub date: NaiveDate,
    /// Free-text category, e.g. "Strength".
    pub workout_type: String,
    /// Duration in minutes.
    pub duration: u32,
    /// Exercises performed.
    pub exercises: Vec<NewExercise>,
}

impl NewWorkout {
    /// Create a workout with no exercises.
    #[must_use]
    pub fn new(date: NaiveDate, workout_type: impl Into<String>, duration: u32) -> Self {
        Self {
            date,
            workout_type: workout_type.into(),
            duration,
            exercises: Vec::new(),
        }
    }

    /// Append an exercise.
    #[must_use]
    pub fn with_exercise(mut self, exercise: NewExercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    /// Replace the exercise list.
    #[must_use]
    pub fn with_exercises(mut self, exercises: Vec<NewExercise>) -> Self {
        self.exercises = exercises;
        self
    }
}

/// Exercise row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredExercise {
    /// Row identifier.
    pub id: i64,
    /// Owning workout.
    pub workout_id: i64,
    /// Movement name.
    pub name: String,
    /// Number of sets.
    pub sets: u32,
    /// Repetitions per set.
    pub reps: u32,
    /// Weight lifted.
    pub weight: f64,
}

impl fmt::Display for StoredExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} x {} @ {:.1}",
            self.name, self.sets, self.reps, self.weight
        )
    }
}

/// Workout row with its exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWorkout {
    /// Row identifier.
    pub id: i64,
    /// Calendar date of the session.
    pub date: NaiveDate,
    /// Free-text category.
    pub workout_type: String,
    /// Duration in minutes.
    pub duration: u32,
    /// Exercises in insertion order.
    pub exercises: Vec<StoredExercise>,
}

impl fmt::Display for StoredWorkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} ({} min)",
            self.id,
            self.date.format(DATE_FORMAT),
            self.workout_type,
            self.duration
        )
    }
}

/// Current best for one exercise and metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Exercise the record belongs to.
    pub exercise_name: String,
    /// What is measured.
    pub metric: RecordMetric,
    /// Best value so far.
    pub value: f64,
    /// Date the best value was first reached.
    pub date_achieved: NaiveDate,
}

impl fmt::Display for PersonalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {:.1} on {}",
            self.exercise_name,
            self.metric,
            self.value,
            self.date_achieved.format(DATE_FORMAT)
        )
    }
}

/// A personal-record update that failed and was tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Exercise whose record could not be updated.
    pub exercise_name: String,
    /// Underlying error message.
    pub message: String,
}

/// Summary of one stored workout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkoutReceipt {
    /// Identifier assigned to the workout.
    pub workout_id: i64,
    /// Exercise rows written.
    pub exercises_recorded: usize,
    /// Exercises whose record was created or raised, in logging order.
    pub records_improved: Vec<String>,
    /// Record updates that failed under the best-effort policy.
    pub record_failures: Vec<RecordFailure>,
}

impl WorkoutReceipt {
    /// Create an empty receipt for a workout.
    #[must_use]
    pub fn new(workout_id: i64) -> Self {
        Self {
            workout_id,
            ..Self::default()
        }
    }

    /// Whether every record update succeeded.
    #[must_use]
    pub fn records_complete(&self) -> bool {
        self.record_failures.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_record_metric_round_trip() {
        assert_eq!(RecordMetric::MaxWeight.as_str(), "max_weight");
        assert_eq!(
            RecordMetric::from_str("max_weight"),
            Some(RecordMetric::MaxWeight)
        );
        assert_eq!(RecordMetric::from_str("max_reps"), None);
    }

    #[test]
    fn test_record_metric_serde() {
        let json = serde_json::to_string(&RecordMetric::MaxWeight).unwrap();
        assert_eq!(json, "\"max_weight\"");
    }

    #[test]
    fn test_new_workout_builder() {
        let workout = NewWorkout::new(date("2024-01-05"), "Strength", 60)
            .with_exercise(NewExercise::new("Squat", 5, 5, 140.0))
            .with_exercise(NewExercise::new("Bench Press", 3, 8, 90.0));

        assert_eq!(workout.workout_type, "Strength");
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[1].name, "Bench Press");
    }

    #[test]
    fn test_with_exercises_replaces() {
        let workout = NewWorkout::new(date("2024-01-05"), "Strength", 60)
            .with_exercise(NewExercise::new("Squat", 5, 5, 140.0))
            .with_exercises(vec![]);
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn test_stored_workout_display() {
        let workout = StoredWorkout {
            id: 3,
            date: date("2024-01-05"),
            workout_type: "Cardio".to_string(),
            duration: 30,
            exercises: vec![],
        };
        assert_eq!(workout.to_string(), "#3 2024-01-05 Cardio (30 min)");
    }

    #[test]
    fn test_stored_exercise_display() {
        let exercise = StoredExercise {
            id: 1,
            workout_id: 3,
            name: "Deadlift".to_string(),
            sets: 1,
            reps: 5,
            weight: 180.0,
        };
        assert_eq!(exercise.to_string(), "Deadlift: 1 x 5 @ 180.0");
    }

    #[test]
    fn test_personal_record_display() {
        let record = PersonalRecord {
            exercise_name: "Bench Press".to_string(),
            metric: RecordMetric::MaxWeight,
            value: 120.0,
            date_achieved: date("2024-02-01"),
        };
        assert_eq!(
            record.to_string(),
            "Bench Press [max_weight]: 120.0 on 2024-02-01"
        );
    }

    #[test]
    fn test_receipt_records_complete() {
        let mut receipt = WorkoutReceipt::new(7);
        assert!(receipt.records_complete());
        assert_eq!(receipt.workout_id, 7);

        receipt.record_failures.push(RecordFailure {
            exercise_name: "Squat".to_string(),
            message: "locked".to_string(),
        });
        assert!(!receipt.records_complete());
    }
}
