//! Storage backend.
//!
//! This module provides:
//! - `SQLite` database implementation
//! - Atomic workout inserts with their exercises
//! - Personal-record tracking
//!
//! # Architecture
//!
//! The storage layer uses `SQLite` with the `sqlx` crate for async operations.
//! Every write runs in its own transaction on a pooled connection; an
//! uncommitted transaction is rolled back when dropped.
//!
//! The implementation is split across submodules:
//! - `core`: Pool management, schema, and helper functions
//! - `workouts`: Workout and exercise operations
//! - `records`: The personal-record update rule
//! - `trait_impl`: `WorkoutStore` implementation
//!
//! # Example
//!
//! ```ignore
//! use fitness_tracker::storage::{NewExercise, NewWorkout, SqliteStorage};
//!
//! let storage = SqliteStorage::new("./data/fitness_tracker.db").await?;
//! let workout = NewWorkout::new(date, "Strength", 45)
//!     .with_exercise(NewExercise::new("Bench Press", 3, 5, 100.0));
//! let receipt = storage.add_workout(&workout).await?;
//! ```

mod core;
mod records;
mod trait_impl;
mod types;
mod workouts;

pub use self::core::SqliteStorage;
pub use types::{
    NewExercise, NewWorkout, PersonalRecord, RecordFailure, RecordMetric, StoredExercise,
    StoredWorkout, WorkoutReceipt, DATE_FORMAT,
};
