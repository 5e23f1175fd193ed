//! Fitness Tracker
//!
//! A personal workout log backed by `SQLite`. Workouts are stored with their
//! exercises in one transaction, and every weighted exercise feeds a
//! max-weight personal record that only ever moves up.
//!
//! # Features
//!
//! - Atomic workout + exercise inserts
//! - Personal records maintained by a single conditional upsert
//! - Form validation that skips bad exercise rows instead of rejecting the workout
//! - A mockable [`traits::WorkoutStore`] seam for presentation layers
//!
//! # Quick Start
//!
//! ```bash
//! fitness-tracker init-db
//! fitness-tracker add-workout --date 2024-01-05 --type Strength --duration 45 \
//!     --exercise "Bench Press,3,5,100"
//! fitness-tracker dashboard
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   WorkoutForm   ┌────────────────┐   NewWorkout   ┌──────────────┐
//! │ presentation │────────────────▶│ FitnessTracker │───────────────▶│ WorkoutStore │──▶ SQLite
//! │  (CLI/HTTP)  │◀────────────────│                │◀───────────────│              │
//! └──────────────┘    Dashboard    └────────────────┘    Receipt     └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod form;
pub mod storage;
pub mod tracker;
pub mod traits;
