//! Property tests for personal-record tracking.
//!
//! For any sequence of logged weights under one exercise, the stored record
//! is the maximum positive weight, dated at its first occurrence.

use chrono::{Days, NaiveDate};
use fitness_tracker::error::StorageError;
use fitness_tracker::storage::{NewExercise, NewWorkout, RecordMetric, SqliteStorage};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Weights in quarter-kilo steps so equal values compare exactly.
fn weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u32..=1200).prop_map(|q| f64::from(q) / 4.0), 1..12)
}

/// Expected (value, date) for a sequence logged one workout per day.
fn expected_record(weights: &[f64]) -> Option<(f64, NaiveDate)> {
    let mut best: Option<(f64, NaiveDate)> = None;
    for (day, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        let date = base_date() + Days::new(day as u64);
        match best {
            Some((value, _)) if weight <= value => {}
            _ => best = Some((weight, date)),
        }
    }
    best
}

async fn run_sequence(
    weights: &[f64],
    interleave: bool,
) -> Result<Option<(f64, NaiveDate)>, StorageError> {
    let storage = SqliteStorage::new_in_memory().await?;

    for (day, &weight) in weights.iter().enumerate() {
        let mut workout = NewWorkout::new(base_date() + Days::new(day as u64), "Strength", 30)
            .with_exercise(NewExercise::new("Front Squat", 3, 5, weight));
        // An unrelated exercise in the same workout must not touch this record.
        if interleave {
            workout = workout.with_exercise(NewExercise::new("Curl", 3, 10, 500.0 - weight));
        }
        storage.add_workout(&workout).await?;
    }

    Ok(storage
        .get_personal_record("Front Squat", RecordMetric::MaxWeight)
        .await?
        .map(|r| (r.value, r.date_achieved)))
}

fn runtime() -> Result<tokio::runtime::Runtime, TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TestCaseError::fail(e.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn record_is_max_with_first_date(weights in weights(), interleave in any::<bool>()) {
        let stored = runtime()?
            .block_on(run_sequence(&weights, interleave))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(stored, expected_record(&weights));
    }

    #[test]
    fn lower_or_equal_weight_never_changes_record(first in 1u32..400, decrease in 0u32..400) {
        let best = f64::from(first);
        let later = f64::from(first.saturating_sub(decrease));

        let stored = runtime()?
            .block_on(run_sequence(&[best, later], false))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(stored, Some((best, base_date())));
    }
}
