//! Workout form parsing and validation.
//!
//! A submitted form carries the workout fields plus four parallel lists of
//! exercise fields. The workout fields are all-or-nothing: a missing or
//! malformed one rejects the submission with a [`ValidationError`]. Exercise
//! rows are forgiving: a bad row is skipped and reported, and the rest are kept.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::{NewExercise, NewWorkout, DATE_FORMAT};

/// Raw form fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutForm {
    /// Workout date, `YYYY-MM-DD`.
    pub date: String,
    /// Workout category.
    pub workout_type: String,
    /// Duration in minutes.
    pub duration: String,
    /// Exercise names, one per row.
    pub exercise_names: Vec<String>,
    /// Sets, parallel to `exercise_names`.
    pub exercise_sets: Vec<String>,
    /// Reps, parallel to `exercise_names`.
    pub exercise_reps: Vec<String>,
    /// Weights, parallel to `exercise_names`.
    pub exercise_weights: Vec<String>,
}

impl WorkoutForm {
    /// Create a form with the workout fields filled in.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        workout_type: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            workout_type: workout_type.into(),
            duration: duration.into(),
            ..Self::default()
        }
    }

    /// Append one exercise row.
    #[must_use]
    pub fn with_exercise_row(
        mut self,
        name: impl Into<String>,
        sets: impl Into<String>,
        reps: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        self.exercise_names.push(name.into());
        self.exercise_sets.push(sets.into());
        self.exercise_reps.push(reps.into());
        self.exercise_weights.push(weight.into());
        self
    }

    /// Append a row written as `name,sets,reps,weight`.
    ///
    /// The last three comma-separated parts are the numbers; anything before
    /// them is the name, so names may contain commas. Missing parts are left
    /// blank and the row will be skipped during parsing.
    #[must_use]
    pub fn with_exercise_spec(self, spec: &str) -> Self {
        let parts: Vec<&str> = spec.split(',').collect();
        if parts.len() >= 4 {
            let split = parts.len() - 3;
            let name = parts[..split].join(",");
            self.with_exercise_row(name, parts[split], parts[split + 1], parts[split + 2])
        } else {
            let field = |i: usize| parts.get(i).copied().unwrap_or_default();
            self.with_exercise_row(field(0), field(1), field(2), field(3))
        }
    }
}

/// An exercise row that was dropped from a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedExercise {
    /// Zero-based row index in the form.
    pub index: usize,
    /// Name as entered.
    pub name: String,
    /// Why the row was dropped.
    pub reason: String,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedWorkout {
    /// The workout ready for storage.
    pub workout: NewWorkout,
    /// Rows that were dropped.
    pub skipped: Vec<SkippedExercise>,
}

/// Validate a submitted form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `date`, `workout_type` or
/// `duration` is blank, and [`ValidationError::InvalidValue`] when the date is
/// not `YYYY-MM-DD` or the duration is not a positive integer.
pub fn parse_workout_form(form: &WorkoutForm) -> Result<ParsedWorkout, ValidationError> {
    let date_str = required("date", &form.date)?;
    let workout_type = required("workout_type", &form.workout_type)?;
    let duration_str = required("duration", &form.duration)?;

    let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidValue {
            field: "date".into(),
            reason: format!("'{date_str}' is not a YYYY-MM-DD date"),
        }
    })?;

    let duration = match duration_str.parse::<u32>() {
        Ok(minutes) if minutes > 0 => minutes,
        _ => {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                reason: format!("'{duration_str}' is not a positive number of minutes"),
            })
        }
    };

    let mut exercises = Vec::new();
    let mut skipped = Vec::new();

    for (index, raw_name) in form.exercise_names.iter().enumerate() {
        let name = raw_name.trim();
        if name.is_empty() {
            continue;
        }

        match parse_exercise_row(form, index, name) {
            Ok(exercise) => exercises.push(exercise),
            Err(reason) => {
                tracing::warn!(index, name, %reason, "Skipping exercise row");
                skipped.push(SkippedExercise {
                    index,
                    name: name.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(ParsedWorkout {
        workout: NewWorkout::new(date, workout_type, duration).with_exercises(exercises),
        skipped,
    })
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.into(),
        });
    }
    Ok(trimmed)
}

fn parse_exercise_row(form: &WorkoutForm, index: usize, name: &str) -> Result<NewExercise, String> {
    let sets = positive_count(&form.exercise_sets, index, "sets")?;
    let reps = positive_count(&form.exercise_reps, index, "reps")?;

    let raw = row_field(&form.exercise_weights, index, "weight")?;
    let weight = raw
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
        .ok_or_else(|| format!("weight '{raw}' is not a non-negative number"))?;

    Ok(NewExercise::new(name, sets, reps, weight))
}

fn row_field<'a>(values: &'a [String], index: usize, field: &str) -> Result<&'a str, String> {
    values
        .get(index)
        .map(|v| v.trim())
        .ok_or_else(|| format!("{field} missing for row {index}"))
}

fn positive_count(values: &[String], index: usize, field: &str) -> Result<u32, String> {
    let raw = row_field(values, index, field)?;
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{field} '{raw}' is not a positive integer")),
    }
}
