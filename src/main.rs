//! Fitness tracker command-line entry point.
//!
//! Logs go to stderr; stdout carries command output only.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use clap::{Args, Parser, Subcommand};

use fitness_tracker::config::Config;
use fitness_tracker::error::AppError;
use fitness_tracker::form::WorkoutForm;
use fitness_tracker::storage::SqliteStorage;
use fitness_tracker::tracker::{Dashboard, FitnessTracker, SubmissionReport};

#[derive(Parser, Debug)]
#[command(name = "fitness-tracker", version, about = "Workout log with personal records")]
struct Cli {
    /// Database file (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database tables if they do not exist
    InitDb,
    /// Log a workout
    AddWorkout(AddWorkoutArgs),
    /// Show workout history and personal records
    Dashboard {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show personal records
    Records {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Delete a workout and its exercises
    DeleteWorkout {
        /// Workout ID
        id: i64,
    },
}

#[derive(Args, Debug)]
struct AddWorkoutArgs {
    /// Workout date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Workout category, e.g. Strength
    #[arg(long = "type")]
    workout_type: String,
    /// Duration in minutes
    #[arg(long)]
    duration: String,
    /// Exercise as "name,sets,reps,weight"; repeatable
    #[arg(long = "exercise")]
    exercises: Vec<String>,
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config first so a LOG_LEVEL from .env reaches the filter.
    let loaded = Config::from_env();
    let filter = loaded
        .as_ref()
        .map_or_else(|_| Config::default().log_filter(), Config::log_filter);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = cli.database {
        config = config.with_database_path(path);
    }

    tracing::debug!(
        "Configuration loaded: database={}, policy={}",
        config.database_path,
        config.record_policy
    );

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run(command: Command, config: &Config) -> Result<(), AppError> {
    let storage = SqliteStorage::from_config(config).await?;
    let tracker = FitnessTracker::new(storage);

    match command {
        Command::InitDb => {
            // Opening the storage already applied the schema.
            println!("Initialized the database at {}", config.database_path);
        }
        Command::AddWorkout(args) => {
            let form = args
                .exercises
                .iter()
                .fold(
                    WorkoutForm::new(args.date, args.workout_type, args.duration),
                    |form, spec| form.with_exercise_spec(spec),
                );
            let report = tracker.submit_workout(&form).await?;
            print_report(&report);
        }
        Command::Dashboard { json } => {
            let dashboard = tracker.dashboard().await?;
            if json {
                print_json(&dashboard);
            } else {
                print_dashboard(&dashboard);
            }
        }
        Command::Records { json } => {
            let records = tracker.personal_records().await?;
            if json {
                print_json(&records);
            } else if records.is_empty() {
                println!("No personal records yet.");
            } else {
                for record in &records {
                    println!("{record}");
                }
            }
        }
        Command::DeleteWorkout { id } => {
            tracker.delete_workout(id).await?;
            println!("Deleted workout #{id}");
        }
    }

    Ok(())
}

fn print_report(report: &SubmissionReport) {
    let receipt = &report.receipt;
    println!(
        "Logged workout #{} with {} exercise(s)",
        receipt.workout_id, receipt.exercises_recorded
    );
    for name in &receipt.records_improved {
        println!("  New personal record: {name}");
    }
    for skipped in &report.skipped {
        println!(
            "  Skipped row {} ({}): {}",
            skipped.index + 1,
            skipped.name,
            skipped.reason
        );
    }
    for failure in &receipt.record_failures {
        println!(
            "  Record not updated for {}: {}",
            failure.exercise_name, failure.message
        );
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("Workouts");
    if dashboard.workouts.is_empty() {
        println!("  (none)");
    }
    for workout in &dashboard.workouts {
        println!("  {workout}");
        for exercise in &workout.exercises {
            println!("    {exercise}");
        }
    }

    println!();
    println!("Personal records");
    if dashboard.personal_records.is_empty() {
        println!("  (none)");
    }
    for record in &dashboard.personal_records {
        println!("  {record}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize output: {e}"),
    }
}
