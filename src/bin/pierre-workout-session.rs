// ABOUTME: Command-line driver that runs a scripted workout session against in-memory collaborators
// ABOUTME: Loads a workout JSON file, performs every exercise, and prints the saved log record as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Scripted workout session runner.
//!
//! Plays the part of the user: selects each exercise in order, walks the
//! setup stages, completes every set (or lets the rep timer do it), rests,
//! confirms, and finally finishes the workout.
//!
//! Usage:
//! ```bash
//! # Manual sets at real-time pace
//! cargo run --bin pierre-workout-session -- --workout push-day.json --weight 20
//!
//! # Timer-driven sets with accelerated clocks
//! cargo run --bin pierre-workout-session -- --workout push-day.json --use-timer --fast
//!
//! # Premium user recording every set
//! cargo run --bin pierre-workout-session -- --workout push-day.json --premium --record --fast
//! ```

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::Parser;
use pierre_workout_session::config::{SessionConfig, TimingConfig};
use pierre_workout_session::external::memory::InMemoryServices;
use pierre_workout_session::external::SessionServices;
use pierre_workout_session::logging::LoggingConfig;
use pierre_workout_session::models::{SessionUser, Workout, WorkoutLogRecord};
use pierre_workout_session::notifications::TracingNotifier;
use pierre_workout_session::session::{
    CompletionView, SessionCommand, SessionRuntime, SessionStateKind, StageAction,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[derive(Parser)]
#[command(
    name = "pierre-workout-session",
    about = "Pierre Workouts session runner",
    long_about = "Run a scripted workout session and print the resulting workout log"
)]
struct SessionArgs {
    /// Workout definition as JSON
    #[arg(long)]
    workout: PathBuf,

    /// Email recorded on the workout log
    #[arg(long, default_value = "athlete@example.com")]
    email: String,

    /// Run as a premium user (recording and photos allowed)
    #[arg(long)]
    premium: bool,

    /// Record every set (premium only)
    #[arg(long)]
    record: bool,

    /// Let the rep timer complete sets instead of tapping "Complete Set"
    #[arg(long)]
    use_timer: bool,

    /// Working weight in kilograms; defaults to the previous weight
    #[arg(long)]
    weight: Option<f64>,

    /// Preferred coach for demo videos
    #[arg(long)]
    coach: Option<String>,

    /// Use accelerated clocks
    #[arg(long)]
    fast: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SessionArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        logging.level = "debug".to_owned();
    }
    logging.init()?;

    let raw = tokio::fs::read_to_string(&args.workout)
        .await
        .with_context(|| format!("failed to read {}", args.workout.display()))?;
    let workout: Workout = serde_json::from_str(&raw).context("invalid workout JSON")?;

    let mut config = SessionConfig::from_env();
    if args.fast {
        config.timing = TimingConfig::accelerated();
    }

    let mut user = if args.premium {
        SessionUser::premium(args.email.clone())
    } else {
        SessionUser::free(args.email.clone())
    };
    if let Some(coach) = &args.coach {
        user = user.with_coach(coach.clone());
    }

    let in_memory = InMemoryServices::new(workout.clone());
    let mut services = in_memory.services();
    services.notifier = Arc::new(TracingNotifier);

    let span = logging.session_span(&args.email, &workout.name);
    let record = run_session(user, &workout, services, config, &args)
        .instrument(span)
        .await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn run_session(
    user: SessionUser,
    workout: &Workout,
    services: SessionServices,
    config: SessionConfig,
    args: &SessionArgs,
) -> Result<WorkoutLogRecord> {
    let mut runtime = SessionRuntime::start(user, &workout.name, services, config).await?;
    for index in 0..workout.exercises.len() {
        perform_exercise(&mut runtime, index, args).await?;
    }

    runtime.dispatch(SessionCommand::FinishWorkout).await?;
    finish(&mut runtime).await?;

    runtime
        .controller()
        .record()
        .cloned()
        .context("session ended without a workout log")
}

async fn stage(runtime: &mut SessionRuntime, action: StageAction) -> Result<()> {
    runtime.dispatch(SessionCommand::Stage(action)).await?;
    Ok(())
}

async fn perform_exercise(
    runtime: &mut SessionRuntime,
    index: usize,
    args: &SessionArgs,
) -> Result<()> {
    runtime.dispatch(SessionCommand::SelectExercise(index)).await?;
    stage(runtime, StageAction::Next).await?;
    stage(runtime, StageAction::Next).await?;
    if args.premium {
        stage(runtime, StageAction::ChooseRecord(args.record)).await?;
    }
    stage(runtime, StageAction::Next).await?;
    stage(runtime, StageAction::ChooseTimer(args.use_timer)).await?;
    stage(runtime, StageAction::Next).await?;
    if let Some(weight) = args.weight {
        stage(runtime, StageAction::SetWeight(weight)).await?;
    }
    runtime.dispatch(SessionCommand::FinishStages).await?;

    loop {
        let snapshot = runtime.snapshot();
        match snapshot.state {
            SessionStateKind::Exercising => {
                let switching = snapshot
                    .execution
                    .is_some_and(|execution| execution.side_switch_remaining.is_some());
                if args.use_timer || switching {
                    runtime.pump().await?;
                } else {
                    runtime.dispatch(SessionCommand::CompleteSet).await?;
                }
            }
            SessionStateKind::Countdown | SessionStateKind::Resting => runtime.pump().await?,
            SessionStateKind::ExerciseComplete => {
                if args.premium {
                    runtime
                        .dispatch(SessionCommand::AttachPhoto(Bytes::from_static(
                            b"simulated-photo",
                        )))
                        .await?;
                }
                runtime.dispatch(SessionCommand::ConfirmExercise).await?;
                return Ok(());
            }
            other => bail!("unexpected state {other} while performing exercise {index}"),
        }
    }
}

async fn finish(runtime: &mut SessionRuntime) -> Result<()> {
    loop {
        match runtime.snapshot().completion {
            Some(CompletionView::Summary) => return Ok(()),
            Some(CompletionView::SaveFailed { message }) => {
                warn!(%message, "retrying workout log save");
                runtime.dispatch(SessionCommand::RetrySave).await?;
            }
            Some(CompletionView::Achievements { queue }) => {
                if let Some(achievement) = queue.current() {
                    info!(achievement = %achievement.achievement_type, "achievement earned");
                }
                runtime.dispatch(SessionCommand::DismissAchievement).await?;
            }
            Some(CompletionView::Saving | CompletionView::CheckingAchievements) => {
                runtime.pump().await?;
            }
            None => bail!("workout is not finished"),
        }
    }
}
