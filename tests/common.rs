// ABOUTME: Shared test utilities and fixtures for workout session integration tests
// ABOUTME: Provides quiet logging setup, workout builders and a stage walk-through helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_workout_session`

use pierre_workout_session::config::{SessionConfig, TimingConfig};
use pierre_workout_session::external::memory::InMemoryServices;
use pierre_workout_session::models::{Exercise, SessionUser, Workout};
use pierre_workout_session::session::{
    CameraStatus, SessionCommand, SessionController, SessionInput, SessionRuntime, StageAction,
};
use std::collections::HashMap;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Bilateral exercise with 30s rest
pub fn exercise(name: &str, sets: u32, reps: &str) -> Exercise {
    Exercise {
        name: name.to_owned(),
        exercise_code: None,
        sets,
        reps: reps.to_owned(),
        rest_seconds: Some(30),
        is_unilateral: false,
        video_url: Some(format!("https://videos.example.com/{}.mp4", name.to_lowercase())),
        coach_videos: HashMap::new(),
        notes: None,
    }
}

/// Unilateral exercise with 30s rest
pub fn unilateral(name: &str, sets: u32, reps: &str) -> Exercise {
    Exercise {
        is_unilateral: true,
        ..exercise(name, sets, reps)
    }
}

pub fn workout(exercises: Vec<Exercise>) -> Workout {
    Workout {
        name: "Leg Day".to_owned(),
        muscle_group: "legs".to_owned(),
        duration_minutes: 45,
        exercises,
    }
}

pub fn free_user() -> SessionUser {
    SessionUser::free("ana@example.com")
}

pub fn premium_user() -> SessionUser {
    SessionUser::premium("ana@example.com")
}

/// Default configuration with accelerated timing: 10ms seconds, 1ms phase ticks
pub fn fast_config() -> SessionConfig {
    SessionConfig {
        timing: TimingConfig::accelerated(),
        ..SessionConfig::default()
    }
}

/// Stage actions that walk from info to the weight stage and set `weight`
pub fn stage_actions(can_record: bool, record: bool, use_timer: bool, weight: f64) -> Vec<SessionCommand> {
    let mut actions = vec![StageAction::Next, StageAction::Next];
    if can_record {
        actions.push(StageAction::ChooseRecord(record));
    }
    actions.extend([
        StageAction::Next,
        StageAction::ChooseTimer(use_timer),
        StageAction::Next,
        StageAction::SetWeight(weight),
    ]);
    actions.into_iter().map(SessionCommand::Stage).collect()
}

/// Select `index` and finish the stages on a bare controller
pub fn start_exercise(
    controller: &mut SessionController,
    index: usize,
    use_timer: bool,
    weight: f64,
) {
    let can_record = controller.user().entitlements.can_capture();
    command(controller, SessionCommand::SelectExercise(index));
    for action in stage_actions(can_record, false, use_timer, weight) {
        command(controller, action);
    }
    command(controller, SessionCommand::FinishStages);
}

pub fn command(
    controller: &mut SessionController,
    command: SessionCommand,
) -> Vec<pierre_workout_session::session::SessionEffect> {
    controller.apply(SessionInput::Command(command)).unwrap()
}

/// Deliver `seconds` clock ticks stamped with the current epoch
pub fn tick_seconds(controller: &mut SessionController, seconds: u32) {
    for _ in 0..seconds {
        let epoch = controller.epoch();
        controller.apply(SessionInput::ClockTick { epoch }).unwrap();
    }
}

/// Select `index`, finish the stages through the runtime and wait for the camera
pub async fn start_exercise_async(
    runtime: &mut SessionRuntime,
    index: usize,
    record: bool,
    use_timer: bool,
    weight: f64,
) {
    let can_record = runtime.controller().user().entitlements.can_capture();
    runtime
        .dispatch(SessionCommand::SelectExercise(index))
        .await
        .unwrap();
    for action in stage_actions(can_record, record, use_timer, weight) {
        runtime.dispatch(action).await.unwrap();
    }
    runtime.dispatch(SessionCommand::FinishStages).await.unwrap();
    runtime
        .advance_until(|snapshot| snapshot.camera != CameraStatus::Acquiring)
        .await
        .unwrap();
}

/// Runtime over in-memory services for `user`
pub async fn runtime_for(
    workout: Workout,
    user: SessionUser,
) -> (SessionRuntime, InMemoryServices) {
    init_test_logging();
    let name = workout.name.clone();
    let services = InMemoryServices::new(workout);
    let runtime = SessionRuntime::start(user, &name, services.services(), fast_config())
        .await
        .unwrap();
    (runtime, services)
}
