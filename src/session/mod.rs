// ABOUTME: Workout session engine: controller, setup stages, timers, capture and completion
// ABOUTME: Re-exports the types a caller needs to drive a session end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout session engine
//!
//! A session moves one user through one workout:
//!
//! ```text
//! overview -> stages -> countdown -> exercising -> resting -> exercising -> ...
//!                                              \-> exerciseComplete -> overview
//! overview -> workoutComplete (save log, achievements, summary)
//! ```
//!
//! [`SessionController`] is synchronous and performs no I/O. [`SessionRuntime`]
//! wraps it in a tokio event loop and executes the [`SessionEffect`]s it
//! returns.

/// Camera, recording and upload lifecycle
pub mod capture;
/// Log record construction and achievement sequencing
pub mod completion;
/// The session state machine
pub mod controller;
/// Whole-second countdowns and timer tasks
pub mod countdown;
/// Rep cadence engine
pub mod execution;
/// Previous-log lookups
pub mod history;
/// Tokio driver for the controller
pub mod runtime;
/// Setup sequence before each exercise
pub mod stages;
/// State, input and effect types
pub mod state;

pub use capture::{CameraSession, CaptureCoordinator, UploadTracker};
pub use completion::{AchievementQueue, CompletionAggregator, CompletionView};
pub use controller::SessionController;
pub use countdown::{Countdown, TimerHandle};
pub use execution::{
    AudioCue, ExecutionPhaseState, ExecutionSignal, ExecutionTimer, RepPhase, Side,
};
pub use history::{normalize_exercise_name, ExerciseHistory};
pub use runtime::SessionRuntime;
pub use stages::{Stage, StageAction, StageSelector};
pub use state::{
    CameraStatus, SessionCommand, SessionEffect, SessionInput, SessionSnapshot, SessionState,
    SessionStateKind,
};
