// ABOUTME: Core data models for Pierre workout sessions
// ABOUTME: Re-exports Workout, Exercise, progress, log record, achievement and user types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Records exchanged between the session engine and its collaborators. Field
//! names follow the snake-case layout of the backing entity store so records
//! round-trip through the collaborators without renaming.
//!
//! ## Core Models
//!
//! - `Workout` / `Exercise`: the immutable plan for one session
//! - `ExerciseProgress`: per-exercise counters mutated as sets complete
//! - `SessionSettings`: choices made in the pre-exercise stages
//! - `WorkoutLogRecord`: the single record persisted when a session finishes
//! - `Achievement`: descriptor returned by the achievement check

mod achievement;
mod log;
mod progress;
mod user;
mod workout;

pub use achievement::Achievement;
pub use log::{total_volume, CompletedExercise, WorkoutLogRecord};
pub use progress::{ExerciseProgress, SessionSettings};
pub use user::{Entitlements, SessionUser};
pub use workout::{parse_target_reps, parse_target_reps_or, Exercise, Workout};
