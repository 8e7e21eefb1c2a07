// ABOUTME: Main library entry point for the Pierre workout session engine
// ABOUTME: Sequences a user through exercise stages, timers, optional recording, rest and completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy, the engine has no FFI surface
#![deny(unsafe_code)]

//! # Pierre Workout Session
//!
//! In-session exercise tracking for Pierre Workouts. A session walks one user
//! through one scheduled workout: exercise selection, a short setup sequence,
//! a countdown, timed or manual sets with rest in between, optional camera
//! recording, and finally a saved workout log followed by any newly earned
//! achievements and the summary.
//!
//! ## Architecture
//!
//! - **Session**: the state machine ([`session::SessionController`]) and its
//!   tokio driver ([`session::SessionRuntime`])
//! - **External**: async collaborator traits for schedule, history, storage,
//!   achievements, camera and audio, plus in-memory implementations
//! - **Models / Errors / Constants**: re-exported from `pierre_workout_core`
//! - **Config**: `GYMFLOW_*` environment configuration
//! - **Logging**: structured tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_workout_session::config::SessionConfig;
//! use pierre_workout_session::errors::AppResult;
//! use pierre_workout_session::external::memory::InMemoryServices;
//! use pierre_workout_session::models::{SessionUser, Workout};
//! use pierre_workout_session::session::{SessionCommand, SessionRuntime};
//!
//! async fn run(workout: Workout) -> AppResult<()> {
//!     let name = workout.name.clone();
//!     let services = InMemoryServices::new(workout);
//!     let mut runtime = SessionRuntime::start(
//!         SessionUser::free("athlete@example.com"),
//!         &name,
//!         services.services(),
//!         SessionConfig::from_env(),
//!     )
//!     .await?;
//!     runtime.dispatch(SessionCommand::FinishWorkout).await?;
//!     Ok(())
//! }
//! ```

/// Shared error types (re-exported from `pierre_workout_core`)
pub use pierre_workout_core::errors;

/// Application constants (re-exported from `pierre_workout_core`)
pub use pierre_workout_core::constants;

/// Workout data models (re-exported from `pierre_workout_core`)
pub use pierre_workout_core::models;

/// Environment configuration
pub mod config;

/// Collaborator traits and in-memory implementations
pub mod external;

/// Structured logging setup
pub mod logging;

/// User notification interface
pub mod notifications;

/// Workout session state machine and runtime
pub mod session;
