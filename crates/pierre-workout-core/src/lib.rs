// ABOUTME: Core types and constants for the Pierre workout session engine
// ABOUTME: Foundation crate with the workout data model, timing constants, and error handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Workout Core
//!
//! Foundation crate providing shared types and constants for Pierre workout
//! sessions. The session engine, the demo binary and the integration tests all
//! build on these definitions, so this crate is kept free of async runtime and
//! I/O concerns.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the session-specific `SessionError`
//! - **constants**: Timing, rep, audio cue and storage constants
//! - **models**: Workout, exercise, progress, log record and achievement types

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Workout, Exercise, `ExerciseProgress`, `WorkoutLogRecord`, ...)
pub mod models;
