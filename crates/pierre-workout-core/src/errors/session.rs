// ABOUTME: Session-specific error types raised by the workout state machine
// ABOUTME: Covers illegal transitions, entitlement gating, and invalid stage input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors raised while driving a workout session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The input is not accepted in the current state
    #[error("cannot handle '{input}' while in '{state}'")]
    InvalidTransition {
        /// State the session was in
        state: &'static str,
        /// Name of the rejected input
        input: &'static str,
    },
    /// Exercise index does not exist in the workout
    #[error("exercise index {index} out of range (workout has {count} exercises)")]
    ExerciseOutOfRange {
        /// Requested index
        index: usize,
        /// Number of exercises in the workout
        count: usize,
    },
    /// Exercise was already confirmed as complete
    #[error("exercise {index} is already completed")]
    ExerciseAlreadyCompleted {
        /// Index of the completed exercise
        index: usize,
    },
    /// Recording requested without premium or admin entitlement
    #[error("recording requires a premium or admin account")]
    RecordingNotPermitted,
    /// Photo capture requested without premium or admin entitlement
    #[error("photo capture requires a premium or admin account")]
    PhotoNotPermitted,
    /// Weight must be a finite, non-negative number
    #[error("invalid weight {weight}: must be a non-negative number")]
    InvalidWeight {
        /// Rejected value
        weight: f64,
    },
    /// A stage was submitted before its choice was made
    #[error("stage '{stage}' requires a choice before continuing")]
    StageIncomplete {
        /// Name of the incomplete stage
        stage: &'static str,
    },
    /// Retry requested but no workout log is waiting to be saved
    #[error("no workout log is waiting to be saved")]
    NoPendingLog,
}
