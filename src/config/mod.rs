// ABOUTME: Configuration management module for workout session settings
// ABOUTME: Loads timer durations and photo templates from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for Pierre workout sessions
//!
//! Configuration is environment-only: every value has a compiled-in default
//! from `pierre_workout_core::constants`, and `GYMFLOW_*` variables override it.
//!
//! - **Session**: countdown, rest, side-switch and rep cadence timing
//! - **Logging**: tracing subscriber setup lives in [`crate::logging`]

/// Session timing configuration loaded from the environment
pub mod session;

pub use session::{SessionConfig, TimingConfig};
