// ABOUTME: Session timing configuration loaded from GYMFLOW_* environment variables
// ABOUTME: Validates countdown, rest, side-switch and rep cadence durations before a session starts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{reps, timing};
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Durations driving the countdown, rest and rep cadence timers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pre-exercise countdown in seconds
    pub countdown_seconds: u32,
    /// Pause between the sides of a unilateral exercise in seconds
    pub side_switch_seconds: u32,
    /// Rest between sets when the exercise has no `rest_seconds`
    pub default_rest_seconds: u32,
    /// Contraction phase length in milliseconds
    pub contraction_ms: u64,
    /// Extension phase length in milliseconds
    pub extension_ms: u64,
    /// Rep cadence tick in milliseconds
    pub phase_tick_ms: u64,
    /// Wall-clock length of one countdown second in milliseconds
    pub clock_tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: timing::COUNTDOWN_SECONDS,
            side_switch_seconds: timing::SIDE_SWITCH_SECONDS,
            default_rest_seconds: timing::DEFAULT_REST_SECONDS,
            contraction_ms: timing::CONTRACTION_PHASE_MS,
            extension_ms: timing::EXTENSION_PHASE_MS,
            phase_tick_ms: timing::PHASE_TICK_MS,
            clock_tick_ms: timing::CLOCK_TICK_MS,
        }
    }
}

impl TimingConfig {
    /// Load timing configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            countdown_seconds: env_parse_or("GYMFLOW_COUNTDOWN_SECONDS", defaults.countdown_seconds),
            side_switch_seconds: env_parse_or(
                "GYMFLOW_SIDE_SWITCH_SECONDS",
                defaults.side_switch_seconds,
            ),
            default_rest_seconds: env_parse_or(
                "GYMFLOW_DEFAULT_REST_SECONDS",
                defaults.default_rest_seconds,
            ),
            contraction_ms: env_parse_or("GYMFLOW_CONTRACTION_MS", defaults.contraction_ms),
            extension_ms: env_parse_or("GYMFLOW_EXTENSION_MS", defaults.extension_ms),
            phase_tick_ms: env_parse_or("GYMFLOW_PHASE_TICK_MS", defaults.phase_tick_ms),
            clock_tick_ms: env_parse_or("GYMFLOW_CLOCK_TICK_MS", defaults.clock_tick_ms),
        }
    }

    /// Timings scaled down for simulations: one countdown second lasts 10ms
    #[must_use]
    pub fn accelerated() -> Self {
        Self {
            contraction_ms: 20,
            extension_ms: 60,
            phase_tick_ms: 1,
            clock_tick_ms: 10,
            ..Self::default()
        }
    }

    /// Ticks in one contraction phase, at least one
    #[must_use]
    pub const fn contraction_ticks(&self) -> u32 {
        phase_ticks(self.contraction_ms, self.phase_tick_ms)
    }

    /// Ticks in one extension phase, at least one
    #[must_use]
    pub const fn extension_ticks(&self) -> u32 {
        phase_ticks(self.extension_ms, self.phase_tick_ms)
    }

    /// Period of the rep cadence ticker, never shorter than 1ms
    #[must_use]
    pub const fn phase_tick(&self) -> Duration {
        Duration::from_millis(non_zero(self.phase_tick_ms))
    }

    /// Period of the one-second countdown clock, never shorter than 1ms
    #[must_use]
    pub const fn clock_tick(&self) -> Duration {
        Duration::from_millis(non_zero(self.clock_tick_ms))
    }

    /// Validate timing values
    ///
    /// # Errors
    ///
    /// Returns an error if a duration is zero or a phase is not a whole number of ticks
    pub fn validate(&self) -> AppResult<()> {
        if self.countdown_seconds == 0 || self.side_switch_seconds == 0 {
            return Err(invalid("countdown and side-switch durations must be at least 1 second"));
        }
        if self.default_rest_seconds == 0 {
            return Err(invalid("default rest must be at least 1 second"));
        }
        if self.phase_tick_ms == 0 || self.clock_tick_ms == 0 {
            return Err(invalid("tick periods must be at least 1 millisecond"));
        }
        if self.contraction_ms == 0 || self.extension_ms == 0 {
            return Err(invalid("rep phases must be at least 1 millisecond"));
        }
        if self.contraction_ms % self.phase_tick_ms != 0 || self.extension_ms % self.phase_tick_ms != 0
        {
            return Err(invalid(format!(
                "phase tick {}ms must divide contraction {}ms and extension {}ms",
                self.phase_tick_ms, self.contraction_ms, self.extension_ms
            )));
        }
        Ok(())
    }
}

/// Complete configuration for a workout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Timer durations
    pub timing: TimingConfig,
    /// Target reps used when a reps string cannot be parsed
    pub default_target_reps: u32,
    /// Photo overlay templates, selected by rotation
    pub photo_templates: Vec<String>,
    /// Number of previous logs fetched for weight suggestions
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            default_target_reps: reps::DEFAULT_TARGET_REPS,
            photo_templates: Vec::new(),
            history_limit: 20,
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timing: TimingConfig::from_env(),
            default_target_reps: env_parse_or(
                "GYMFLOW_DEFAULT_TARGET_REPS",
                defaults.default_target_reps,
            ),
            photo_templates: env::var("GYMFLOW_PHOTO_TEMPLATES")
                .map(|value| parse_list(&value))
                .unwrap_or_default(),
            history_limit: env_parse_or("GYMFLOW_HISTORY_LIMIT", defaults.history_limit),
        }
    }

    /// Validate the whole configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any timing value is invalid or the rep default is zero
    pub fn validate(&self) -> AppResult<()> {
        self.timing.validate()?;
        if self.default_target_reps == 0 {
            return Err(invalid("default target reps must be at least 1"));
        }
        Ok(())
    }
}

const fn non_zero(value: u64) -> u64 {
    if value == 0 {
        1
    } else {
        value
    }
}

const fn phase_ticks(phase_ms: u64, tick_ms: u64) -> u32 {
    let ticks = phase_ms / non_zero(tick_ms);
    if ticks == 0 {
        1
    } else {
        ticks as u32
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::new(ErrorCode::ConfigInvalid, message)
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, %default, "ignoring unparseable configuration value");
            default
        }),
        Err(_) => default,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
