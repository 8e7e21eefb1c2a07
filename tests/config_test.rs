// ABOUTME: Integration tests for GYMFLOW_* environment configuration
// ABOUTME: Runs serially because the tests mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_workout_session::config::{SessionConfig, TimingConfig};
use pierre_workout_session::errors::ErrorCode;
use serial_test::serial;
use std::env;

const VARS: [&str; 10] = [
    "GYMFLOW_COUNTDOWN_SECONDS",
    "GYMFLOW_SIDE_SWITCH_SECONDS",
    "GYMFLOW_DEFAULT_REST_SECONDS",
    "GYMFLOW_CONTRACTION_MS",
    "GYMFLOW_EXTENSION_MS",
    "GYMFLOW_PHASE_TICK_MS",
    "GYMFLOW_CLOCK_TICK_MS",
    "GYMFLOW_DEFAULT_TARGET_REPS",
    "GYMFLOW_PHOTO_TEMPLATES",
    "GYMFLOW_HISTORY_LIMIT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = SessionConfig::from_env();
    assert_eq!(config, SessionConfig::default());
    assert_eq!(config.timing.countdown_seconds, 10);
    assert_eq!(config.timing.default_rest_seconds, 60);
    assert_eq!(config.default_target_reps, 10);
    assert!(config.photo_templates.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("GYMFLOW_COUNTDOWN_SECONDS", "5");
    env::set_var("GYMFLOW_DEFAULT_REST_SECONDS", "90");
    env::set_var("GYMFLOW_PHASE_TICK_MS", "100");
    env::set_var("GYMFLOW_PHOTO_TEMPLATES", "templates/a.png, templates/b.png");
    env::set_var("GYMFLOW_HISTORY_LIMIT", "5");

    let config = SessionConfig::from_env();
    assert_eq!(config.timing.countdown_seconds, 5);
    assert_eq!(config.timing.default_rest_seconds, 90);
    assert_eq!(config.timing.contraction_ticks(), 10);
    assert_eq!(config.timing.extension_ticks(), 30);
    assert_eq!(
        config.photo_templates,
        vec!["templates/a.png".to_owned(), "templates/b.png".to_owned()]
    );
    assert_eq!(config.history_limit, 5);
    assert!(config.validate().is_ok());
    clear_env();
}

#[test]
#[serial]
fn test_unparseable_values_fall_back_to_defaults() {
    clear_env();
    env::set_var("GYMFLOW_SIDE_SWITCH_SECONDS", "ten");
    env::set_var("GYMFLOW_CLOCK_TICK_MS", "-1");

    let timing = TimingConfig::from_env();
    assert_eq!(timing, TimingConfig::default());
    clear_env();
}

#[test]
#[serial]
fn test_zero_durations_fail_validation() {
    clear_env();
    env::set_var("GYMFLOW_COUNTDOWN_SECONDS", "0");
    let err = SessionConfig::from_env().validate().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    clear_env();
    env::set_var("GYMFLOW_DEFAULT_TARGET_REPS", "0");
    assert!(SessionConfig::from_env().validate().is_err());
    clear_env();
}
