// ABOUTME: Integration tests for the pre-exercise stage sequence
// ABOUTME: Verifies stage order, entitlement gating, back navigation and controller integration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{command, exercise, free_user, premium_user, workout};
use pierre_workout_session::config::SessionConfig;
use pierre_workout_session::errors::SessionError;
use pierre_workout_session::models::SessionUser;
use pierre_workout_session::session::{
    ExerciseHistory, SessionCommand, SessionController, SessionInput, SessionState,
    SessionStateKind, Stage, StageAction, StageSelector,
};

fn controller_for(user: SessionUser) -> SessionController {
    let mut squat = exercise("Squat", 3, "10");
    squat.coach_videos.insert(
        "coach-ana".to_owned(),
        "https://videos.example.com/ana/squat.mp4".to_owned(),
    );
    SessionController::new(
        user,
        workout(vec![squat]),
        ExerciseHistory::default(),
        SessionConfig::default(),
    )
    .unwrap()
}

fn stage(controller: &mut SessionController, action: StageAction) -> Result<(), SessionError> {
    controller
        .apply(SessionInput::Command(SessionCommand::Stage(action)))
        .map(|_| ())
}

#[test]
fn test_stages_run_in_fixed_order() {
    let mut selector = StageSelector::new(true, 0.0, None);
    let mut seen = vec![selector.current()];
    selector.apply(StageAction::Next).unwrap();
    seen.push(selector.current());
    selector.apply(StageAction::Next).unwrap();
    seen.push(selector.current());
    selector.apply(StageAction::ChooseRecord(true)).unwrap();
    selector.apply(StageAction::Next).unwrap();
    seen.push(selector.current());
    selector.apply(StageAction::ChooseTimer(false)).unwrap();
    selector.apply(StageAction::Next).unwrap();
    seen.push(selector.current());

    assert_eq!(
        seen,
        vec![
            Stage::Info,
            Stage::Demo,
            Stage::RecordChoice,
            Stage::TimerChoice,
            Stage::Weight
        ]
    );
    let settings = selector.finish().unwrap();
    assert!(settings.wants_to_record);
    assert!(!settings.use_timer);
}

#[test]
fn test_unanswered_choice_blocks_next() {
    let mut selector = StageSelector::new(true, 0.0, None);
    selector.apply(StageAction::Next).unwrap();
    selector.apply(StageAction::Next).unwrap();
    assert_eq!(
        selector.apply(StageAction::Next),
        Err(SessionError::StageIncomplete {
            stage: "record_choice"
        })
    );
    assert_eq!(selector.current(), Stage::RecordChoice);
}

#[test]
fn test_back_keeps_answers() {
    let mut selector = StageSelector::new(false, 42.5, None);
    for action in [
        StageAction::Next,
        StageAction::Next,
        StageAction::Next,
        StageAction::ChooseTimer(true),
        StageAction::Next,
    ] {
        selector.apply(action).unwrap();
    }
    selector.apply(StageAction::Back).unwrap();
    assert_eq!(selector.current(), Stage::TimerChoice);
    selector.apply(StageAction::Next).unwrap();

    let settings = selector.finish().unwrap();
    assert!(settings.use_timer);
    assert!((settings.weight - 42.5).abs() < f64::EPSILON);
}

#[test]
fn test_free_user_cannot_choose_recording() {
    let mut controller = controller_for(free_user());
    command(&mut controller, SessionCommand::SelectExercise(0));
    stage(&mut controller, StageAction::Next).unwrap();
    stage(&mut controller, StageAction::Next).unwrap();

    assert_eq!(
        stage(&mut controller, StageAction::ChooseRecord(true)),
        Err(SessionError::RecordingNotPermitted)
    );
    // The record stage is pre-answered with "no"
    stage(&mut controller, StageAction::Next).unwrap();
    assert_eq!(controller.snapshot().stage, Some(Stage::TimerChoice));
}

#[test]
fn test_finish_stages_requires_weight_stage() {
    let mut controller = controller_for(premium_user());
    command(&mut controller, SessionCommand::SelectExercise(0));
    assert!(matches!(
        controller.apply(SessionInput::Command(SessionCommand::FinishStages)),
        Err(SessionError::StageIncomplete { stage: "info" })
    ));
    assert_eq!(controller.state().kind(), SessionStateKind::Stages);
}

#[test]
fn test_negative_weight_rejected() {
    let mut controller = controller_for(free_user());
    command(&mut controller, SessionCommand::SelectExercise(0));
    for action in [
        StageAction::Next,
        StageAction::Next,
        StageAction::Next,
        StageAction::ChooseTimer(false),
        StageAction::Next,
    ] {
        stage(&mut controller, action).unwrap();
    }
    assert!(matches!(
        stage(&mut controller, StageAction::SetWeight(-5.0)),
        Err(SessionError::InvalidWeight { .. })
    ));
    assert!(matches!(
        stage(&mut controller, StageAction::SetWeight(f64::NAN)),
        Err(SessionError::InvalidWeight { .. })
    ));
    stage(&mut controller, StageAction::SetWeight(0.0)).unwrap();
    command(&mut controller, SessionCommand::FinishStages);
    assert_eq!(controller.state().kind(), SessionStateKind::Countdown);
}

#[test]
fn test_demo_video_prefers_users_coach() {
    let mut controller = controller_for(premium_user().with_coach("coach-ana"));
    command(&mut controller, SessionCommand::SelectExercise(0));
    match controller.state() {
        SessionState::Stages { selector, .. } => {
            assert_eq!(
                selector.demo_video(),
                Some("https://videos.example.com/ana/squat.mp4")
            );
        }
        other => panic!("expected stages, got {:?}", other.kind()),
    }
}

#[test]
fn test_stage_actions_outside_stages_rejected() {
    let mut controller = controller_for(free_user());
    assert!(matches!(
        stage(&mut controller, StageAction::Next),
        Err(SessionError::InvalidTransition {
            state: "overview",
            ..
        })
    ));
}
