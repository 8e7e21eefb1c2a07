// ABOUTME: Pre-exercise setup sequence: info, demo, record choice, timer choice and weight
// ABOUTME: Produces the SessionSettings consumed when the countdown starts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::SessionError;
use crate::models::SessionSettings;
use serde::Serialize;

/// One step of the setup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Exercise description and targets
    Info,
    /// Demo video
    Demo,
    /// Record the set or not
    RecordChoice,
    /// Automatic rep timer or manual completion
    TimerChoice,
    /// Working weight
    Weight,
}

const STAGE_ORDER: [Stage; 5] = [
    Stage::Info,
    Stage::Demo,
    Stage::RecordChoice,
    Stage::TimerChoice,
    Stage::Weight,
];

impl Stage {
    /// Stable name used in errors and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Demo => "demo",
            Self::RecordChoice => "record_choice",
            Self::TimerChoice => "timer_choice",
            Self::Weight => "weight",
        }
    }
}

/// User actions inside the setup sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageAction {
    /// Go to the next stage
    Next,
    /// Go to the previous stage
    Back,
    /// Answer the record question
    ChooseRecord(bool),
    /// Answer the timer question
    ChooseTimer(bool),
    /// Set the working weight in kilograms
    SetWeight(f64),
}

impl StageAction {
    /// Stable name used in errors and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Back => "back",
            Self::ChooseRecord(_) => "choose_record",
            Self::ChooseTimer(_) => "choose_timer",
            Self::SetWeight(_) => "set_weight",
        }
    }
}

/// Forward/backward navigation over the fixed stage list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSelector {
    index: usize,
    can_record: bool,
    wants_to_record: Option<bool>,
    use_timer: Option<bool>,
    weight: f64,
    demo_video: Option<String>,
}

impl StageSelector {
    /// Start at the info stage.
    ///
    /// Without the capture entitlement the record answer is fixed to "no".
    #[must_use]
    pub fn new(can_record: bool, initial_weight: f64, demo_video: Option<String>) -> Self {
        Self {
            index: 0,
            can_record,
            wants_to_record: if can_record { None } else { Some(false) },
            use_timer: None,
            weight: initial_weight.max(0.0),
            demo_video,
        }
    }

    /// Stage currently shown
    #[must_use]
    pub const fn current(&self) -> Stage {
        STAGE_ORDER[self.index]
    }

    /// Whether "record: yes" is offered
    #[must_use]
    pub const fn can_record(&self) -> bool {
        self.can_record
    }

    /// Demo video resolved for this user
    #[must_use]
    pub fn demo_video(&self) -> Option<&str> {
        self.demo_video.as_deref()
    }

    /// Weight that will be submitted
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Apply a navigation or answer action
    ///
    /// # Errors
    ///
    /// Returns an error if the action does not belong to the current stage,
    /// if the stage's answer is missing when moving forward, or if recording
    /// is requested without entitlement
    pub fn apply(&mut self, action: StageAction) -> Result<(), SessionError> {
        match action {
            StageAction::Next => self.next(),
            StageAction::Back => self.back(),
            StageAction::ChooseRecord(record) => {
                self.expect_stage(Stage::RecordChoice, action)?;
                if record && !self.can_record {
                    return Err(SessionError::RecordingNotPermitted);
                }
                self.wants_to_record = Some(record);
                Ok(())
            }
            StageAction::ChooseTimer(use_timer) => {
                self.expect_stage(Stage::TimerChoice, action)?;
                self.use_timer = Some(use_timer);
                Ok(())
            }
            StageAction::SetWeight(weight) => {
                self.expect_stage(Stage::Weight, action)?;
                if !weight.is_finite() || weight < 0.0 {
                    return Err(SessionError::InvalidWeight { weight });
                }
                self.weight = weight;
                Ok(())
            }
        }
    }

    /// Produce the settings from the weight stage
    ///
    /// # Errors
    ///
    /// Returns an error when called before the weight stage or with an
    /// unanswered question
    pub fn finish(&self) -> Result<SessionSettings, SessionError> {
        if self.current() != Stage::Weight {
            return Err(SessionError::StageIncomplete {
                stage: self.current().as_str(),
            });
        }
        let wants_to_record = self.wants_to_record.ok_or(SessionError::StageIncomplete {
            stage: Stage::RecordChoice.as_str(),
        })?;
        let use_timer = self.use_timer.ok_or(SessionError::StageIncomplete {
            stage: Stage::TimerChoice.as_str(),
        })?;
        Ok(SessionSettings {
            wants_to_record: wants_to_record && self.can_record,
            use_timer,
            weight: self.weight,
        })
    }

    fn next(&mut self) -> Result<(), SessionError> {
        let stage = self.current();
        let answered = match stage {
            Stage::RecordChoice => self.wants_to_record.is_some(),
            Stage::TimerChoice => self.use_timer.is_some(),
            Stage::Info | Stage::Demo => true,
            Stage::Weight => {
                return Err(SessionError::InvalidTransition {
                    state: stage.as_str(),
                    input: StageAction::Next.as_str(),
                })
            }
        };
        if !answered {
            return Err(SessionError::StageIncomplete {
                stage: stage.as_str(),
            });
        }
        self.index += 1;
        Ok(())
    }

    fn back(&mut self) -> Result<(), SessionError> {
        if self.index == 0 {
            return Err(SessionError::InvalidTransition {
                state: Stage::Info.as_str(),
                input: StageAction::Back.as_str(),
            });
        }
        self.index -= 1;
        Ok(())
    }

    fn expect_stage(&self, stage: Stage, action: StageAction) -> Result<(), SessionError> {
        if self.current() == stage {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                state: self.current().as_str(),
                input: action.as_str(),
            })
        }
    }
}
