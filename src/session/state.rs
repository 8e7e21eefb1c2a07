// ABOUTME: Session state tagged union with the inputs it accepts and the effects it emits
// ABOUTME: SessionSnapshot is the serializable view published to UI consumers after each input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::completion::CompletionView;
use super::countdown::Countdown;
use super::execution::{AudioCue, ExecutionPhaseState, ExecutionTimer};
use super::stages::{Stage, StageAction, StageSelector};
use crate::models::{Achievement, ExerciseProgress, SessionSettings, WorkoutLogRecord};
use crate::notifications::NotificationKind;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Where the session is
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Exercise list
    #[default]
    Overview,
    /// Setup sequence for one exercise
    Stages {
        /// Selected exercise
        exercise_index: usize,
        /// Stage navigation
        selector: StageSelector,
    },
    /// Pre-exercise countdown
    Countdown {
        /// Active exercise
        exercise_index: usize,
        /// Settings from the setup sequence
        settings: SessionSettings,
        /// Seconds until the set starts
        countdown: Countdown,
    },
    /// A set is running
    Exercising {
        /// Active exercise
        exercise_index: usize,
        /// Settings from the setup sequence
        settings: SessionSettings,
        /// Rep cadence
        timer: ExecutionTimer,
    },
    /// Between sets
    Resting {
        /// Active exercise
        exercise_index: usize,
        /// Settings from the setup sequence
        settings: SessionSettings,
        /// Seconds until the next set
        rest: Countdown,
    },
    /// All sets done, waiting for confirmation
    ExerciseComplete {
        /// Active exercise
        exercise_index: usize,
        /// Settings from the setup sequence
        settings: SessionSettings,
        /// Weight that will be recorded
        final_weight: f64,
    },
    /// Workout finished
    WorkoutComplete {
        /// The record being saved or already saved
        record: Box<WorkoutLogRecord>,
        /// Screen shown
        view: CompletionView,
    },
}

impl SessionState {
    /// Discriminant without data
    #[must_use]
    pub const fn kind(&self) -> SessionStateKind {
        match self {
            Self::Overview => SessionStateKind::Overview,
            Self::Stages { .. } => SessionStateKind::Stages,
            Self::Countdown { .. } => SessionStateKind::Countdown,
            Self::Exercising { .. } => SessionStateKind::Exercising,
            Self::Resting { .. } => SessionStateKind::Resting,
            Self::ExerciseComplete { .. } => SessionStateKind::ExerciseComplete,
            Self::WorkoutComplete { .. } => SessionStateKind::WorkoutComplete,
        }
    }

    /// The exercise that is active, if any
    #[must_use]
    pub const fn exercise_index(&self) -> Option<usize> {
        match self {
            Self::Stages { exercise_index, .. }
            | Self::Countdown { exercise_index, .. }
            | Self::Exercising { exercise_index, .. }
            | Self::Resting { exercise_index, .. }
            | Self::ExerciseComplete { exercise_index, .. } => Some(*exercise_index),
            Self::Overview | Self::WorkoutComplete { .. } => None,
        }
    }

    /// Settings of the active exercise, once the setup sequence is done
    #[must_use]
    pub const fn settings(&self) -> Option<&SessionSettings> {
        match self {
            Self::Countdown { settings, .. }
            | Self::Exercising { settings, .. }
            | Self::Resting { settings, .. }
            | Self::ExerciseComplete { settings, .. } => Some(settings),
            Self::Overview | Self::Stages { .. } | Self::WorkoutComplete { .. } => None,
        }
    }
}

/// Session state names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStateKind {
    /// Exercise list
    Overview,
    /// Setup sequence
    Stages,
    /// Pre-exercise countdown
    Countdown,
    /// Set running
    Exercising,
    /// Between sets
    Resting,
    /// Waiting for exercise confirmation
    ExerciseComplete,
    /// Workout finished
    WorkoutComplete,
}

impl SessionStateKind {
    /// Stable name used in errors and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Stages => "stages",
            Self::Countdown => "countdown",
            Self::Exercising => "exercising",
            Self::Resting => "resting",
            Self::ExerciseComplete => "exerciseComplete",
            Self::WorkoutComplete => "workoutComplete",
        }
    }
}

impl fmt::Display for SessionStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera availability as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraStatus {
    /// Not held
    #[default]
    Off,
    /// Permission prompt or device start in progress
    Acquiring,
    /// Stream held
    Ready,
    /// Acquisition failed; the exercise continues without recording
    Unavailable,
}

/// Actions taken by the user
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Pick an exercise from the overview
    SelectExercise(usize),
    /// Navigate or answer inside the setup sequence
    Stage(StageAction),
    /// Submit the setup sequence
    FinishStages,
    /// Tap "Complete Set"
    CompleteSet,
    /// Freeze the running set
    Pause,
    /// Continue the running set
    Resume,
    /// Change the working weight during the exercise
    AdjustWeight(f64),
    /// Attach a photo to the finished exercise
    AttachPhoto(Bytes),
    /// Confirm the finished exercise
    ConfirmExercise,
    /// Finish the workout, early or not
    FinishWorkout,
    /// Abandon the active exercise
    Cancel,
    /// Close the open achievement dialog
    DismissAchievement,
    /// Re-send a log that failed to save
    RetrySave,
}

impl SessionCommand {
    /// Stable name used in errors and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelectExercise(_) => "select_exercise",
            Self::Stage(action) => action.as_str(),
            Self::FinishStages => "finish_stages",
            Self::CompleteSet => "complete_set",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::AdjustWeight(_) => "adjust_weight",
            Self::AttachPhoto(_) => "attach_photo",
            Self::ConfirmExercise => "confirm_exercise",
            Self::FinishWorkout => "finish_workout",
            Self::Cancel => "cancel",
            Self::DismissAchievement => "dismiss_achievement",
            Self::RetrySave => "retry_save",
        }
    }
}

/// Everything the controller reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// A user action
    Command(SessionCommand),
    /// One countdown second elapsed for timers started at `epoch`
    ClockTick {
        /// Epoch the clock was started in
        epoch: u64,
    },
    /// One rep cadence tick elapsed for the ticker started at `epoch`
    PhaseTick {
        /// Epoch the ticker was started in
        epoch: u64,
    },
    /// The acquisition started by `AcquireCamera { attempt }` finished
    CameraAcquired {
        /// Attempt number from the effect
        attempt: u64,
        /// Error message when permission was denied or no camera exists
        result: Result<(), String>,
    },
    /// The held camera refused to start a recording
    RecordingUnavailable,
    /// A recorded segment finished uploading
    VideoUploaded {
        /// Exercise active when recording stopped
        exercise_index: usize,
        /// Durable URL
        url: String,
    },
    /// A photo finished uploading
    PhotoUploaded {
        /// Exercise the photo belongs to
        exercise_index: usize,
        /// Durable URL
        url: String,
    },
    /// Result of the log write
    LogPersisted(Result<(), String>),
    /// Achievements earned; empty when the check failed
    AchievementsChecked(Vec<Achievement>),
}

impl SessionInput {
    /// Stable name used in errors and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Command(command) => command.as_str(),
            Self::ClockTick { .. } => "clock_tick",
            Self::PhaseTick { .. } => "phase_tick",
            Self::CameraAcquired { .. } => "camera_acquired",
            Self::RecordingUnavailable => "recording_unavailable",
            Self::VideoUploaded { .. } => "video_uploaded",
            Self::PhotoUploaded { .. } => "photo_uploaded",
            Self::LogPersisted(_) => "log_persisted",
            Self::AchievementsChecked(_) => "achievements_checked",
        }
    }
}

impl From<SessionCommand> for SessionInput {
    fn from(command: SessionCommand) -> Self {
        Self::Command(command)
    }
}

/// Side effects requested by the controller, executed by the runtime in order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Open the front camera in the background
    AcquireCamera {
        /// Echoed back in [`SessionInput::CameraAcquired`]
        attempt: u64,
    },
    /// Stop all camera tracks
    ReleaseCamera,
    /// Begin recording for the exercise
    StartRecording {
        /// Exercise being recorded
        exercise_index: usize,
    },
    /// Stop recording and upload the segment
    StopRecording {
        /// Exercise being recorded
        exercise_index: usize,
        /// Set the segment belongs to
        set_number: u32,
    },
    /// Abort pending uploads for an exercise whose progress was discarded
    DiscardUploads {
        /// Exercise whose media is dropped
        exercise_index: usize,
    },
    /// Start the one-second clock
    StartClock {
        /// Epoch stamped on each tick
        epoch: u64,
    },
    /// Start the rep cadence ticker
    StartPhaseTicker {
        /// Epoch stamped on each tick
        epoch: u64,
    },
    /// Stop every running timer
    CancelTimers,
    /// Play a tone
    PlayCue(AudioCue),
    /// Upload a photo for the exercise
    UploadPhoto {
        /// Exercise the photo belongs to
        exercise_index: usize,
        /// Encoded image
        data: Bytes,
    },
    /// Write the log record
    PersistLog(Box<WorkoutLogRecord>),
    /// Ask for newly earned achievements
    CheckAchievements,
    /// Show a message to the user
    Notify {
        /// Message text
        message: String,
        /// Severity
        kind: NotificationKind,
    },
    /// Show the workout summary
    PresentSummary,
}

/// Serializable view of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Current state
    pub state: SessionStateKind,
    /// Workout name
    pub workout_name: String,
    /// Active exercise
    pub exercise_index: Option<usize>,
    /// Set number in progress, starting at 1
    pub current_set: u32,
    /// Working weight
    pub current_weight: f64,
    /// Camera availability for the active exercise
    pub camera: CameraStatus,
    /// Exercises confirmed complete
    pub completed_exercises: Vec<usize>,
    /// Setup stage shown
    pub stage: Option<Stage>,
    /// Seconds left in the pre-exercise countdown
    pub countdown_remaining: Option<u32>,
    /// Seconds left in the rest period
    pub rest_time_left: Option<u32>,
    /// Rep cadence state while exercising
    pub execution: Option<ExecutionPhaseState>,
    /// Settings of the active exercise
    pub settings: Option<SessionSettings>,
    /// Weight to be recorded for the finished exercise
    pub final_weight: Option<f64>,
    /// Per-exercise progress
    pub progress: Vec<ExerciseProgress>,
    /// Completion screen
    pub completion: Option<CompletionView>,
    /// Volume of the saved log
    pub total_volume: Option<f64>,
}
