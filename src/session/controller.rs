// ABOUTME: Workout session state machine with a single transition function
// ABOUTME: Pure with respect to I/O: each input mutates session state and returns the effects to run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session controller
//!
//! [`SessionController::apply`] is the only way the session changes. Inputs
//! that do not belong to the current state are rejected with
//! [`SessionError::InvalidTransition`] and leave the state untouched.
//!
//! Every state change bumps the timer epoch and emits
//! [`SessionEffect::CancelTimers`]. Timer inputs carry the epoch their timer
//! was started in, and ticks from an earlier epoch are ignored, so a timer
//! belonging to an abandoned state can never drive a transition.

use super::completion::{AchievementQueue, CompletionAggregator, CompletionView};
use super::countdown::Countdown;
use super::execution::{ExecutionSignal, ExecutionTimer};
use super::history::ExerciseHistory;
use super::stages::StageSelector;
use super::state::{
    CameraStatus, SessionCommand, SessionEffect, SessionInput, SessionSnapshot, SessionState,
};
use crate::config::SessionConfig;
use crate::errors::{AppResult, SessionError};
use crate::models::{
    Achievement, Exercise, ExerciseProgress, SessionSettings, SessionUser, Workout,
    WorkoutLogRecord,
};
use crate::notifications::NotificationKind;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Owns one user's run through one workout
#[derive(Debug)]
pub struct SessionController {
    user: SessionUser,
    workout: Workout,
    config: SessionConfig,
    history: ExerciseHistory,
    progress: Vec<ExerciseProgress>,
    completed: Vec<bool>,
    state: SessionState,
    current_set: u32,
    current_weight: f64,
    started_at: DateTime<Utc>,
    epoch: u64,
    camera: CameraStatus,
    camera_attempt: u64,
    log_id: Uuid,
    summary_presented: bool,
}

impl SessionController {
    /// Session starting now in the overview
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(
        user: SessionUser,
        workout: Workout,
        history: ExerciseHistory,
        config: SessionConfig,
    ) -> AppResult<Self> {
        Self::starting_at(user, workout, history, config, Utc::now())
    }

    /// Session that started at `started_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn starting_at(
        user: SessionUser,
        workout: Workout,
        history: ExerciseHistory,
        config: SessionConfig,
        started_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        config.validate()?;
        let progress = workout
            .exercises
            .iter()
            .map(ExerciseProgress::for_exercise)
            .collect();
        let completed = vec![false; workout.exercises.len()];
        Ok(Self {
            user,
            workout,
            config,
            history,
            progress,
            completed,
            state: SessionState::Overview,
            current_set: 1,
            current_weight: 0.0,
            started_at,
            epoch: 0,
            camera: CameraStatus::Off,
            camera_attempt: 0,
            log_id: Uuid::new_v4(),
            summary_presented: false,
        })
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The workout being performed
    #[must_use]
    pub const fn workout(&self) -> &Workout {
        &self.workout
    }

    /// The session's user
    #[must_use]
    pub const fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Per-exercise progress in workout order
    #[must_use]
    pub fn progress(&self) -> &[ExerciseProgress] {
        &self.progress
    }

    /// Whether the exercise at `index` was confirmed complete
    #[must_use]
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    /// Set number in progress, starting at 1
    #[must_use]
    pub const fn current_set(&self) -> u32 {
        self.current_set
    }

    /// Working weight
    #[must_use]
    pub const fn current_weight(&self) -> f64 {
        self.current_weight
    }

    /// Current timer epoch
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Validated configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Camera availability
    #[must_use]
    pub const fn camera(&self) -> CameraStatus {
        self.camera
    }

    /// Attempt number of the latest camera acquisition
    #[must_use]
    pub const fn camera_attempt(&self) -> u64 {
        self.camera_attempt
    }

    /// Whether the summary screen has been shown
    #[must_use]
    pub const fn summary_presented(&self) -> bool {
        self.summary_presented
    }

    /// The log record, once the workout is finished
    #[must_use]
    pub fn record(&self) -> Option<&WorkoutLogRecord> {
        match &self.state {
            SessionState::WorkoutComplete { record, .. } => Some(&**record),
            _ => None,
        }
    }

    /// Apply an input at the current time
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid in the current state; the
    /// state is left unchanged
    pub fn apply(&mut self, input: SessionInput) -> Result<Vec<SessionEffect>, SessionError> {
        self.apply_at(input, Utc::now())
    }

    /// Apply an input, using `now` as the finishing time if the workout ends
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid in the current state; the
    /// state is left unchanged
    pub fn apply_at(
        &mut self,
        input: SessionInput,
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let before = self.state.kind();
        let name = input.as_str();
        let effects = match input {
            SessionInput::Command(command) => self.on_command(command, now),
            SessionInput::ClockTick { epoch } => Ok(self.on_clock_tick(epoch)),
            SessionInput::PhaseTick { epoch } => Ok(self.on_phase_tick(epoch)),
            SessionInput::CameraAcquired { attempt, result } => {
                Ok(self.on_camera_acquired(attempt, result))
            }
            SessionInput::RecordingUnavailable => Ok(self.disable_recording()),
            SessionInput::VideoUploaded {
                exercise_index,
                url,
            } => Ok(self.attach_media(exercise_index, url, MediaKind::Video)),
            SessionInput::PhotoUploaded {
                exercise_index,
                url,
            } => Ok(self.attach_media(exercise_index, url, MediaKind::Photo)),
            SessionInput::LogPersisted(result) => self.on_log_persisted(result),
            SessionInput::AchievementsChecked(achievements) => {
                self.on_achievements_checked(achievements)
            }
        }?;

        let after = self.state.kind();
        if before != after {
            info!(
                from = %before,
                to = %after,
                input = name,
                exercise_index = ?self.state.exercise_index(),
                epoch = self.epoch,
                "session transition"
            );
        }
        Ok(effects)
    }

    fn on_command(
        &mut self,
        command: SessionCommand,
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let name = command.as_str();
        match command {
            SessionCommand::SelectExercise(index) => self.select_exercise(index, name),
            SessionCommand::Stage(action) => match &mut self.state {
                SessionState::Stages { selector, .. } => {
                    selector.apply(action)?;
                    Ok(Vec::new())
                }
                _ => Err(self.rejected(name)),
            },
            SessionCommand::FinishStages => self.finish_stages(name),
            SessionCommand::CompleteSet => self.complete_set_manually(name),
            SessionCommand::Pause => self.set_paused(true, name),
            SessionCommand::Resume => self.set_paused(false, name),
            SessionCommand::AdjustWeight(weight) => self.adjust_weight(weight, name),
            SessionCommand::AttachPhoto(data) => self.attach_photo(data, name),
            SessionCommand::ConfirmExercise => self.confirm_exercise(name),
            SessionCommand::FinishWorkout => self.finish_workout(now, name),
            SessionCommand::Cancel => self.cancel(name),
            SessionCommand::DismissAchievement => self.dismiss_achievement(name),
            SessionCommand::RetrySave => self.retry_save(),
        }
    }

    fn select_exercise(
        &mut self,
        index: usize,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if !matches!(self.state, SessionState::Overview) {
            return Err(self.rejected(name));
        }
        let exercise = self
            .workout
            .exercise(index)
            .ok_or(SessionError::ExerciseOutOfRange {
                index,
                count: self.workout.exercises.len(),
            })?;
        if self.is_completed(index) {
            return Err(SessionError::ExerciseAlreadyCompleted { index });
        }

        let weight = self.history.previous_weight(exercise).unwrap_or(0.0);
        let demo_video = exercise
            .demo_video(self.user.coach_id.as_deref())
            .map(str::to_owned);
        let selector =
            StageSelector::new(self.user.entitlements.can_capture(), weight, demo_video);

        self.current_set = 1;
        self.current_weight = weight;
        let mut effects = Vec::new();
        self.next_epoch(&mut effects);
        self.state = SessionState::Stages {
            exercise_index: index,
            selector,
        };
        Ok(effects)
    }

    fn finish_stages(&mut self, name: &'static str) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::Stages {
            exercise_index,
            selector,
        } = &self.state
        else {
            return Err(self.rejected(name));
        };
        let exercise_index = *exercise_index;
        let settings = selector.finish()?;

        self.current_weight = settings.weight;
        let mut effects = Vec::new();
        let epoch = self.next_epoch(&mut effects);
        self.camera_attempt += 1;
        self.camera = CameraStatus::Acquiring;
        effects.push(SessionEffect::AcquireCamera {
            attempt: self.camera_attempt,
        });
        effects.push(SessionEffect::StartClock { epoch });
        self.state = SessionState::Countdown {
            exercise_index,
            settings,
            countdown: Countdown::new(self.config.timing.countdown_seconds),
        };
        Ok(effects)
    }

    fn on_clock_tick(&mut self, epoch: u64) -> Vec<SessionEffect> {
        if self.is_stale(epoch, "clock_tick") {
            return Vec::new();
        }
        match &mut self.state {
            SessionState::Countdown {
                exercise_index,
                settings,
                countdown,
            } => {
                if countdown.tick() {
                    let (index, settings) = (*exercise_index, *settings);
                    return self.begin_set(index, settings);
                }
                Vec::new()
            }
            SessionState::Resting {
                exercise_index,
                settings,
                rest,
            } => {
                if rest.tick() {
                    let (index, settings) = (*exercise_index, *settings);
                    return self.begin_set(index, settings);
                }
                Vec::new()
            }
            SessionState::Exercising {
                exercise_index,
                settings,
                timer,
            } => {
                let signals = timer.on_clock_tick();
                let (index, settings) = (*exercise_index, *settings);
                self.handle_signals(index, settings, signals)
            }
            _ => Vec::new(),
        }
    }

    fn on_phase_tick(&mut self, epoch: u64) -> Vec<SessionEffect> {
        if self.is_stale(epoch, "phase_tick") {
            return Vec::new();
        }
        let SessionState::Exercising {
            exercise_index,
            settings,
            timer,
        } = &mut self.state
        else {
            return Vec::new();
        };
        let signals = timer.on_phase_tick();
        let (index, settings) = (*exercise_index, *settings);
        self.handle_signals(index, settings, signals)
    }

    fn begin_set(&mut self, exercise_index: usize, settings: SessionSettings) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        let epoch = self.next_epoch(&mut effects);
        let target_reps = self.target_reps(exercise_index);
        let unilateral = self
            .workout
            .exercise(exercise_index)
            .is_some_and(|exercise| exercise.is_unilateral);

        let timer = ExecutionTimer::new(
            target_reps,
            unilateral,
            settings.use_timer,
            &self.config.timing,
        );
        effects.extend(timer.start().into_iter().filter_map(cue_effect));
        if settings.use_timer {
            effects.push(SessionEffect::StartPhaseTicker { epoch });
        }
        if settings.wants_to_record && self.camera == CameraStatus::Ready {
            effects.push(SessionEffect::StartRecording { exercise_index });
        }
        debug!(exercise_index, set = self.current_set, target_reps, "set started");
        self.state = SessionState::Exercising {
            exercise_index,
            settings,
            timer,
        };
        effects
    }

    fn complete_set_manually(
        &mut self,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::Exercising {
            exercise_index,
            settings,
            timer,
        } = &mut self.state
        else {
            return Err(self.rejected(name));
        };
        if timer.is_switching_sides() {
            return Err(SessionError::InvalidTransition {
                state: "side_switch",
                input: name,
            });
        }
        let signals = timer.complete_set_manually();
        let (index, settings) = (*exercise_index, *settings);
        Ok(self.handle_signals(index, settings, signals))
    }

    fn handle_signals(
        &mut self,
        exercise_index: usize,
        settings: SessionSettings,
        signals: Vec<ExecutionSignal>,
    ) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        for signal in signals {
            match signal {
                ExecutionSignal::Cue(cue) => effects.push(SessionEffect::PlayCue(cue)),
                ExecutionSignal::RepCompleted { rep, side } => {
                    debug!(exercise_index, rep, ?side, "rep completed");
                }
                ExecutionSignal::SideSwitchStarted { seconds } => {
                    let epoch = self.next_epoch(&mut effects);
                    effects.push(SessionEffect::StartClock { epoch });
                    info!(exercise_index, seconds, "switching sides");
                }
                ExecutionSignal::SideSwitchFinished => {
                    let epoch = self.next_epoch(&mut effects);
                    if settings.use_timer {
                        effects.push(SessionEffect::StartPhaseTicker { epoch });
                    }
                }
                ExecutionSignal::SetComplete => {
                    effects.extend(self.finish_set(exercise_index, settings));
                }
            }
        }
        effects
    }

    fn finish_set(&mut self, exercise_index: usize, settings: SessionSettings) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        let epoch = self.next_epoch(&mut effects);
        if settings.wants_to_record {
            effects.push(SessionEffect::StopRecording {
                exercise_index,
                set_number: self.current_set,
            });
        }

        let reps = self.target_reps(exercise_index);
        let weight = self.current_weight;
        let Some(progress) = self.progress.get_mut(exercise_index) else {
            return effects;
        };
        if !progress.record_set(reps, weight) {
            warn!(exercise_index, "set ignored, target sets already reached");
        }
        info!(
            exercise_index,
            set = self.current_set,
            reps,
            weight_kg = weight,
            "set complete"
        );

        let target_sets = self
            .workout
            .exercise(exercise_index)
            .map_or(0, |exercise| exercise.sets);
        if self.current_set < target_sets {
            self.current_set += 1;
            let rest_seconds = self.rest_seconds(exercise_index);
            effects.push(SessionEffect::StartClock { epoch });
            self.state = SessionState::Resting {
                exercise_index,
                settings,
                rest: Countdown::new(rest_seconds),
            };
        } else {
            self.state = SessionState::ExerciseComplete {
                exercise_index,
                settings,
                final_weight: weight,
            };
        }
        effects
    }

    fn set_paused(
        &mut self,
        paused: bool,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::Exercising { timer, .. } = &mut self.state else {
            return Err(self.rejected(name));
        };
        if paused {
            timer.pause();
        } else {
            timer.resume();
        }
        Ok(Vec::new())
    }

    fn adjust_weight(
        &mut self,
        weight: f64,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if !matches!(
            self.state,
            SessionState::Exercising { .. } | SessionState::Resting { .. }
        ) {
            return Err(self.rejected(name));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(SessionError::InvalidWeight { weight });
        }
        self.current_weight = weight;
        Ok(Vec::new())
    }

    fn attach_photo(
        &mut self,
        data: Bytes,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::ExerciseComplete { exercise_index, .. } = self.state else {
            return Err(self.rejected(name));
        };
        if !self.user.entitlements.can_capture() {
            return Err(SessionError::PhotoNotPermitted);
        }
        let template = self.workout.exercise(exercise_index).and_then(|exercise| {
            self.history
                .template_for(exercise, &self.config.photo_templates)
                .map(str::to_owned)
        });
        if let Some(progress) = self.progress.get_mut(exercise_index) {
            progress.template_url = template;
        }
        Ok(vec![SessionEffect::UploadPhoto {
            exercise_index,
            data,
        }])
    }

    fn confirm_exercise(&mut self, name: &'static str) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::ExerciseComplete {
            exercise_index,
            final_weight,
            ..
        } = self.state
        else {
            return Err(self.rejected(name));
        };
        if let Some(progress) = self.progress.get_mut(exercise_index) {
            progress.weight_kg = final_weight;
        }
        if let Some(done) = self.completed.get_mut(exercise_index) {
            *done = true;
        }

        let mut effects = Vec::new();
        self.next_epoch(&mut effects);
        self.release_camera(&mut effects);
        self.current_set = 1;
        self.state = SessionState::Overview;
        Ok(effects)
    }

    fn finish_workout(
        &mut self,
        now: DateTime<Utc>,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        if !matches!(self.state, SessionState::Overview) {
            return Err(self.rejected(name));
        }
        let record = CompletionAggregator::build_record(
            self.log_id,
            &self.user,
            &self.workout,
            &self.progress,
            self.started_at,
            now,
        );
        info!(
            log_id = %record.log_id,
            exercises = record.exercises_completed.len(),
            total_volume = record.total_volume,
            duration_minutes = record.duration_minutes,
            "workout finished"
        );

        let mut effects = Vec::new();
        self.next_epoch(&mut effects);
        self.release_camera(&mut effects);
        effects.push(SessionEffect::PersistLog(Box::new(record.clone())));
        self.state = SessionState::WorkoutComplete {
            record: Box::new(record),
            view: CompletionView::Saving,
        };
        Ok(effects)
    }

    fn cancel(&mut self, name: &'static str) -> Result<Vec<SessionEffect>, SessionError> {
        let mut effects = Vec::new();
        match self.state {
            SessionState::Stages { .. } => {
                self.next_epoch(&mut effects);
            }
            SessionState::Countdown { exercise_index, .. }
            | SessionState::Exercising { exercise_index, .. }
            | SessionState::Resting { exercise_index, .. } => {
                self.next_epoch(&mut effects);
                self.release_camera(&mut effects);
                effects.push(SessionEffect::DiscardUploads { exercise_index });
                if let Some(progress) = self.progress.get_mut(exercise_index) {
                    progress.discard_partial();
                }
                info!(exercise_index, "exercise cancelled, partial sets discarded");
            }
            _ => return Err(self.rejected(name)),
        }
        self.current_set = 1;
        self.state = SessionState::Overview;
        Ok(effects)
    }

    fn on_camera_acquired(&mut self, attempt: u64, result: Result<(), String>) -> Vec<SessionEffect> {
        if attempt != self.camera_attempt || self.camera != CameraStatus::Acquiring {
            debug!(attempt, current = self.camera_attempt, "stale camera result ignored");
            return Vec::new();
        }
        match result {
            Ok(()) => {
                self.camera = CameraStatus::Ready;
                match self.state {
                    SessionState::Exercising {
                        exercise_index,
                        settings,
                        ..
                    } if settings.wants_to_record => {
                        debug!(exercise_index, "camera ready mid-set, recording the rest");
                        vec![SessionEffect::StartRecording { exercise_index }]
                    }
                    _ => Vec::new(),
                }
            }
            Err(message) => {
                warn!(attempt, %message, "camera unavailable");
                self.camera = CameraStatus::Unavailable;
                let mut effects = self.disable_recording();
                effects.push(SessionEffect::Notify {
                    message: "Camera unavailable. Continuing without recording.".to_owned(),
                    kind: NotificationKind::Warning,
                });
                effects
            }
        }
    }

    fn disable_recording(&mut self) -> Vec<SessionEffect> {
        match &mut self.state {
            SessionState::Countdown { settings, .. }
            | SessionState::Exercising { settings, .. }
            | SessionState::Resting { settings, .. } => {
                if settings.wants_to_record {
                    warn!("recording unavailable, continuing without it");
                }
                settings.wants_to_record = false;
            }
            _ => debug!("recording unavailable outside a camera state"),
        }
        Vec::new()
    }

    fn release_camera(&mut self, effects: &mut Vec<SessionEffect>) {
        self.camera = CameraStatus::Off;
        effects.push(SessionEffect::ReleaseCamera);
    }

    fn attach_media(&mut self, exercise_index: usize, url: String, kind: MediaKind) -> Vec<SessionEffect> {
        if matches!(self.state, SessionState::WorkoutComplete { .. }) {
            warn!(exercise_index, ?kind, "upload finished after the log was built");
            return Vec::new();
        }
        match self.progress.get_mut(exercise_index) {
            Some(progress) if progress.sets_completed > 0 => {
                debug!(exercise_index, ?kind, %url, "media attached");
                match kind {
                    MediaKind::Video => progress.video_url = Some(url),
                    MediaKind::Photo => progress.photo_url = Some(url),
                }
            }
            _ => debug!(exercise_index, ?kind, "upload for discarded exercise ignored"),
        }
        Vec::new()
    }

    fn on_log_persisted(
        &mut self,
        result: Result<(), String>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::WorkoutComplete { view, .. } = &mut self.state else {
            return Err(self.rejected("log_persisted"));
        };
        if *view != CompletionView::Saving {
            return Err(SessionError::InvalidTransition {
                state: view.as_str(),
                input: "log_persisted",
            });
        }
        match result {
            Ok(()) => {
                *view = CompletionView::CheckingAchievements;
                Ok(vec![
                    SessionEffect::Notify {
                        message: "Workout saved".to_owned(),
                        kind: NotificationKind::Success,
                    },
                    SessionEffect::CheckAchievements,
                ])
            }
            Err(message) => {
                *view = CompletionView::SaveFailed {
                    message: message.clone(),
                };
                Ok(vec![SessionEffect::Notify {
                    message: format!("Could not save workout: {message}"),
                    kind: NotificationKind::Error,
                }])
            }
        }
    }

    fn retry_save(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        match &mut self.state {
            SessionState::WorkoutComplete { record, view }
                if matches!(*view, CompletionView::SaveFailed { .. }) =>
            {
                *view = CompletionView::Saving;
                info!(log_id = %record.log_id, "retrying workout log save");
                Ok(vec![SessionEffect::PersistLog(record.clone())])
            }
            _ => Err(SessionError::NoPendingLog),
        }
    }

    fn on_achievements_checked(
        &mut self,
        achievements: Vec<Achievement>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::WorkoutComplete { view, .. } = &mut self.state else {
            return Err(self.rejected("achievements_checked"));
        };
        if *view != CompletionView::CheckingAchievements {
            return Err(SessionError::InvalidTransition {
                state: view.as_str(),
                input: "achievements_checked",
            });
        }
        if achievements.is_empty() {
            return Ok(self.present_summary());
        }
        info!(count = achievements.len(), "achievements earned");
        *view = CompletionView::Achievements {
            queue: AchievementQueue::new(achievements),
        };
        Ok(Vec::new())
    }

    fn dismiss_achievement(
        &mut self,
        name: &'static str,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let SessionState::WorkoutComplete {
            view: CompletionView::Achievements { queue },
            ..
        } = &mut self.state
        else {
            return Err(self.rejected(name));
        };
        if queue.dismiss() {
            return Ok(Vec::new());
        }
        Ok(self.present_summary())
    }

    fn present_summary(&mut self) -> Vec<SessionEffect> {
        if let SessionState::WorkoutComplete { view, .. } = &mut self.state {
            *view = CompletionView::Summary;
        }
        if self.summary_presented {
            return Vec::new();
        }
        self.summary_presented = true;
        vec![SessionEffect::PresentSummary]
    }

    /// Serializable view of the current state
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot {
            state: self.state.kind(),
            workout_name: self.workout.name.clone(),
            exercise_index: self.state.exercise_index(),
            current_set: self.current_set,
            current_weight: self.current_weight,
            camera: self.camera,
            completed_exercises: self
                .completed
                .iter()
                .enumerate()
                .filter_map(|(index, done)| done.then_some(index))
                .collect(),
            stage: None,
            countdown_remaining: None,
            rest_time_left: None,
            execution: None,
            settings: self.state.settings().copied(),
            final_weight: None,
            progress: self.progress.clone(),
            completion: None,
            total_volume: None,
        };
        match &self.state {
            SessionState::Stages { selector, .. } => snapshot.stage = Some(selector.current()),
            SessionState::Countdown { countdown, .. } => {
                snapshot.countdown_remaining = Some(countdown.remaining());
            }
            SessionState::Resting { rest, .. } => snapshot.rest_time_left = Some(rest.remaining()),
            SessionState::Exercising { timer, .. } => snapshot.execution = Some(*timer.state()),
            SessionState::ExerciseComplete { final_weight, .. } => {
                snapshot.final_weight = Some(*final_weight);
            }
            SessionState::WorkoutComplete { record, view } => {
                snapshot.completion = Some(view.clone());
                snapshot.total_volume = Some(record.total_volume);
            }
            SessionState::Overview => {}
        }
        snapshot
    }

    fn next_epoch(&mut self, effects: &mut Vec<SessionEffect>) -> u64 {
        self.epoch += 1;
        effects.push(SessionEffect::CancelTimers);
        self.epoch
    }

    fn is_stale(&self, epoch: u64, input: &'static str) -> bool {
        if epoch == self.epoch {
            return false;
        }
        debug!(epoch, current = self.epoch, input, "stale timer tick ignored");
        true
    }

    fn rejected(&self, input: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state.kind().as_str(),
            input,
        }
    }

    fn target_reps(&self, exercise_index: usize) -> u32 {
        self.workout
            .exercise(exercise_index)
            .map_or(self.config.default_target_reps, |exercise: &Exercise| {
                exercise.target_reps_or(self.config.default_target_reps)
            })
    }

    fn rest_seconds(&self, exercise_index: usize) -> u32 {
        let default = self.config.timing.default_rest_seconds;
        self.workout
            .exercise(exercise_index)
            .map_or(default, |exercise| exercise.rest_seconds_or(default))
    }
}

#[derive(Debug, Clone, Copy)]
enum MediaKind {
    Video,
    Photo,
}

fn cue_effect(signal: ExecutionSignal) -> Option<SessionEffect> {
    match signal {
        ExecutionSignal::Cue(cue) => Some(SessionEffect::PlayCue(cue)),
        _ => None,
    }
}
