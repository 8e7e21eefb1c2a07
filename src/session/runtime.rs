// ABOUTME: Tokio event loop that feeds user commands and timer/upload events into the controller
// ABOUTME: Executes the returned effects against collaborators and publishes snapshots over a watch channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session runtime
//!
//! The runtime is the only place where the session touches the outside
//! world. It owns the camera, the timer tasks and the background uploads.
//! Nothing that waits on a device or a collaborator runs on the loop itself:
//! camera prompts, segment encoding, uploads and log writes are spawned and
//! report back as [`SessionInput`]s, so commands such as cancel are handled
//! while they are in flight.
//! Dropping the runtime aborts every timer and upload and releases the camera.

use super::capture::CaptureCoordinator;
use super::controller::SessionController;
use super::countdown::TimerHandle;
use super::history::ExerciseHistory;
use super::state::{SessionCommand, SessionEffect, SessionInput, SessionSnapshot};
use crate::config::SessionConfig;
use crate::errors::{AppError, AppResult};
use crate::external::SessionServices;
use crate::models::{SessionUser, WorkoutLogRecord};
use crate::notifications::NotificationKind;
use std::collections::VecDeque;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Drives one [`SessionController`] against real collaborators
pub struct SessionRuntime {
    controller: SessionController,
    services: SessionServices,
    capture: CaptureCoordinator,
    timers: Vec<TimerHandle>,
    background: JoinSet<()>,
    events_tx: mpsc::Sender<SessionInput>,
    events_rx: mpsc::Receiver<SessionInput>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionRuntime {
    /// Load the workout and recent history, then open the session in the overview
    ///
    /// A failed history lookup only disables weight suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the workout cannot
    /// be loaded, or the workout is malformed
    pub async fn start(
        user: SessionUser,
        workout_name: &str,
        services: SessionServices,
        config: SessionConfig,
    ) -> AppResult<Self> {
        config.validate()?;
        let workout = services.schedule.workout(&user, workout_name).await?;
        workout.validate()?;

        let logs = match services
            .history
            .recent_logs(&user, config.history_limit)
            .await
        {
            Ok(logs) => logs,
            Err(e) => {
                warn!(error = %e, "previous logs unavailable, weight suggestions disabled");
                Vec::new()
            }
        };

        info!(
            workout = %workout.name,
            exercises = workout.exercises.len(),
            previous_logs = logs.len(),
            "workout session started"
        );
        let controller =
            SessionController::new(user, workout, ExerciseHistory::new(logs), config)?;
        Ok(Self::with_controller(controller, services))
    }

    /// Runtime around an existing controller, using its timing configuration
    #[must_use]
    pub fn with_controller(controller: SessionController, services: SessionServices) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshots, _) = watch::channel(controller.snapshot());
        let capture = CaptureCoordinator::new(
            services.camera.clone(),
            services.storage.clone(),
        );
        Self {
            controller,
            services,
            capture,
            timers: Vec::new(),
            background: JoinSet::new(),
            events_tx,
            events_rx,
            snapshots,
        }
    }

    /// Receive a snapshot after every processed input
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// The controller being driven
    #[must_use]
    pub const fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Number of timer tasks currently owned
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers.iter().filter(|timer| !timer.is_finished()).count()
    }

    /// Whether the camera is held
    #[must_use]
    pub const fn has_camera(&self) -> bool {
        self.capture.has_camera()
    }

    /// Apply a user command and run its effects
    ///
    /// # Errors
    ///
    /// Returns an error if the command is not valid in the current state
    #[allow(clippy::unused_async)]
    pub async fn dispatch(&mut self, command: SessionCommand) -> AppResult<()> {
        self.process(SessionInput::Command(command))
    }

    /// Wait for the next timer, upload or persistence event and process it
    ///
    /// # Errors
    ///
    /// Returns an error if the event channel is closed
    pub async fn pump(&mut self) -> AppResult<()> {
        let event = self
            .events_rx
            .recv()
            .await
            .ok_or_else(|| AppError::internal("session event channel closed"))?;
        self.handle_event(event);
        Ok(())
    }

    /// Process internal events until `done` holds for the current snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the event channel is closed
    pub async fn advance_until<F>(&mut self, done: F) -> AppResult<()>
    where
        F: Fn(&SessionSnapshot) -> bool,
    {
        while !done(&self.controller.snapshot()) {
            self.pump().await?;
        }
        Ok(())
    }

    /// Run until the summary is shown or the command channel closes
    ///
    /// Rejected commands are reported to the user and do not end the session.
    /// The record is returned only once it was saved and the summary shown;
    /// a session abandoned earlier, including while the log is saving or
    /// after a failed save, yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal event channel closes unexpectedly
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> AppResult<Option<WorkoutLogRecord>> {
        while !self.controller.summary_presented() {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        info!("command channel closed, ending session");
                        break;
                    };
                    let name = command.as_str();
                    if let Err(e) = self.dispatch(command).await {
                        warn!(command = name, error = %e, "command rejected");
                        self.services
                            .notifier
                            .notify(&e.message, NotificationKind::Warning);
                    }
                }
                event = self.events_rx.recv() => {
                    let event = event
                        .ok_or_else(|| AppError::internal("session event channel closed"))?;
                    self.handle_event(event);
                }
            }
        }
        if !self.controller.summary_presented() {
            if let Some(record) = self.controller.record() {
                warn!(log_id = %record.log_id, "session ended before the workout log was saved");
            }
            return Ok(None);
        }
        Ok(self.controller.record().cloned())
    }

    fn handle_event(&mut self, event: SessionInput) {
        let name = event.as_str();
        if let Err(e) = self.process(event) {
            warn!(input = name, error = %e, "session event rejected");
        }
    }

    fn process(&mut self, input: SessionInput) -> AppResult<()> {
        self.install_camera(&input);
        let effects = self.controller.apply(input).map_err(AppError::from)?;
        let mut follow_ups = VecDeque::new();
        self.execute_all(effects, &mut follow_ups);

        while let Some(next) = follow_ups.pop_front() {
            self.install_camera(&next);
            let name = next.as_str();
            match self.controller.apply(next) {
                Ok(effects) => self.execute_all(effects, &mut follow_ups),
                Err(e) => warn!(input = name, error = %e, "follow-up input rejected"),
            }
        }

        self.snapshots.send_replace(self.controller.snapshot());
        Ok(())
    }

    fn install_camera(&mut self, input: &SessionInput) {
        if let SessionInput::CameraAcquired { attempt, .. } = input {
            if !self.capture.finish_acquire(*attempt) {
                debug!(attempt, "no stream installed for camera result");
            }
        }
    }

    fn execute_all(
        &mut self,
        effects: Vec<SessionEffect>,
        follow_ups: &mut VecDeque<SessionInput>,
    ) {
        for effect in effects {
            if let Some(input) = self.execute(effect) {
                follow_ups.push_back(input);
            }
        }
    }

    fn execute(&mut self, effect: SessionEffect) -> Option<SessionInput> {
        debug!(?effect, "executing effect");
        match effect {
            SessionEffect::AcquireCamera { attempt } => {
                self.capture.begin_acquire(attempt, self.events_tx.clone())
            }
            SessionEffect::ReleaseCamera => {
                self.capture.release();
                None
            }
            SessionEffect::StartRecording { exercise_index } => {
                match self.capture.start_recording(exercise_index) {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(exercise_index, error = %e, "recording could not start");
                        self.services.notifier.notify(
                            "Recording unavailable. Continuing without recording.",
                            NotificationKind::Warning,
                        );
                        Some(SessionInput::RecordingUnavailable)
                    }
                }
            }
            SessionEffect::StopRecording {
                exercise_index,
                set_number,
            } => {
                if let Err(e) = self
                    .capture
                    .stop_and_upload(set_number, self.events_tx.clone())
                {
                    warn!(exercise_index, set_number, error = %e, "recording could not be saved");
                }
                None
            }
            SessionEffect::DiscardUploads { exercise_index } => {
                self.capture.discard(exercise_index);
                None
            }
            SessionEffect::StartClock { epoch } => {
                self.timers.push(TimerHandle::every(
                    self.controller.config().timing.clock_tick(),
                    self.events_tx.clone(),
                    SessionInput::ClockTick { epoch },
                ));
                None
            }
            SessionEffect::StartPhaseTicker { epoch } => {
                self.timers.push(TimerHandle::every(
                    self.controller.config().timing.phase_tick(),
                    self.events_tx.clone(),
                    SessionInput::PhaseTick { epoch },
                ));
                None
            }
            SessionEffect::CancelTimers => {
                self.timers.clear();
                None
            }
            SessionEffect::PlayCue(cue) => {
                self.services.cues.play(cue);
                None
            }
            SessionEffect::UploadPhoto {
                exercise_index,
                data,
            } => {
                self.capture
                    .upload_photo(exercise_index, data, self.events_tx.clone());
                None
            }
            SessionEffect::PersistLog(record) => {
                let store = self.services.log_store.clone();
                let events = self.events_tx.clone();
                self.background.spawn(async move {
                    let result = store.create(&record).await.map_err(|e| {
                        error!(log_id = %record.log_id, error = %e, "workout log save failed");
                        e.message
                    });
                    if events.send(SessionInput::LogPersisted(result)).await.is_err() {
                        debug!("session ended before the log result was delivered");
                    }
                });
                None
            }
            SessionEffect::CheckAchievements => {
                let checker = self.services.achievements.clone();
                let user = self.controller.user().clone();
                let events = self.events_tx.clone();
                self.background.spawn(async move {
                    let achievements = checker.check(&user).await.unwrap_or_else(|e| {
                        warn!(error = %e, "achievement check failed, showing summary");
                        Vec::new()
                    });
                    if events
                        .send(SessionInput::AchievementsChecked(achievements))
                        .await
                        .is_err()
                    {
                        debug!("session ended before achievements were delivered");
                    }
                });
                None
            }
            SessionEffect::Notify { message, kind } => {
                self.services.notifier.notify(&message, kind);
                None
            }
            SessionEffect::PresentSummary => {
                if let Some(record) = self.controller.record() {
                    info!(
                        log_id = %record.log_id,
                        total_volume = record.total_volume,
                        duration_minutes = record.duration_minutes,
                        "workout summary presented"
                    );
                }
                None
            }
        }
    }
}
