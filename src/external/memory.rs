// ABOUTME: In-memory collaborator implementations for the demo binary and tests
// ABOUTME: Supports failure injection for log writes, uploads, achievements and camera permission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// NOTE: `.clone()` calls in this file hand owned copies of stored records back to callers.

use super::{
    AchievementChecker, CameraConstraints, CameraDevice, CameraStream, CuePlayer, FileStorage,
    MediaUpload, RecordedSegment, ScheduleSource, SessionServices, WorkoutHistory,
    WorkoutLogStore,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Achievement, SessionUser, Workout, WorkoutLogRecord};
use crate::notifications::{NotificationKind, Notifier};
use crate::session::AudioCue;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// Workouts keyed by name
#[derive(Debug, Default)]
pub struct InMemorySchedule {
    workouts: RwLock<HashMap<String, Workout>>,
}

impl InMemorySchedule {
    /// Empty schedule
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule containing a single workout
    #[must_use]
    pub fn with_workout(workout: Workout) -> Self {
        Self {
            workouts: RwLock::new(HashMap::from([(workout.name.clone(), workout)])),
        }
    }

    /// Add or replace a workout
    pub async fn insert(&self, workout: Workout) {
        self.workouts
            .write()
            .await
            .insert(workout.name.clone(), workout);
    }
}

#[async_trait]
impl ScheduleSource for InMemorySchedule {
    async fn workout(&self, _user: &SessionUser, workout_name: &str) -> AppResult<Workout> {
        self.workouts
            .read()
            .await
            .get(workout_name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Workout '{workout_name}'")))
    }
}

/// Workout logs kept in insertion order, serving both history reads and log writes
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    records: RwLock<Vec<WorkoutLogRecord>>,
    failures_remaining: AtomicU32,
}

impl InMemoryLogStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `records`, oldest first
    #[must_use]
    pub fn seeded(records: Vec<WorkoutLogRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            failures_remaining: AtomicU32::new(0),
        }
    }

    /// Reject the next `count` writes
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// All stored records, oldest first
    pub async fn records(&self) -> Vec<WorkoutLogRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl WorkoutLogStore for InMemoryLogStore {
    async fn create(&self, record: &WorkoutLogRecord) -> AppResult<()> {
        let rejected = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(AppError::external_service(
                "workout log store",
                "write rejected",
            ));
        }

        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.log_id == record.log_id) {
            debug!(log_id = %record.log_id, "duplicate workout log write ignored");
            return Ok(());
        }
        records.push(record.clone());
        drop(records);
        Ok(())
    }
}

#[async_trait]
impl WorkoutHistory for InMemoryLogStore {
    async fn recent_logs(
        &self,
        user: &SessionUser,
        limit: usize,
    ) -> AppResult<Vec<WorkoutLogRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .filter(|record| record.user_email == user.email)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Object store returning `memory://` URLs
#[derive(Debug, Default)]
pub struct InMemoryFileStorage {
    objects: RwLock<HashMap<String, Bytes>>,
    failing: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryFileStorage {
    /// Storage that completes uploads immediately
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that takes `latency` to complete each upload
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make every upload fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored objects
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Stored object for `key`
    pub async fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn upload(&self, upload: MediaUpload) -> AppResult<String> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("upload of '{}' failed", upload.key)));
        }
        let url = format!("memory://{}", upload.key);
        self.objects.write().await.insert(upload.key, upload.data);
        Ok(url)
    }
}

/// Achievement checker returning a configurable list
#[derive(Debug, Default)]
pub struct StaticAchievements {
    achievements: Mutex<Vec<Achievement>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StaticAchievements {
    /// Checker that reports `achievements` on every call
    #[must_use]
    pub fn new(achievements: Vec<Achievement>) -> Self {
        Self {
            achievements: Mutex::new(achievements),
            ..Self::default()
        }
    }

    /// Replace the reported achievements
    pub fn set_achievements(&self, achievements: Vec<Achievement>) {
        *self
            .achievements
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = achievements;
    }

    /// Make every check fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of checks performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AchievementChecker for StaticAchievements {
    async fn check(&self, _user: &SessionUser) -> AppResult<Vec<Achievement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service(
                "achievement check",
                "service unavailable",
            ));
        }
        Ok(self
            .achievements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Camera that hands out simulated streams and counts the live ones
#[derive(Debug)]
pub struct SimulatedCamera {
    permission_granted: AtomicBool,
    prompt_delay: Duration,
    live_streams: Arc<AtomicUsize>,
    acquisitions: AtomicUsize,
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self {
            permission_granted: AtomicBool::new(true),
            prompt_delay: Duration::ZERO,
            live_streams: Arc::new(AtomicUsize::new(0)),
            acquisitions: AtomicUsize::new(0),
        }
    }
}

impl SimulatedCamera {
    /// Camera with permission granted
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera whose permission prompt is denied
    #[must_use]
    pub fn denied() -> Self {
        let camera = Self::default();
        camera.permission_granted.store(false, Ordering::SeqCst);
        camera
    }

    /// Camera whose permission prompt takes `delay` to be answered
    #[must_use]
    pub fn with_prompt_delay(delay: Duration) -> Self {
        Self {
            prompt_delay: delay,
            ..Self::default()
        }
    }

    /// Streams acquired and not yet stopped
    pub fn live_streams(&self) -> usize {
        self.live_streams.load(Ordering::SeqCst)
    }

    /// Successful acquisitions so far
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraDevice for SimulatedCamera {
    async fn acquire(&self, constraints: CameraConstraints) -> AppResult<Box<dyn CameraStream>> {
        if !self.prompt_delay.is_zero() {
            tokio::time::sleep(self.prompt_delay).await;
        }
        if !self.permission_granted.load(Ordering::SeqCst) {
            return Err(AppError::permission_denied("camera permission denied"));
        }
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.live_streams.fetch_add(1, Ordering::SeqCst);
        trace!(?constraints, "simulated camera acquired");
        Ok(Box::new(SimulatedStream {
            live_streams: Arc::clone(&self.live_streams),
            recording: false,
            stopped: false,
            segments: 0,
        }))
    }
}

struct SimulatedStream {
    live_streams: Arc<AtomicUsize>,
    recording: bool,
    stopped: bool,
    segments: u32,
}

impl CameraStream for SimulatedStream {
    fn start_recording(&mut self) -> AppResult<()> {
        if self.stopped {
            return Err(AppError::unavailable("camera stream already stopped"));
        }
        self.recording = true;
        Ok(())
    }

    fn stop_recording(&mut self) -> AppResult<RecordedSegment> {
        if !self.recording {
            return Err(AppError::invalid_input("no recording in progress"));
        }
        self.recording = false;
        self.segments += 1;
        let data = Bytes::from(format!("segment-{}", self.segments));
        Ok(Box::pin(async move { Ok(data) }))
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn stop_tracks(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.recording = false;
            self.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Cue player that remembers every cue
#[derive(Debug, Default)]
pub struct RecordingCuePlayer {
    cues: Mutex<Vec<AudioCue>>,
}

impl RecordingCuePlayer {
    /// Empty player
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far
    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CuePlayer for RecordingCuePlayer {
    fn play(&self, cue: AudioCue) {
        trace!(?cue, hz = cue.frequency_hz(), "cue");
        self.cues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(cue);
    }
}

/// Notifier that remembers every notification
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<(String, NotificationKind)>>,
}

impl CollectingNotifier {
    /// Empty notifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications shown so far
    pub fn messages(&self) -> Vec<(String, NotificationKind)> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notifications of the given kind
    pub fn of_kind(&self, kind: NotificationKind) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, k)| *k == kind)
            .map(|(message, _)| message)
            .collect()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_owned(), kind));
    }
}

/// Concrete in-memory collaborators, kept typed so callers can inspect them
#[derive(Clone)]
pub struct InMemoryServices {
    /// Workout schedule
    pub schedule: Arc<InMemorySchedule>,
    /// Log store doubling as history
    pub logs: Arc<InMemoryLogStore>,
    /// Media storage
    pub storage: Arc<InMemoryFileStorage>,
    /// Achievement checker
    pub achievements: Arc<StaticAchievements>,
    /// Camera
    pub camera: Arc<SimulatedCamera>,
    /// Cue player
    pub cues: Arc<RecordingCuePlayer>,
    /// Notifier
    pub notifier: Arc<CollectingNotifier>,
}

impl InMemoryServices {
    /// Collaborators serving a single workout
    #[must_use]
    pub fn new(workout: Workout) -> Self {
        Self {
            schedule: Arc::new(InMemorySchedule::with_workout(workout)),
            logs: Arc::new(InMemoryLogStore::new()),
            storage: Arc::new(InMemoryFileStorage::new()),
            achievements: Arc::new(StaticAchievements::default()),
            camera: Arc::new(SimulatedCamera::new()),
            cues: Arc::new(RecordingCuePlayer::new()),
            notifier: Arc::new(CollectingNotifier::new()),
        }
    }

    /// Trait-object view handed to the session runtime
    #[must_use]
    pub fn services(&self) -> SessionServices {
        SessionServices {
            schedule: self.schedule.clone(),
            history: self.logs.clone(),
            log_store: self.logs.clone(),
            storage: self.storage.clone(),
            achievements: self.achievements.clone(),
            camera: self.camera.clone(),
            cues: self.cues.clone(),
            notifier: self.notifier.clone(),
        }
    }
}
