// ABOUTME: Collaborator contracts consumed by the workout session engine
// ABOUTME: Schedule, history, file storage, log store, achievements, camera and audio cue traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External collaborators
//!
//! The session engine owns no storage, network or device code. Everything it
//! needs from the outside world goes through the async traits in this module;
//! [`memory`] holds in-process implementations used by the demo binary and tests.

/// In-memory collaborator implementations with failure injection
pub mod memory;

use crate::errors::AppResult;
use crate::models::{Achievement, SessionUser, Workout, WorkoutLogRecord};
use crate::notifications::Notifier;
use crate::session::AudioCue;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Looks up the workout scheduled for a user
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Workout named `workout_name` for `user`
    async fn workout(&self, user: &SessionUser, workout_name: &str) -> AppResult<Workout>;
}

/// Read access to previously saved workout logs
#[async_trait]
pub trait WorkoutHistory: Send + Sync {
    /// Up to `limit` logs for `user`, newest first
    async fn recent_logs(
        &self,
        user: &SessionUser,
        limit: usize,
    ) -> AppResult<Vec<WorkoutLogRecord>>;
}

/// Durable creation of workout logs
#[async_trait]
pub trait WorkoutLogStore: Send + Sync {
    /// Create exactly one record; a repeated `log_id` must not create a second one
    async fn create(&self, record: &WorkoutLogRecord) -> AppResult<()>;
}

/// A binary object to upload
#[derive(Clone)]
pub struct MediaUpload {
    /// Object key, unique per session and exercise
    pub key: String,
    /// MIME type of `data`
    pub content_type: &'static str,
    /// Object contents
    pub data: Bytes,
}

impl fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaUpload")
            .field("key", &self.key)
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Blob storage returning durable URLs
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store the upload and return its URL
    async fn upload(&self, upload: MediaUpload) -> AppResult<String>;
}

/// Checks for achievements earned by the user's latest activity
#[async_trait]
pub trait AchievementChecker: Send + Sync {
    /// Achievements earned since the last check
    async fn check(&self, user: &SessionUser) -> AppResult<Vec<Achievement>>;
}

/// Which camera to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    /// Selfie camera, used as a mirror while exercising
    Front,
    /// Rear camera
    Back,
}

/// Constraints passed when opening the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Camera to open
    pub facing: CameraFacing,
    /// Capture microphone audio
    pub audio: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Front,
            audio: false,
        }
    }
}

/// Opens camera streams
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Acquire a live stream; fails when permission is denied or no camera exists
    async fn acquire(&self, constraints: CameraConstraints) -> AppResult<Box<dyn CameraStream>>;
}

/// Encoded bytes of a stopped segment, available once the encoder flushes
pub type RecordedSegment = Pin<Box<dyn Future<Output = AppResult<Bytes>> + Send + 'static>>;

/// A live camera stream that can record segments
pub trait CameraStream: Send {
    /// Begin recording a new segment
    fn start_recording(&mut self) -> AppResult<()>;

    /// Stop the current segment; its bytes resolve independently of the stream
    fn stop_recording(&mut self) -> AppResult<RecordedSegment>;

    /// Whether a segment is being recorded
    fn is_recording(&self) -> bool;

    /// Stop every track and release the hardware; must be idempotent
    fn stop_tracks(&mut self);
}

/// Plays short tones for rep phase transitions
pub trait CuePlayer: Send + Sync {
    /// Play `cue`; failures are the player's concern and never reach the session
    fn play(&self, cue: AudioCue);
}

/// Collaborators needed to run a session
#[derive(Clone)]
pub struct SessionServices {
    /// Workout lookup
    pub schedule: Arc<dyn ScheduleSource>,
    /// Previous logs, for weight suggestions and template rotation
    pub history: Arc<dyn WorkoutHistory>,
    /// Final log persistence
    pub log_store: Arc<dyn WorkoutLogStore>,
    /// Media uploads
    pub storage: Arc<dyn FileStorage>,
    /// Achievement check after the log is saved
    pub achievements: Arc<dyn AchievementChecker>,
    /// Camera access
    pub camera: Arc<dyn CameraDevice>,
    /// Audio cues
    pub cues: Arc<dyn CuePlayer>,
    /// User notifications
    pub notifier: Arc<dyn Notifier>,
}
