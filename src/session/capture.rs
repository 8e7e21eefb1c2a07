// ABOUTME: Camera and recording lifecycle plus media uploads for the active exercise
// ABOUTME: Acquisition and segment encoding run off the event loop; CameraSession stops every track when dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::state::SessionInput;
use crate::constants::storage;
use crate::errors::{AppError, AppResult};
use crate::external::{
    CameraConstraints, CameraDevice, CameraStream, FileStorage, MediaUpload, RecordedSegment,
};
use bytes::Bytes;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A live camera stream, released when dropped
pub struct CameraSession {
    stream: Box<dyn CameraStream>,
    recording_for: Option<usize>,
}

impl CameraSession {
    /// Open the front camera without audio
    ///
    /// # Errors
    ///
    /// Returns an error if permission is denied or no camera is available
    pub async fn acquire(camera: &dyn CameraDevice) -> AppResult<Self> {
        let stream = camera.acquire(CameraConstraints::default()).await?;
        Ok(Self {
            stream,
            recording_for: None,
        })
    }

    /// Exercise index being recorded, if any
    #[must_use]
    pub const fn recording_for(&self) -> Option<usize> {
        self.recording_for
    }

    /// Begin a segment attributed to `exercise_index`
    ///
    /// # Errors
    ///
    /// Returns an error if the stream refuses to record
    pub fn start_recording(&mut self, exercise_index: usize) -> AppResult<()> {
        if self.stream.is_recording() {
            return Err(AppError::invalid_input("a recording is already in progress"));
        }
        self.stream.start_recording()?;
        self.recording_for = Some(exercise_index);
        Ok(())
    }

    /// Stop the segment. Returns `None` when nothing was being recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream refuses to stop
    pub fn stop_recording(&mut self) -> AppResult<Option<(usize, RecordedSegment)>> {
        let Some(exercise_index) = self.recording_for.take() else {
            return Ok(None);
        };
        if !self.stream.is_recording() {
            return Ok(None);
        }
        let segment = self.stream.stop_recording()?;
        Ok(Some((exercise_index, segment)))
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if self.stream.is_recording() {
            debug!(exercise_index = ?self.recording_for, "discarding unfinished recording");
        }
        self.stream.stop_tracks();
    }
}

/// At most one in-flight upload per exercise index
///
/// Tracking a new upload for an index aborts the previous one, so the most
/// recent segment is the one that lands.
#[derive(Debug, Default)]
pub struct UploadTracker {
    in_flight: HashMap<usize, JoinHandle<()>>,
}

impl UploadTracker {
    /// Track `task` as the upload for `exercise_index`
    pub fn track(&mut self, exercise_index: usize, task: JoinHandle<()>) {
        if let Some(previous) = self.in_flight.insert(exercise_index, task) {
            if !previous.is_finished() {
                debug!(exercise_index, "superseding in-flight upload");
                previous.abort();
            }
        }
    }

    /// Abort the upload for `exercise_index`
    pub fn abort(&mut self, exercise_index: usize) {
        if let Some(task) = self.in_flight.remove(&exercise_index) {
            task.abort();
        }
    }

    /// Uploads still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight
            .values()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Abort every upload
    pub fn abort_all(&mut self) {
        for (_, task) in self.in_flight.drain() {
            task.abort();
        }
    }
}

impl Drop for UploadTracker {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// An acquisition running in the background
///
/// Dropping it drops the receiver, so a stream that arrives afterwards is
/// released by the acquiring task.
struct PendingCamera {
    attempt: u64,
    session: oneshot::Receiver<CameraSession>,
}

/// Camera, recording and media uploads for one session
pub struct CaptureCoordinator {
    camera: Arc<dyn CameraDevice>,
    storage: Arc<dyn FileStorage>,
    session_key: Uuid,
    active: Option<CameraSession>,
    pending: Option<PendingCamera>,
    videos: UploadTracker,
    photos: UploadTracker,
}

impl CaptureCoordinator {
    /// Coordinator with no camera acquired yet
    #[must_use]
    pub fn new(camera: Arc<dyn CameraDevice>, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            camera,
            storage,
            session_key: Uuid::new_v4(),
            active: None,
            pending: None,
            videos: UploadTracker::default(),
            photos: UploadTracker::default(),
        }
    }

    /// Whether a camera stream is held
    #[must_use]
    pub const fn has_camera(&self) -> bool {
        self.active.is_some()
    }

    /// Whether an acquisition is waiting on the device
    #[must_use]
    pub const fn is_acquiring(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a segment is being recorded
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| session.recording_for().is_some())
    }

    /// Uploads still running
    #[must_use]
    pub fn pending_uploads(&self) -> usize {
        self.videos.pending() + self.photos.pending()
    }

    /// Start acquiring the camera in the background
    ///
    /// The outcome arrives as [`SessionInput::CameraAcquired`] and the stream
    /// is installed by [`Self::finish_acquire`]. When the camera is already
    /// held the successful outcome is returned directly.
    pub fn begin_acquire(
        &mut self,
        attempt: u64,
        events: mpsc::Sender<SessionInput>,
    ) -> Option<SessionInput> {
        if self.active.is_some() {
            return Some(SessionInput::CameraAcquired {
                attempt,
                result: Ok(()),
            });
        }
        let (tx, rx) = oneshot::channel();
        let camera = Arc::clone(&self.camera);
        tokio::spawn(async move {
            let result = match CameraSession::acquire(camera.as_ref()).await {
                Ok(session) => {
                    if tx.send(session).is_err() {
                        debug!(attempt, "camera arrived after release, stopping it");
                        return;
                    }
                    Ok(())
                }
                Err(e) => {
                    warn!(attempt, error = %e, "camera acquisition failed");
                    Err(e.message)
                }
            };
            if events
                .send(SessionInput::CameraAcquired { attempt, result })
                .await
                .is_err()
            {
                debug!(attempt, "session ended before the camera result was delivered");
            }
        });
        self.pending = Some(PendingCamera {
            attempt,
            session: rx,
        });
        debug!(attempt, "camera acquisition started");
        None
    }

    /// Install the stream delivered for `attempt`
    ///
    /// Returns `false` when the attempt was superseded or released, or when
    /// acquisition failed.
    pub fn finish_acquire(&mut self, attempt: u64) -> bool {
        if !self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.attempt == attempt)
        {
            return false;
        }
        let Some(mut pending) = self.pending.take() else {
            return false;
        };
        match pending.session.try_recv() {
            Ok(session) => {
                self.active = Some(session);
                info!(attempt, "camera acquired");
                true
            }
            Err(_) => false,
        }
    }

    /// Stop all tracks and abandon any pending acquisition; an unfinished
    /// recording is discarded
    pub fn release(&mut self) {
        if self.pending.take().is_some() {
            debug!("pending camera acquisition abandoned");
        }
        if self.active.take().is_some() {
            info!("camera released");
        }
    }

    /// Begin recording for `exercise_index`
    ///
    /// # Errors
    ///
    /// Returns an error if no camera is held or the stream refuses to record
    pub fn start_recording(&mut self, exercise_index: usize) -> AppResult<()> {
        let session = self
            .active
            .as_mut()
            .ok_or_else(|| AppError::unavailable("camera not acquired"))?;
        session.start_recording(exercise_index)?;
        debug!(exercise_index, "recording started");
        Ok(())
    }

    /// Stop recording, then encode and upload the segment in the background
    ///
    /// The upload result is sent back as [`SessionInput::VideoUploaded`];
    /// encoding or upload failures are logged and leave the video unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream refuses to stop
    pub fn stop_and_upload(
        &mut self,
        set_number: u32,
        events: mpsc::Sender<SessionInput>,
    ) -> AppResult<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };
        let Some((exercise_index, segment)) = session.stop_recording()? else {
            return Ok(());
        };

        let key = format!(
            "{}/{}/exercise-{exercise_index}-set-{set_number}.webm",
            storage::VIDEO_PREFIX,
            self.session_key
        );
        let upload = PendingUpload {
            key,
            content_type: storage::VIDEO_CONTENT_TYPE,
        };
        let task = spawn_upload(
            Arc::clone(&self.storage),
            upload,
            segment,
            events,
            move |url| SessionInput::VideoUploaded {
                exercise_index,
                url,
            },
        );
        self.videos.track(exercise_index, task);
        Ok(())
    }

    /// Upload a photo for `exercise_index` in the background
    pub fn upload_photo(
        &mut self,
        exercise_index: usize,
        data: Bytes,
        events: mpsc::Sender<SessionInput>,
    ) {
        let upload = PendingUpload {
            key: format!(
                "{}/{}/exercise-{exercise_index}.jpg",
                storage::PHOTO_PREFIX,
                self.session_key
            ),
            content_type: storage::PHOTO_CONTENT_TYPE,
        };
        let encoded = async move { Ok(data) };
        let task = spawn_upload(
            Arc::clone(&self.storage),
            upload,
            encoded,
            events,
            move |url| SessionInput::PhotoUploaded {
                exercise_index,
                url,
            },
        );
        self.photos.track(exercise_index, task);
    }

    /// Drop pending media for an exercise whose progress was discarded
    pub fn discard(&mut self, exercise_index: usize) {
        self.videos.abort(exercise_index);
        self.photos.abort(exercise_index);
    }
}

struct PendingUpload {
    key: String,
    content_type: &'static str,
}

fn spawn_upload<D, F>(
    storage: Arc<dyn FileStorage>,
    upload: PendingUpload,
    data: D,
    events: mpsc::Sender<SessionInput>,
    on_success: F,
) -> JoinHandle<()>
where
    D: Future<Output = AppResult<Bytes>> + Send + 'static,
    F: FnOnce(String) -> SessionInput + Send + 'static,
{
    tokio::spawn(async move {
        let PendingUpload { key, content_type } = upload;
        let data = match data.await {
            Ok(data) => data,
            Err(e) => {
                warn!(%key, error = %e, "media could not be encoded");
                return;
            }
        };
        let upload = MediaUpload {
            key: key.clone(),
            content_type,
            data,
        };
        match storage.upload(upload).await {
            Ok(url) => {
                debug!(%key, %url, "media uploaded");
                if events.send(on_success(url)).await.is_err() {
                    debug!(%key, "session ended before upload result was delivered");
                }
            }
            Err(e) => warn!(%key, error = %e, "media upload failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::memory::{InMemoryFileStorage, SimulatedCamera};
    use std::time::Duration;

    fn coordinator(
        camera: &Arc<SimulatedCamera>,
        storage: &Arc<InMemoryFileStorage>,
    ) -> CaptureCoordinator {
        CaptureCoordinator::new(camera.clone(), storage.clone())
    }

    async fn acquire(capture: &mut CaptureCoordinator) -> bool {
        let (tx, mut rx) = mpsc::channel(4);
        if capture.begin_acquire(1, tx).is_some() {
            return true;
        }
        match rx.recv().await {
            Some(SessionInput::CameraAcquired { attempt, result }) => {
                result.is_ok() && capture.finish_acquire(attempt)
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_release_stops_tracks() {
        let camera = Arc::new(SimulatedCamera::new());
        let storage = Arc::new(InMemoryFileStorage::new());
        let mut capture = coordinator(&camera, &storage);

        assert!(acquire(&mut capture).await);
        assert!(acquire(&mut capture).await);
        assert_eq!(camera.acquisitions(), 1);
        assert_eq!(camera.live_streams(), 1);

        capture.start_recording(0).unwrap();
        capture.release();
        assert_eq!(camera.live_streams(), 0);
        assert!(!capture.is_recording());
    }

    #[tokio::test]
    async fn test_drop_releases_camera() {
        let camera = Arc::new(SimulatedCamera::new());
        let storage = Arc::new(InMemoryFileStorage::new());
        {
            let mut capture = coordinator(&camera, &storage);
            assert!(acquire(&mut capture).await);
            capture.start_recording(1).unwrap();
        }
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_denied_camera_reports_error() {
        let camera = Arc::new(SimulatedCamera::denied());
        let storage = Arc::new(InMemoryFileStorage::new());
        let mut capture = coordinator(&camera, &storage);
        assert!(!acquire(&mut capture).await);
        assert!(!capture.has_camera());
        assert!(capture.start_recording(0).is_err());
    }

    #[tokio::test]
    async fn test_stop_uploads_to_active_index() {
        let camera = Arc::new(SimulatedCamera::new());
        let storage = Arc::new(InMemoryFileStorage::new());
        let mut capture = coordinator(&camera, &storage);
        let (tx, mut rx) = mpsc::channel(4);

        assert!(acquire(&mut capture).await);
        capture.start_recording(2).unwrap();
        capture.stop_and_upload(1, tx).unwrap();

        match rx.recv().await {
            Some(SessionInput::VideoUploaded {
                exercise_index,
                url,
            }) => {
                assert_eq!(exercise_index, 2);
                assert!(url.starts_with("memory://workout-videos/"));
                assert!(url.ends_with("exercise-2-set-1.webm"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_upload_supersedes_older() {
        let camera = Arc::new(SimulatedCamera::new());
        let storage = Arc::new(InMemoryFileStorage::with_latency(Duration::from_secs(5)));
        let mut capture = coordinator(&camera, &storage);
        let (tx, mut rx) = mpsc::channel(4);

        assert!(acquire(&mut capture).await);
        capture.start_recording(0).unwrap();
        capture.stop_and_upload(1, tx.clone()).unwrap();
        capture.start_recording(0).unwrap();
        capture.stop_and_upload(2, tx).unwrap();

        let Some(SessionInput::VideoUploaded { url, .. }) = rx.recv().await else {
            panic!("expected an upload result");
        };
        assert!(url.ends_with("set-2.webm"));
        assert_eq!(storage.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_stop_without_recording_is_noop() {
        let camera = Arc::new(SimulatedCamera::new());
        let storage = Arc::new(InMemoryFileStorage::new());
        let mut capture = coordinator(&camera, &storage);
        let (tx, _rx) = mpsc::channel(4);
        capture.stop_and_upload(1, tx.clone()).unwrap();
        assert!(acquire(&mut capture).await);
        capture.stop_and_upload(1, tx).unwrap();
        assert_eq!(capture.pending_uploads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_while_acquiring_stops_late_stream() {
        let camera = Arc::new(SimulatedCamera::with_prompt_delay(Duration::from_secs(60)));
        let storage = Arc::new(InMemoryFileStorage::new());
        let mut capture = coordinator(&camera, &storage);
        let (tx, mut rx) = mpsc::channel(4);

        assert!(capture.begin_acquire(1, tx).is_none());
        assert!(capture.is_acquiring());
        capture.release();
        assert!(!capture.is_acquiring());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(camera.acquisitions(), 1);
        assert_eq!(camera.live_streams(), 0);
        assert!(rx.recv().await.is_none());
        assert!(!capture.finish_acquire(1));
        assert!(!capture.has_camera());
    }

    #[tokio::test]
    async fn test_superseded_attempt_is_not_installed() {
        let camera = Arc::new(SimulatedCamera::new());
        let storage = Arc::new(InMemoryFileStorage::new());
        let mut capture = coordinator(&camera, &storage);
        let (tx, mut rx) = mpsc::channel(4);

        capture.begin_acquire(1, tx.clone());
        capture.begin_acquire(2, tx);
        let mut installed = Vec::new();
        while let Some(SessionInput::CameraAcquired { attempt, .. }) = rx.recv().await {
            if capture.finish_acquire(attempt) {
                installed.push(attempt);
            }
        }
        assert_eq!(installed, vec![2]);
        assert_eq!(camera.live_streams(), 1);
    }
}
