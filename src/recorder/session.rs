//! Recording sessions spanning every tracked camera.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::encoder::{EncoderFactory, FfmpegEncoderFactory};
use super::error::RecorderError;
use super::format::VideoFormat;
use super::stream::{FrameOutcome, StreamHandle, StreamInfo};
use crate::camera::{CameraId, Frame};

struct RecordingSession {
    output_dir: PathBuf,
    fps: f64,
    format: VideoFormat,
    streams: BTreeMap<CameraId, StreamHandle>,
}

/// Result of closing a session.
#[derive(Debug)]
pub struct RecordingSummary {
    pub output_dir: PathBuf,
    pub streams: Vec<StreamInfo>,
    /// Streams whose encoder failed to close cleanly
    pub errors: Vec<RecorderError>,
}

/// Turns per-camera frame sequences into one video file per camera.
///
/// The recorder tracks a set of camera ids. Starting a session freezes that
/// set: one stream per id, each opened lazily when its first frame arrives
/// since only then is the geometry known. Reconfiguring while a session is
/// open only affects the next session.
pub struct StreamRecorder {
    tracked: BTreeSet<CameraId>,
    session: Option<RecordingSession>,
    encoders: Box<dyn EncoderFactory>,
}

impl std::fmt::Debug for StreamRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRecorder")
            .field("tracked", &self.tracked)
            .field("is_recording", &self.is_recording())
            .finish_non_exhaustive()
    }
}

impl Default for StreamRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRecorder {
    /// Recorder writing through ffmpeg.
    pub fn new() -> Self {
        Self::with_encoder_factory(Box::new(FfmpegEncoderFactory))
    }

    pub fn with_encoder_factory(encoders: Box<dyn EncoderFactory>) -> Self {
        Self {
            tracked: BTreeSet::new(),
            session: None,
            encoders,
        }
    }

    /// Replace the set of tracked camera ids.
    pub fn configure<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = CameraId>,
    {
        self.tracked = ids.into_iter().collect();
        if self.session.is_some() {
            log::debug!("Recorder reconfigured during a session; applies to the next one");
        }
    }

    pub fn tracked_ids(&self) -> Vec<CameraId> {
        self.tracked.iter().copied().collect()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.output_dir.as_path())
    }

    /// Open a session with one pending stream per tracked camera.
    pub fn start_recording(
        &mut self,
        output_dir: &Path,
        fps: f64,
        format: VideoFormat,
    ) -> Result<(), RecorderError> {
        if self.session.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }
        if self.tracked.is_empty() {
            return Err(RecorderError::NoCamerasConfigured);
        }

        std::fs::create_dir_all(output_dir).map_err(|source| {
            RecorderError::DirectoryUnavailable {
                path: output_dir.to_path_buf(),
                source,
            }
        })?;

        let streams = self
            .tracked
            .iter()
            .map(|&id| (id, StreamHandle::new(id, output_dir, format)))
            .collect();

        self.session = Some(RecordingSession {
            output_dir: output_dir.to_path_buf(),
            fps,
            format,
            streams,
        });

        log::debug!(
            "Recording started: {} camera(s), {} at {:.1} fps into {}",
            self.tracked.len(),
            format,
            fps,
            output_dir.display()
        );
        Ok(())
    }

    /// Feed one frame to the stream of `id`.
    pub fn on_new_frame(&mut self, id: CameraId, frame: &Frame) -> Result<FrameOutcome, RecorderError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(FrameOutcome::Ignored);
        };
        let Some(stream) = session.streams.get_mut(&id) else {
            return Ok(FrameOutcome::Ignored);
        };
        stream.push(frame, session.fps, session.format, self.encoders.as_ref())
    }

    /// Close every open encoder and end the session. Idempotent.
    pub fn stop_recording(&mut self) -> Option<RecordingSummary> {
        let session = self.session.take()?;

        let mut errors = Vec::new();
        let mut streams = Vec::with_capacity(session.streams.len());
        for (_, mut stream) in session.streams {
            if let Err(e) = stream.close() {
                log::debug!("{}", e);
                errors.push(e);
            }
            streams.push(stream.info());
        }

        log::debug!("Recording stopped ({} stream(s))", streams.len());
        Some(RecordingSummary {
            output_dir: session.output_dir,
            streams,
            errors,
        })
    }

    pub fn stream_info(&self, id: CameraId) -> Option<StreamInfo> {
        self.session
            .as_ref()
            .and_then(|s| s.streams.get(&id))
            .map(StreamHandle::info)
    }

    /// Copies of every stream in the active session, ascending id.
    pub fn streams(&self) -> Vec<StreamInfo> {
        self.session
            .as_ref()
            .map(|s| s.streams.values().map(StreamHandle::info).collect())
            .unwrap_or_default()
    }
}

impl Drop for StreamRecorder {
    fn drop(&mut self) {
        let _ = self.stop_recording();
    }
}
