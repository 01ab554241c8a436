//! Per-camera output stream state.

use std::path::{Path, PathBuf};

use super::encoder::{EncoderError, EncoderFactory, EncoderSpec, VideoEncoder};
use super::error::RecorderError;
use super::format::VideoFormat;
use crate::camera::{CameraId, Frame, FrameGeometry};

/// Lifecycle of a stream's encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// Waiting for the first frame to learn the geometry
    Uninitialized,
    Open,
    Closed,
    /// Encoder could not be opened or a write failed; frames are ignored
    Failed,
}

/// Read-only copy of a stream's state.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub camera_id: CameraId,
    pub state: EncoderState,
    pub geometry: Option<FrameGeometry>,
    pub path: PathBuf,
    pub frames_written: u64,
    pub frames_dropped: u64,
}

/// Output file name for a camera.
pub fn stream_file_name(id: CameraId, format: VideoFormat) -> String {
    format!("camera_{}.{}", id, format.extension())
}

/// What happened to a frame handed to a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Written,
    /// Not recording, unknown stream, or the stream already failed
    Ignored,
}

pub(crate) struct StreamHandle {
    camera_id: CameraId,
    state: EncoderState,
    geometry: Option<FrameGeometry>,
    path: PathBuf,
    encoder: Option<Box<dyn VideoEncoder>>,
    frames_written: u64,
    frames_dropped: u64,
}

impl StreamHandle {
    pub(crate) fn new(camera_id: CameraId, dir: &Path, format: VideoFormat) -> Self {
        Self {
            camera_id,
            state: EncoderState::Uninitialized,
            geometry: None,
            path: dir.join(stream_file_name(camera_id, format)),
            encoder: None,
            frames_written: 0,
            frames_dropped: 0,
        }
    }

    pub(crate) fn info(&self) -> StreamInfo {
        StreamInfo {
            camera_id: self.camera_id,
            state: self.state,
            geometry: self.geometry,
            path: self.path.clone(),
            frames_written: self.frames_written,
            frames_dropped: self.frames_dropped,
        }
    }

    pub(crate) fn push(
        &mut self,
        frame: &Frame,
        fps: f64,
        format: VideoFormat,
        encoders: &dyn EncoderFactory,
    ) -> Result<FrameOutcome, RecorderError> {
        if matches!(self.state, EncoderState::Closed | EncoderState::Failed) {
            return Ok(FrameOutcome::Ignored);
        }

        // only a frame that will be written may open the encoder and fix the geometry
        let actual = frame.geometry();
        if let Some(expected) = self.geometry {
            if expected != actual {
                self.frames_dropped += 1;
                return Err(RecorderError::GeometryMismatch {
                    id: self.camera_id,
                    expected,
                    actual,
                });
            }
        }

        let expected_len =
            actual.width as usize * actual.height as usize * actual.channels as usize;
        if frame.data.len() != expected_len {
            self.frames_dropped += 1;
            return Err(RecorderError::MalformedFrame {
                id: self.camera_id,
                expected: expected_len,
                actual: frame.data.len(),
            });
        }

        if self.state == EncoderState::Uninitialized {
            self.open(frame, fps, format, encoders)?;
        }

        let Some(encoder) = self.encoder.as_mut() else {
            return Ok(FrameOutcome::Ignored);
        };
        if let Err(source) = encoder.write_frame(frame) {
            self.state = EncoderState::Failed;
            // a dead ffmpeg only shows up as a broken pipe; its stderr names the cause
            let source = match self.encoder.take().map(|encoder| encoder.finish()) {
                Some(Err(exited @ EncoderError::ProcessFailed { .. })) => exited,
                Some(Err(e)) => {
                    log::debug!("Closing failed stream for camera {}: {}", self.camera_id, e);
                    source
                }
                _ => source,
            };
            return Err(RecorderError::WriteFailed {
                id: self.camera_id,
                source,
            });
        }
        self.frames_written += 1;
        Ok(FrameOutcome::Written)
    }

    fn open(
        &mut self,
        frame: &Frame,
        fps: f64,
        format: VideoFormat,
        encoders: &dyn EncoderFactory,
    ) -> Result<(), RecorderError> {
        let spec = EncoderSpec {
            path: self.path.clone(),
            geometry: frame.geometry(),
            pixel_format: frame.format,
            fps,
            codec: format.codec(),
        };

        match encoders.open(&spec) {
            Ok(encoder) => {
                log::info!(
                    "Opened {} stream for camera {} at {} ({})",
                    spec.codec.display_name(),
                    self.camera_id,
                    self.path.display(),
                    spec.geometry
                );
                self.encoder = Some(encoder);
                self.geometry = Some(spec.geometry);
                self.state = EncoderState::Open;
                Ok(())
            }
            Err(source) => {
                self.state = EncoderState::Failed;
                Err(RecorderError::EncoderOpen {
                    id: self.camera_id,
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Close the encoder if one was opened.
    pub(crate) fn close(&mut self) -> Result<(), RecorderError> {
        let encoder = self.encoder.take();
        if self.state == EncoderState::Open {
            self.state = EncoderState::Closed;
        }
        match encoder {
            Some(encoder) => encoder.finish().map_err(|source| RecorderError::CloseFailed {
                id: self.camera_id,
                source,
            }),
            None => Ok(()),
        }
    }
}
