//! Error types for recording operations.

use std::path::PathBuf;

use super::encoder::EncoderError;
use crate::camera::{CameraId, FrameGeometry};

/// Errors that can occur while recording.
///
/// Everything except `NoCamerasConfigured`, `AlreadyRecording` and
/// `DirectoryUnavailable` concerns a single stream; the other streams of the
/// session keep recording.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("No cameras configured for recording")]
    NoCamerasConfigured,

    #[error("A recording session is already active")]
    AlreadyRecording,

    #[error("Failed to create output directory '{}': {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open encoder for camera {id} at '{}': {source}", .path.display())]
    EncoderOpen {
        id: CameraId,
        path: PathBuf,
        source: EncoderError,
    },

    #[error("Camera {id} frame rejected: geometry {actual} does not match stream geometry {expected}")]
    GeometryMismatch {
        id: CameraId,
        expected: FrameGeometry,
        actual: FrameGeometry,
    },

    #[error("Camera {id} frame rejected: expected {expected} bytes, got {actual}")]
    MalformedFrame {
        id: CameraId,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to write frame for camera {id}: {source}")]
    WriteFailed { id: CameraId, source: EncoderError },

    #[error("Failed to close stream for camera {id}: {source}")]
    CloseFailed { id: CameraId, source: EncoderError },
}

impl RecorderError {
    /// Camera the error is scoped to, if any.
    pub fn camera_id(&self) -> Option<CameraId> {
        match self {
            RecorderError::NoCamerasConfigured
            | RecorderError::AlreadyRecording
            | RecorderError::DirectoryUnavailable { .. } => None,
            RecorderError::EncoderOpen { id, .. }
            | RecorderError::GeometryMismatch { id, .. }
            | RecorderError::MalformedFrame { id, .. }
            | RecorderError::WriteFailed { id, .. }
            | RecorderError::CloseFailed { id, .. } => Some(*id),
        }
    }
}
