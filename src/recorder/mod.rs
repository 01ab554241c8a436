//! Per-camera video recording.
//!
//! # Structure
//!
//! - [`format`] - containers and codecs
//! - [`encoder`] - encoder traits and the ffmpeg backend
//! - [`stream`] - state of one camera's output file
//! - [`session`] - the [`StreamRecorder`] owning all streams

mod encoder;
mod error;
mod format;
mod session;
mod stream;

pub use encoder::{
    ffmpeg_args, EncoderError, EncoderFactory, EncoderSpec, FfmpegEncoder, FfmpegEncoderFactory,
    VideoEncoder,
};
pub use error::RecorderError;
pub use format::{Codec, VideoFormat};
pub use session::{RecordingSummary, StreamRecorder};
pub use stream::{stream_file_name, EncoderState, FrameOutcome, StreamInfo};
