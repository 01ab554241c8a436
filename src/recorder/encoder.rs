//! Video encoders.
//!
//! The recorder only depends on the [`VideoEncoder`] and [`EncoderFactory`]
//! traits. The default implementation pipes raw frames into an `ffmpeg`
//! child process, one process per stream.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::format::Codec;
use crate::camera::{Frame, FrameFormat, FrameGeometry};

/// How long a closing encoder gets to flush before escalating.
const FINISH_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors reported by an encoder backend.
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("FFmpeg not found. Please install ffmpeg and make sure it is on PATH")]
    FfmpegNotFound,

    #[error("Failed to spawn FFmpeg: {0}")]
    SpawnFailed(std::io::Error),

    #[error("Encoder I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoder input already closed")]
    Closed,

    #[error("FFmpeg exited with code {exit_code:?}: {stderr}")]
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Everything needed to open one output stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSpec {
    pub path: PathBuf,
    pub geometry: FrameGeometry,
    pub pixel_format: FrameFormat,
    pub fps: f64,
    pub codec: Codec,
}

/// A single open output file accepting frames of a fixed geometry.
pub trait VideoEncoder: Send {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), EncoderError>;

    /// Flush and close the output file.
    fn finish(self: Box<Self>) -> Result<(), EncoderError>;
}

/// Opens encoders for the recorder.
pub trait EncoderFactory: Send {
    fn open(&self, spec: &EncoderSpec) -> Result<Box<dyn VideoEncoder>, EncoderError>;
}

/// Build the ffmpeg argument list for a stream.
pub fn ffmpeg_args(spec: &EncoderSpec) -> Vec<String> {
    let mut args: Vec<String> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-y",
        "-f",
        "rawvideo",
        "-pix_fmt",
        spec.pixel_format.ffmpeg_pix_fmt(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    args.push("-s".to_string());
    args.push(format!("{}x{}", spec.geometry.width, spec.geometry.height));
    args.push("-r".to_string());
    args.push(format!("{:.3}", spec.fps));
    args.push("-i".to_string());
    args.push("-".to_string());
    args.extend(spec.codec.ffmpeg_args().iter().map(|s| s.to_string()));
    args.push(spec.path.to_string_lossy().into_owned());
    args
}

/// Encoder backed by an `ffmpeg` child process reading raw video on stdin.
pub struct FfmpegEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_thread: Option<JoinHandle<Vec<String>>>,
    path: PathBuf,
}

impl std::fmt::Debug for FfmpegEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegEncoder")
            .field("path", &self.path)
            .field("pid", &self.child.id())
            .finish_non_exhaustive()
    }
}

impl FfmpegEncoder {
    pub fn spawn(spec: &EncoderSpec) -> Result<Self, EncoderError> {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(ffmpeg_args(spec))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EncoderError::FfmpegNotFound
            } else {
                EncoderError::SpawnFailed(e)
            }
        })?;

        let stdin = child.stdin.take();

        // Drained on a thread so a chatty ffmpeg never blocks on a full pipe;
        // joined in finish().
        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let reader = BufReader::new(stderr);
                let mut lines = Vec::new();
                for line in reader.lines() {
                    match line {
                        Ok(l) => {
                            log::debug!("[ffmpeg] {}", l);
                            lines.push(l);
                        }
                        Err(_) => break,
                    }
                }
                lines
            })
        });

        log::debug!(
            "Spawned ffmpeg (pid {}) for {} with {}",
            child.id(),
            spec.path.display(),
            spec.codec.display_name()
        );

        Ok(Self {
            child,
            stdin,
            stderr_thread,
            path: spec.path.clone(),
        })
    }

    /// Wait for exit, escalating to SIGINT and then SIGKILL.
    fn wait_for_exit(&mut self) -> Result<ExitStatus, EncoderError> {
        if let Some(status) = self.wait_timeout(FINISH_TIMEOUT)? {
            return Ok(status);
        }

        #[cfg(unix)]
        {
            // SAFETY: signalling our own child; the pid stays valid until waited on.
            unsafe {
                libc::kill(self.child.id() as i32, libc::SIGINT);
            }
            if let Some(status) = self.wait_timeout(FINISH_TIMEOUT)? {
                return Ok(status);
            }
        }

        log::warn!("ffmpeg for {} did not exit, killing it", self.path.display());
        let _ = self.child.kill();
        Ok(self.child.wait()?)
    }

    fn wait_timeout(&mut self, timeout: Duration) -> Result<Option<ExitStatus>, EncoderError> {
        let start = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(Some(status));
            }
            if start.elapsed() > timeout {
                return Ok(None);
            }
            thread::sleep(Duration::from_millis(20));
        }
    }

    fn take_stderr_output(&mut self) -> Vec<String> {
        self.stderr_thread
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), EncoderError> {
        let stdin = self.stdin.as_mut().ok_or(EncoderError::Closed)?;
        stdin.write_all(&frame.data)?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), EncoderError> {
        // EOF on stdin tells ffmpeg to finalize the container
        drop(self.stdin.take());
        let status = self.wait_for_exit()?;
        let stderr = self.take_stderr_output();

        if status.success() {
            Ok(())
        } else {
            Err(EncoderError::ProcessFailed {
                exit_code: status.code(),
                stderr: stderr.join("\n"),
            })
        }
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            drop(self.stdin.take());
            let _ = self.wait_for_exit();
        }
        let _ = self.take_stderr_output();
    }
}

/// Default factory spawning one ffmpeg process per stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegEncoderFactory;

impl EncoderFactory for FfmpegEncoderFactory {
    fn open(&self, spec: &EncoderSpec) -> Result<Box<dyn VideoEncoder>, EncoderError> {
        Ok(Box::new(FfmpegEncoder::spawn(spec)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(codec: Codec, path: &str) -> EncoderSpec {
        EncoderSpec {
            path: PathBuf::from(path),
            geometry: FrameGeometry {
                width: 640,
                height: 480,
                channels: 3,
            },
            pixel_format: FrameFormat::Bgr,
            fps: 30.0,
            codec,
        }
    }

    #[test]
    fn test_ffmpeg_args_avi() {
        let args = ffmpeg_args(&spec(Codec::Mjpeg, "/tmp/out/camera_0.avi"));
        let joined = args.join(" ");
        assert!(joined.contains("-f rawvideo -pix_fmt bgr24"));
        assert!(joined.contains("-s 640x480"));
        assert!(joined.contains("-r 30.000"));
        assert!(joined.contains("-i - -c:v mjpeg"));
        assert_eq!(args.last().unwrap(), "/tmp/out/camera_0.avi");
    }

    #[test]
    fn test_ffmpeg_args_mp4() {
        let args = ffmpeg_args(&spec(Codec::H264, "camera_1.mp4"));
        assert!(args.iter().any(|a| a == "libx264"));
        assert!(args.iter().any(|a| a == "yuv420p"));
    }

    #[test]
    fn test_ffmpeg_args_grayscale() {
        let mut s = spec(Codec::Mjpeg, "g.avi");
        s.pixel_format = FrameFormat::Gray;
        s.geometry.channels = 1;
        let args = ffmpeg_args(&s);
        let idx = args.iter().position(|a| a == "-pix_fmt").unwrap();
        assert_eq!(args[idx + 1], "gray");
    }

    #[test]
    fn test_encoder_error_display() {
        let err = EncoderError::ProcessFailed {
            exit_code: Some(1),
            stderr: "Unknown encoder".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Some(1)"));
        assert!(msg.contains("Unknown encoder"));
        assert!(format!("{}", EncoderError::FfmpegNotFound).contains("FFmpeg not found"));
    }
}
