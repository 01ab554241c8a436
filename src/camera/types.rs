//! Camera types and data structures.

use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Identifier of a camera within the fleet.
///
/// Ids are allocated in ascending order and never handed out twice during the
/// lifetime of a process, so a stale id can never resolve to a newer camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CameraId(pub u32);

impl CameraId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Single channel, 8 bits
    Gray,
    /// RGB, 3 bytes per pixel
    Rgb,
    /// BGR, 3 bytes per pixel (OpenCV-style sensors)
    Bgr,
}

impl FrameFormat {
    pub fn channels(self) -> u8 {
        match self {
            FrameFormat::Gray => 1,
            FrameFormat::Rgb | FrameFormat::Bgr => 3,
        }
    }

    /// Matching ffmpeg `-pix_fmt` name for raw input.
    pub fn ffmpeg_pix_fmt(self) -> &'static str {
        match self {
            FrameFormat::Gray => "gray",
            FrameFormat::Rgb => "rgb24",
            FrameFormat::Bgr => "bgr24",
        }
    }
}

/// Shape of a frame as seen by an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// A captured camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw interleaved pixel data, row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(width: u32, height: u32, format: FrameFormat, data: Vec<u8>) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }

    /// A black frame of the given size.
    pub fn blank(width: u32, height: u32, format: FrameFormat) -> Self {
        let len = width as usize * height as usize * format.channels() as usize;
        Self::new(width, height, format, vec![0; len])
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            width: self.width,
            height: self.height,
            channels: self.format.channels(),
        }
    }

    /// True for a zero-sized frame or one without pixel data.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

/// Connection state of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Acquisition state of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    #[default]
    Stopped,
    Running,
}

/// Both state machines of a camera, copied out for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraState {
    pub connection: ConnectionState,
    pub acquisition: AcquisitionState,
}

impl CameraState {
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub fn is_running(&self) -> bool {
        self.acquisition == AcquisitionState::Running
    }
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.connection, self.acquisition) {
            (ConnectionState::Disconnected, _) => write!(f, "Disconnected"),
            (ConnectionState::Connected, AcquisitionState::Stopped) => write!(f, "Connected"),
            (ConnectionState::Connected, AcquisitionState::Running) => write!(f, "Running"),
        }
    }
}

/// Telemetry values of a camera at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParameterSnapshot {
    /// Sensor temperature in °C
    pub temperature: f64,
    /// Measured frames per second
    pub fps: f64,
    /// Exposure time in µs
    pub exposure_time: f64,
    /// Gain factor
    pub gain: f64,
    /// Power on/off
    pub power_status: bool,
    /// Frames produced since connect
    pub frame_counter: u64,
    /// Device error code (0 = no error)
    pub error_code: i32,
}

/// A writable camera parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    /// Exposure time in µs
    ExposureTime(f64),
    Gain(f64),
    Power(bool),
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::ExposureTime(v) => write!(f, "Exposure time set to {} µs", v),
            Parameter::Gain(v) => write!(f, "Gain set to {}", v),
            Parameter::Power(on) => write!(f, "Power {}", if *on { "ON" } else { "OFF" }),
        }
    }
}

/// Default code reported when a device fails to connect without its own code.
pub const CONNECT_FAILED_CODE: i32 = -1;
/// Code reported when acquisition is requested on a disconnected camera.
pub const NOT_CONNECTED_CODE: i32 = -2;
/// Default code reported when a device fails to start without its own code.
pub const START_FAILED_CODE: i32 = -3;

/// Errors that can occur during camera operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera {0} is not connected")]
    NotConnected(CameraId),

    #[error("camera {id} failed to connect (code {code})")]
    ConnectFailed { id: CameraId, code: i32 },

    #[error("camera {id} failed to start acquisition (code {code})")]
    StartFailed { id: CameraId, code: i32 },
}

impl CameraError {
    pub fn code(&self) -> i32 {
        match self {
            CameraError::NotConnected(_) => NOT_CONNECTED_CODE,
            CameraError::ConnectFailed { code, .. } | CameraError::StartFailed { code, .. } => *code,
        }
    }
}

/// Something a camera reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraEvent {
    ConnectionChanged { id: CameraId, connected: bool },
    AcquisitionChanged { id: CameraId, running: bool },
    Error { id: CameraId, code: i32, message: String },
}
