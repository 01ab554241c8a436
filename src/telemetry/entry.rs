//! Log entries recorded by the fleet.

use chrono::{DateTime, Local};
use std::fmt;

use crate::camera::CameraId;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Matching level of the `log` facade.
    pub fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped record, optionally scoped to a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// `None` for fleet-wide entries
    pub camera_id: Option<CameraId>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, camera_id: Option<CameraId>) -> Self {
        Self::with_timestamp(Local::now(), level, message, camera_id)
    }

    pub fn with_timestamp(
        timestamp: DateTime<Local>,
        level: LogLevel,
        message: impl Into<String>,
        camera_id: Option<CameraId>,
    ) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            camera_id,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message, None)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message, None)
    }

    /// Scope the entry to a camera.
    pub fn for_camera(mut self, id: CameraId) -> Self {
        self.camera_id = Some(id);
        self
    }

    /// Message with the camera prefix, without timestamp or level.
    pub fn scoped_message(&self) -> String {
        match self.camera_id {
            Some(id) => format!("[Cam {}] {}", id, self.message),
            None => self.message.clone(),
        }
    }
}

/// Transcript line: `[YYYY-MM-DD HH:MM:SS] LEVEL [Cam n] message`.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.scoped_message()
        )
    }
}
