//! Configuration file handling for multicam-recorder.
//!
//! Loads configuration from `<config dir>/multicam-recorder/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::device::SimulatorSettings;
use crate::recorder::VideoFormat;

/// Configuration file structure for multicam-recorder.
/// Loaded from the default path (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fleet: FleetConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulator: SimulatorSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Cameras created at startup
    pub cameras: usize,
    pub frame_interval_ms: u64,
    pub telemetry_interval_ms: u64,
    pub auto_connect: bool,
    pub auto_start: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            cameras: 2,
            frame_interval_ms: 33,
            telemetry_interval_ms: 500,
            auto_connect: true,
            auto_start: true,
        }
    }
}

impl FleetConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_interval_ms)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RecordingConfig {
    /// Record into this directory at startup
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: VideoFormat,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingConfig {
    /// Directory for the transcript and parameter CSV
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub parameter_logging: bool,
}

/// Template written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# multicam-recorder configuration

[fleet]
# Cameras created at startup
cameras = 2
# Frame tick period (recording fps = 1000 / frame_interval_ms)
frame_interval_ms = 33
# Telemetry refresh and parameter CSV period
telemetry_interval_ms = 500
auto_connect = true
auto_start = true

[recording]
# Start recording into this directory
# output_dir = "recordings"
# Container: avi (Motion-JPEG) or mp4 (H.264)
format = "avi"

[logging]
# Write the log transcript here
# directory = "logs"
# Also write all_cameras_params_*.csv into the log directory
parameter_logging = false

[simulator]
width = 640
height = 480
# 1 = grayscale, 3 = BGR
channels = 3
fps = 30.0
base_temperature = 35.0
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("multicam-recorder").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/multicam-recorder/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.fleet.cameras, 2);
        assert_eq!(config.fleet.frame_interval(), Duration::from_millis(33));
        assert_eq!(config.fleet.telemetry_interval(), Duration::from_millis(500));
        assert!(config.fleet.auto_connect);
        assert_eq!(config.recording.format, VideoFormat::Avi);
        assert!(config.logging.directory.is_none());
        assert_eq!(config.simulator.width, 640);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[fleet]\ncameras = 4\n\n[recording]\nformat = \"mp4\"\noutput_dir = \"out\"\n\n[simulator]\nchannels = 1"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.fleet.cameras, 4);
        assert_eq!(config.fleet.frame_interval_ms, 33);
        assert!(config.fleet.auto_start);
        assert_eq!(config.recording.format, VideoFormat::Mp4);
        assert_eq!(config.recording.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.simulator.channels, 1);
        assert_eq!(config.simulator.height, 480);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fleet]\ncameras = \"many\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.fleet.cameras, FleetConfig::default().cameras);
        assert_eq!(config.recording.format, VideoFormat::Avi);
        assert!(!config.logging.parameter_logging);
    }

    #[test]
    fn test_default_path_location() {
        let path = default_path();
        assert!(path.ends_with("multicam-recorder/config.toml"));
    }
}
