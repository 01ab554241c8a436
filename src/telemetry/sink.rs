//! Append-only log history, transcript file and parameter CSV.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::entry::LogEntry;
use crate::camera::{CameraId, ParameterSnapshot};

/// Header row of the parameter CSV.
pub const PARAMETER_CSV_HEADER: &str = "timestamp,camera_id,camera_name,fps,temperature";

const TRANSCRIPT_PREFIX: &str = "multicam_log";
const PARAMETER_PREFIX: &str = "all_cameras_params";

/// Errors raised by the telemetry sinks.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Unable to create log directory '{}': {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open '{}': {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Telemetry write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parameter CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

struct SinkFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SinkFile {
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

struct ParameterSink {
    path: PathBuf,
    writer: csv::Writer<BufWriter<File>>,
}

/// One row of the parameter CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRow {
    pub timestamp: String,
    pub camera_id: CameraId,
    pub camera_name: String,
    pub fps: f64,
    pub temperature: f64,
}

impl ParameterRow {
    pub fn new(timestamp: DateTime<Local>, id: CameraId, snapshot: &ParameterSnapshot) -> Self {
        Self {
            timestamp: timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            camera_id: id,
            camera_name: format!("Camera {}", id),
            fps: snapshot.fps,
            temperature: snapshot.temperature,
        }
    }
}

/// Structured event history plus the two file sinks.
///
/// The history is unbounded until [`TelemetryLog::clear`]. Whenever a
/// transcript is opened the whole history is replayed into it, so the file
/// always matches what is held in memory.
#[derive(Default)]
pub struct TelemetryLog {
    history: Vec<LogEntry>,
    transcript: Option<SinkFile>,
    parameters: Option<ParameterSink>,
}

impl std::fmt::Debug for TelemetryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLog")
            .field("entries", &self.history.len())
            .field("transcript", &self.transcript_path())
            .field("parameters", &self.parameter_log_path())
            .finish()
    }
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, mirror it to the `log` facade and the transcript.
    pub fn append(&mut self, entry: LogEntry) -> &LogEntry {
        log::log!(entry.level.to_log_level(), "{}", entry.scoped_message());

        if let Some(transcript) = self.transcript.as_mut() {
            if let Err(e) = transcript.write_line(&entry.to_string()) {
                log::warn!(
                    "Failed to write log file {}: {}",
                    transcript.path.display(),
                    e
                );
            }
        }

        self.history.push(entry);
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[LogEntry] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Open a fresh transcript in `dir`, replacing any open one.
    pub fn set_transcript_directory(&mut self, dir: &Path) -> Result<PathBuf, TelemetryError> {
        let (path, file) = open_timestamped(dir, TRANSCRIPT_PREFIX, "txt", Local::now())?;
        self.close_transcript();

        let mut sink = SinkFile {
            path: path.clone(),
            writer: BufWriter::new(file),
        };
        sink.write_line(&format!(
            "==== MultiCam log started at {} ====",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        for entry in &self.history {
            writeln!(sink.writer, "{}", entry)?;
        }
        sink.writer.flush()?;

        self.transcript = Some(sink);
        Ok(path)
    }

    pub fn transcript_path(&self) -> Option<&Path> {
        self.transcript.as_ref().map(|s| s.path.as_path())
    }

    pub fn close_transcript(&mut self) {
        if let Some(mut sink) = self.transcript.take() {
            let _ = sink.writer.flush();
        }
    }

    /// Start a new parameter CSV in `dir` with a header row.
    pub fn start_parameter_log(&mut self, dir: &Path) -> Result<PathBuf, TelemetryError> {
        self.stop_parameter_log();

        let (path, file) = open_timestamped(dir, PARAMETER_PREFIX, "csv", Local::now())?;
        // header goes out even before the first row
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        writer.write_record(PARAMETER_CSV_HEADER.split(','))?;
        writer.flush()?;
        self.parameters = Some(ParameterSink {
            path: path.clone(),
            writer,
        });
        Ok(path)
    }

    /// Close the parameter CSV, returning its path if one was open.
    pub fn stop_parameter_log(&mut self) -> Option<PathBuf> {
        let mut sink = self.parameters.take()?;
        let _ = sink.writer.flush();
        Some(sink.path)
    }

    pub fn is_parameter_logging(&self) -> bool {
        self.parameters.is_some()
    }

    pub fn parameter_log_path(&self) -> Option<&Path> {
        self.parameters.as_ref().map(|s| s.path.as_path())
    }

    /// Append one row to the parameter CSV. No-op when none is open.
    pub fn write_parameter_row(
        &mut self,
        timestamp: DateTime<Local>,
        id: CameraId,
        snapshot: &ParameterSnapshot,
    ) -> Result<(), TelemetryError> {
        let Some(sink) = self.parameters.as_mut() else {
            return Ok(());
        };
        sink.writer
            .serialize(ParameterRow::new(timestamp, id, snapshot))?;
        sink.writer.flush()?;
        Ok(())
    }
}

/// Create `<prefix>_<YYYYmmdd_HHMMSS>.<ext>` in `dir`, adding a numeric
/// suffix when that name is taken. Never opens an existing file.
fn open_timestamped(
    dir: &Path,
    prefix: &str,
    ext: &str,
    now: DateTime<Local>,
) -> Result<(PathBuf, File), TelemetryError> {
    std::fs::create_dir_all(dir).map_err(|source| TelemetryError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    let stem = format!("{}_{}", prefix, now.format("%Y%m%d_%H%M%S"));
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{}.{}", stem, ext)
        } else {
            format!("{}_{}.{}", stem, attempt, ext)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && attempt < 1000 => {
                attempt += 1;
            }
            Err(source) => return Err(TelemetryError::FileOpen { path, source }),
        }
    }
}
