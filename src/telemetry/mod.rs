//! Structured event log and telemetry files.
//!
//! - [`LogEntry`] / [`LogLevel`] - one record of the fleet's history
//! - [`TelemetryLog`] - in-memory history, mirrored transcript, parameter CSV

mod entry;
mod sink;

pub use entry::{LogEntry, LogLevel};
pub use sink::{ParameterRow, TelemetryError, TelemetryLog, PARAMETER_CSV_HEADER};
