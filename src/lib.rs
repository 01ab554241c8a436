//! multicam-recorder library crate.
//!
//! Drives a fleet of cameras through connect/start/stop, records each one
//! into its own video file and keeps a structured log plus a shared
//! parameter CSV.
//!
//! - [`fleet::FleetController`] - the entry point owning everything below
//! - [`camera`] - per-camera state machine
//! - [`device`] - the device trait and a simulated camera
//! - [`recorder`] - per-camera video streams
//! - [`telemetry`] - log history, transcript, parameter CSV

pub mod camera;
pub mod cli;
pub mod config;
pub mod device;
pub mod event_loop;
pub mod fleet;
pub mod recorder;
pub mod telemetry;
