//! Fleet orchestration.
//!
//! - [`FleetController`] - owns every camera, the recorder and the log
//! - [`PeriodicTask`] - the frame and telemetry ticks
//! - [`FleetEvent`] / [`FleetObserver`] - notifications for display code

mod controller;
mod events;
mod scheduler;

pub use controller::{DueTicks, FleetController, DEFAULT_FRAME_INTERVAL, DEFAULT_TELEMETRY_INTERVAL};
pub use events::{CallbackObserver, FleetEvent, FleetObserver};
pub use scheduler::PeriodicTask;
