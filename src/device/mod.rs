//! Device abstraction for camera hardware and simulators.
//!
//! A [`Device`] is the opaque per-camera handle that performs the actual
//! acquisition. The rest of the crate only talks to this trait:
//! - [`Device`] - connect/start/stop, frame access and telemetry
//! - [`DeviceFactory`] - builds a device for a freshly allocated camera id
//! - [`SimulatedDevice`] - deterministic software camera

mod simulated;

pub use simulated::{SimulatedDevice, SimulatedDeviceFactory, SimulatorSettings};

use crate::camera::{CameraId, Frame};

/// Contract every camera backend implements.
///
/// Calls are expected to return promptly; the scheduler runs on a single
/// timeline and a hanging device stalls every other camera.
pub trait Device: Send {
    /// Open the device. Returns false if the device refused.
    fn connect(&mut self) -> bool;
    fn disconnect(&mut self);

    /// Begin acquisition. Returns false if the device refused.
    fn start(&mut self) -> bool;
    fn stop(&mut self);

    /// Newest frame, or `None` when nothing is available.
    fn get_frame(&mut self) -> Option<Frame>;

    fn temperature(&self) -> f64;
    fn fps(&self) -> f64;
    fn exposure_time(&self) -> f64;
    fn set_exposure_time(&mut self, value: f64);
    fn gain(&self) -> f64;
    fn set_gain(&mut self, value: f64);
    fn power_status(&self) -> bool;
    fn set_power_status(&mut self, on: bool);
    fn frame_counter(&self) -> u64;
    fn error_code(&self) -> i32;
}

/// Creates the device backing a newly added camera.
pub trait DeviceFactory: Send {
    fn create(&mut self, id: CameraId) -> Box<dyn Device>;
}

impl<F> DeviceFactory for F
where
    F: FnMut(CameraId) -> Box<dyn Device> + Send,
{
    fn create(&mut self, id: CameraId) -> Box<dyn Device> {
        self(id)
    }
}
