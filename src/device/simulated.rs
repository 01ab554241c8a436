//! Deterministic software camera.

use serde::Deserialize;

use super::{Device, DeviceFactory};
use crate::camera::{CameraId, Frame, FrameFormat};

/// Settings shared by every simulated camera.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub width: u32,
    pub height: u32,
    /// 1 for grayscale, 3 for BGR
    pub channels: u8,
    /// Nominal frame rate reported as telemetry
    pub fps: f64,
    /// Idle sensor temperature in °C
    pub base_temperature: f64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            channels: 3,
            fps: 30.0,
            base_temperature: 35.0,
        }
    }
}

/// A camera that renders a moving gradient.
///
/// Every camera id gets its own phase so streams are distinguishable.
#[derive(Debug)]
pub struct SimulatedDevice {
    settings: SimulatorSettings,
    phase: u8,
    connected: bool,
    running: bool,
    exposure_time: f64,
    gain: f64,
    power: bool,
    frame_counter: u64,
    error_code: i32,
}

impl SimulatedDevice {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self::with_phase(settings, 0)
    }

    pub fn with_phase(settings: SimulatorSettings, phase: u8) -> Self {
        Self {
            settings,
            phase,
            connected: false,
            running: false,
            exposure_time: 10_000.0,
            gain: 1.0,
            power: true,
            frame_counter: 0,
            error_code: 0,
        }
    }

    fn format(&self) -> FrameFormat {
        if self.settings.channels == 1 {
            FrameFormat::Gray
        } else {
            FrameFormat::Bgr
        }
    }

    fn render(&self) -> Frame {
        let format = self.format();
        let width = self.settings.width as usize;
        let height = self.settings.height as usize;
        let bpp = format.channels() as usize;
        let shift = (self.frame_counter as usize).wrapping_add(self.phase as usize * 37);
        let brightness = (self.gain * self.exposure_time / 10_000.0).clamp(0.1, 4.0);

        let mut data = Vec::with_capacity(width * height * bpp);
        for y in 0..height {
            for x in 0..width {
                let base = ((x + shift) % 256) as f64;
                let value = (base * brightness).min(255.0) as u8;
                for c in 0..bpp {
                    data.push(value.wrapping_add((y as u8).wrapping_mul(c as u8 + 1)));
                }
            }
        }
        Frame::new(self.settings.width, self.settings.height, format, data)
    }
}

impl Device for SimulatedDevice {
    fn connect(&mut self) -> bool {
        self.connected = true;
        self.error_code = 0;
        true
    }

    fn disconnect(&mut self) {
        self.running = false;
        self.connected = false;
    }

    fn start(&mut self) -> bool {
        if !self.connected || !self.power {
            self.error_code = 3;
            return false;
        }
        self.running = true;
        true
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn get_frame(&mut self) -> Option<Frame> {
        if !self.running || !self.power {
            return None;
        }
        let frame = self.render();
        self.frame_counter += 1;
        Some(frame)
    }

    fn temperature(&self) -> f64 {
        if !self.power {
            return self.settings.base_temperature;
        }
        // warms up with use, settles 5 °C above idle
        let warmup = 1.0 - 1.0 / (1.0 + self.frame_counter as f64 / 300.0);
        self.settings.base_temperature + 5.0 * warmup
    }

    fn fps(&self) -> f64 {
        if !self.running {
            return 0.0;
        }
        let jitter = ((self.frame_counter % 10) as f64 - 4.5) * 0.02;
        self.settings.fps + jitter
    }

    fn exposure_time(&self) -> f64 {
        self.exposure_time
    }

    fn set_exposure_time(&mut self, value: f64) {
        self.exposure_time = value.max(0.0);
    }

    fn gain(&self) -> f64 {
        self.gain
    }

    fn set_gain(&mut self, value: f64) {
        self.gain = value.max(0.0);
    }

    fn power_status(&self) -> bool {
        self.power
    }

    fn set_power_status(&mut self, on: bool) {
        self.power = on;
        if !on {
            self.running = false;
        }
    }

    fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    fn error_code(&self) -> i32 {
        self.error_code
    }
}

/// Builds one [`SimulatedDevice`] per camera id.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDeviceFactory {
    settings: SimulatorSettings,
}

impl SimulatedDeviceFactory {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self { settings }
    }
}

impl DeviceFactory for SimulatedDeviceFactory {
    fn create(&mut self, id: CameraId) -> Box<dyn Device> {
        Box::new(SimulatedDevice::with_phase(
            self.settings.clone(),
            (id.as_u32() % 256) as u8,
        ))
    }
}
