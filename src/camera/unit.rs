//! One camera and its connection/acquisition state machine.

use super::types::{
    AcquisitionState, CameraError, CameraEvent, CameraId, CameraState, ConnectionState, Frame,
    Parameter, ParameterSnapshot, CONNECT_FAILED_CODE, NOT_CONNECTED_CODE, START_FAILED_CODE,
};
use crate::device::Device;

/// Owns a [`Device`] and drives it through
/// `Disconnected -> Connected -> Running`.
///
/// Device outcomes are translated into [`CameraEvent`]s that accumulate
/// until the owner calls [`CameraUnit::drain_events`]. The unit is never
/// Running while Disconnected.
pub struct CameraUnit {
    id: CameraId,
    device: Box<dyn Device>,
    connection: ConnectionState,
    acquisition: AcquisitionState,
    parameters: ParameterSnapshot,
    events: Vec<CameraEvent>,
}

impl std::fmt::Debug for CameraUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraUnit")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CameraUnit {
    pub fn new(id: CameraId, device: Box<dyn Device>) -> Self {
        Self {
            id,
            device,
            connection: ConnectionState::Disconnected,
            acquisition: AcquisitionState::Stopped,
            parameters: ParameterSnapshot::default(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            connection: self.connection,
            acquisition: self.acquisition,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub fn is_running(&self) -> bool {
        self.acquisition == AcquisitionState::Running
    }

    /// Connect the device. Succeeds immediately if already connected.
    pub fn connect(&mut self) -> Result<(), CameraError> {
        if self.is_connected() {
            return Ok(());
        }

        if self.device.connect() {
            self.connection = ConnectionState::Connected;
            self.events.push(CameraEvent::ConnectionChanged {
                id: self.id,
                connected: true,
            });
            log::debug!("Camera {} connected", self.id);
            Ok(())
        } else {
            let code = self.device_code(CONNECT_FAILED_CODE);
            self.push_error(code, "Failed to connect camera");
            Err(CameraError::ConnectFailed { id: self.id, code })
        }
    }

    /// Disconnect, stopping acquisition first. Idempotent.
    pub fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }

        self.stop();
        self.device.disconnect();
        self.connection = ConnectionState::Disconnected;
        self.events.push(CameraEvent::ConnectionChanged {
            id: self.id,
            connected: false,
        });
        log::debug!("Camera {} disconnected", self.id);
    }

    /// Begin acquisition. Requires a connected device.
    pub fn start(&mut self) -> Result<(), CameraError> {
        if !self.is_connected() {
            self.push_error(NOT_CONNECTED_CODE, "Cannot start: camera not connected");
            return Err(CameraError::NotConnected(self.id));
        }

        if self.is_running() {
            return Ok(());
        }

        if self.device.start() {
            self.acquisition = AcquisitionState::Running;
            self.events.push(CameraEvent::AcquisitionChanged {
                id: self.id,
                running: true,
            });
            log::debug!("Camera {} started acquisition", self.id);
            Ok(())
        } else {
            let code = self.device_code(START_FAILED_CODE);
            self.push_error(code, "Failed to start acquisition");
            Err(CameraError::StartFailed { id: self.id, code })
        }
    }

    /// Stop acquisition. Idempotent.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        self.device.stop();
        self.acquisition = AcquisitionState::Stopped;
        self.events.push(CameraEvent::AcquisitionChanged {
            id: self.id,
            running: false,
        });
        log::debug!("Camera {} stopped acquisition", self.id);
    }

    /// Newest frame from the device.
    ///
    /// Returns `None` when not running and also when the device has nothing
    /// new; the two cases are not distinguished.
    pub fn pull_frame(&mut self) -> Option<Frame> {
        if !self.is_running() {
            return None;
        }

        match self.device.get_frame() {
            Some(frame) if !frame.is_empty() => Some(frame),
            _ => {
                log::trace!("Camera {} returned no frame", self.id);
                None
            }
        }
    }

    /// Re-read telemetry from the device when connected, otherwise return
    /// the cached snapshot.
    pub fn refresh_parameters(&mut self) -> ParameterSnapshot {
        if !self.is_connected() {
            return self.parameters;
        }

        self.parameters = ParameterSnapshot {
            temperature: self.device.temperature(),
            fps: self.device.fps(),
            exposure_time: self.device.exposure_time(),
            gain: self.device.gain(),
            power_status: self.device.power_status(),
            frame_counter: self.device.frame_counter(),
            error_code: self.device.error_code(),
        };
        self.parameters
    }

    /// Last cached snapshot. Never touches the device.
    pub fn parameters(&self) -> ParameterSnapshot {
        self.parameters
    }

    /// Write a parameter to the device and mirror it in the cache.
    pub fn set_parameter(&mut self, parameter: Parameter) -> Result<(), CameraError> {
        if !self.is_connected() {
            return Err(CameraError::NotConnected(self.id));
        }

        match parameter {
            Parameter::ExposureTime(value) => {
                self.device.set_exposure_time(value);
                self.parameters.exposure_time = value;
            }
            Parameter::Gain(value) => {
                self.device.set_gain(value);
                self.parameters.gain = value;
            }
            Parameter::Power(on) => {
                self.device.set_power_status(on);
                self.parameters.power_status = on;
            }
        }
        Ok(())
    }

    /// Take every event reported since the last call.
    pub fn drain_events(&mut self) -> Vec<CameraEvent> {
        std::mem::take(&mut self.events)
    }

    fn device_code(&self, fallback: i32) -> i32 {
        match self.device.error_code() {
            0 => fallback,
            code => code,
        }
    }

    fn push_error(&mut self, code: i32, message: &str) {
        self.events.push(CameraEvent::Error {
            id: self.id,
            code,
            message: message.to_string(),
        });
    }
}

impl Drop for CameraUnit {
    fn drop(&mut self) {
        self.disconnect();
    }
}
