//! The single entry point owning every camera and both sinks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;

use super::events::{FleetEvent, FleetObserver};
use super::scheduler::PeriodicTask;
use crate::camera::{
    CameraEvent, CameraId, CameraState, CameraUnit, Frame, Parameter, ParameterSnapshot,
};
use crate::device::DeviceFactory;
use crate::recorder::{RecorderError, RecordingSummary, StreamRecorder, VideoFormat};
use crate::telemetry::{LogEntry, LogLevel, TelemetryError, TelemetryLog};

/// Default period of the frame tick.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);
/// Default period of the telemetry tick.
pub const DEFAULT_TELEMETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Which ticks ran during one [`FleetController::run_due`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueTicks {
    pub frames: bool,
    pub telemetry: bool,
}

/// Owns the cameras, the recorder and the telemetry log.
///
/// Cameras are kept in ascending id order and every bulk operation visits
/// them in that order. Events produced by an operation are queued and
/// delivered to the observers when the operation returns.
pub struct FleetController {
    cameras: BTreeMap<CameraId, CameraUnit>,
    next_id: u32,
    devices: Box<dyn DeviceFactory>,
    recorder: StreamRecorder,
    telemetry: TelemetryLog,
    observers: Vec<Box<dyn FleetObserver>>,
    pending: Vec<FleetEvent>,
    latest_frames: BTreeMap<CameraId, Frame>,
    frame_task: PeriodicTask,
    telemetry_task: PeriodicTask,
    shut_down: bool,
}

impl std::fmt::Debug for FleetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetController")
            .field("cameras", &self.cameras)
            .field("next_id", &self.next_id)
            .field("recorder", &self.recorder)
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}

impl FleetController {
    /// Controller recording through ffmpeg.
    pub fn new(devices: Box<dyn DeviceFactory>) -> Self {
        Self::with_recorder(devices, StreamRecorder::new())
    }

    pub fn with_recorder(devices: Box<dyn DeviceFactory>, recorder: StreamRecorder) -> Self {
        let mut controller = Self {
            cameras: BTreeMap::new(),
            next_id: 0,
            devices,
            recorder,
            telemetry: TelemetryLog::new(),
            observers: Vec::new(),
            pending: Vec::new(),
            latest_frames: BTreeMap::new(),
            frame_task: PeriodicTask::new(DEFAULT_FRAME_INTERVAL),
            telemetry_task: PeriodicTask::new(DEFAULT_TELEMETRY_INTERVAL),
            shut_down: false,
        };
        controller.log(LogLevel::Info, "Fleet controller initialized", None);
        controller.flush_events();
        controller
    }

    pub fn add_observer(&mut self, observer: Box<dyn FleetObserver>) {
        self.observers.push(observer);
    }

    /// Register a channel observer and return its receiving end.
    pub fn subscribe(&mut self) -> mpsc::Receiver<FleetEvent> {
        let (tx, rx) = mpsc::channel();
        self.add_observer(Box::new(tx));
        rx
    }

    // ---- fleet membership ----

    /// Create a camera with the next unused id.
    pub fn add_camera(&mut self) -> CameraId {
        let id = CameraId(self.next_id);
        self.next_id += 1;

        let device = self.devices.create(id);
        self.cameras.insert(id, CameraUnit::new(id, device));
        self.recorder.configure(self.cameras.keys().copied());

        self.log(LogLevel::Info, format!("Camera added with ID {}", id), Some(id));
        self.pending.push(FleetEvent::CameraAdded(id));
        self.flush_events();
        id
    }

    /// Stop, disconnect and drop a camera. Returns false for an unknown id.
    pub fn remove_camera(&mut self, id: CameraId) -> bool {
        let Some(mut unit) = self.cameras.remove(&id) else {
            self.log(
                LogLevel::Warning,
                format!("Cannot remove: Camera ID {} not found", id),
                None,
            );
            self.flush_events();
            return false;
        };

        unit.stop();
        unit.disconnect();
        let events = unit.drain_events();
        drop(unit);

        self.absorb(events);
        self.latest_frames.remove(&id);
        self.recorder.configure(self.cameras.keys().copied());

        self.log(LogLevel::Info, "Camera removed", Some(id));
        self.pending.push(FleetEvent::CameraRemoved(id));
        self.flush_events();
        true
    }

    /// Drop every camera.
    pub fn clear(&mut self) {
        for id in self.camera_ids() {
            self.remove_camera(id);
        }
    }

    pub fn camera_ids(&self) -> Vec<CameraId> {
        self.cameras.keys().copied().collect()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn camera_state(&self, id: CameraId) -> Option<CameraState> {
        self.cameras.get(&id).map(CameraUnit::state)
    }

    // ---- bulk lifecycle ----

    /// Connect every camera. True only if all of them connected.
    pub fn connect_all(&mut self) -> bool {
        self.log(LogLevel::Info, "Connecting all cameras...", None);

        let mut all_ok = true;
        for id in self.camera_ids() {
            let Some((result, events)) = self.with_unit(id, CameraUnit::connect) else {
                continue;
            };
            self.absorb(events);
            if result.is_err() {
                all_ok = false;
                self.log(LogLevel::Error, format!("Failed to connect camera {}", id), Some(id));
            }
        }

        if all_ok {
            self.log(LogLevel::Info, "All cameras connected successfully", None);
        } else {
            self.log(LogLevel::Warning, "Some cameras failed to connect", None);
        }
        self.flush_events();
        all_ok
    }

    pub fn disconnect_all(&mut self) {
        self.log(LogLevel::Info, "Disconnecting all cameras...", None);
        for id in self.camera_ids() {
            if let Some(((), events)) = self.with_unit(id, CameraUnit::disconnect) {
                self.absorb(events);
            }
        }
        self.latest_frames.clear();
        self.log(LogLevel::Info, "All cameras disconnected", None);
        self.flush_events();
    }

    /// Start acquisition on every camera. True only if all of them started.
    pub fn start_all(&mut self) -> bool {
        self.log(LogLevel::Info, "Starting acquisition on all cameras...", None);

        let mut all_ok = true;
        for id in self.camera_ids() {
            let Some((result, events)) = self.with_unit(id, CameraUnit::start) else {
                continue;
            };
            self.absorb(events);
            if result.is_err() {
                all_ok = false;
                self.log(LogLevel::Error, format!("Failed to start camera {}", id), Some(id));
            }
        }

        if all_ok {
            self.log(LogLevel::Info, "All cameras started successfully", None);
        } else {
            self.log(LogLevel::Warning, "Some cameras failed to start", None);
        }
        self.flush_events();
        all_ok
    }

    pub fn stop_all(&mut self) {
        self.log(LogLevel::Info, "Stopping acquisition on all cameras...", None);
        for id in self.camera_ids() {
            if let Some(((), events)) = self.with_unit(id, CameraUnit::stop) {
                self.absorb(events);
            }
        }
        self.latest_frames.clear();
        self.log(LogLevel::Info, "All cameras stopped", None);
        self.flush_events();
    }

    // ---- periodic work ----

    /// Pull one frame from every running camera, feed the recorder and
    /// cache it as that camera's latest frame.
    pub fn frame_tick(&mut self) {
        for id in self.camera_ids() {
            let frame = match self.cameras.get_mut(&id) {
                Some(unit) if unit.is_running() => unit.pull_frame(),
                _ => {
                    self.latest_frames.remove(&id);
                    continue;
                }
            };
            let Some(frame) = frame else {
                continue;
            };

            if self.recorder.is_recording() {
                if let Err(e) = self.recorder.on_new_frame(id, &frame) {
                    self.report_recorder_error(&e);
                }
            }
            self.latest_frames.insert(id, frame);
        }

        self.pending.push(FleetEvent::FramesUpdated);
        self.flush_events();
    }

    /// Refresh every camera's parameters and write the parameter CSV rows.
    pub fn telemetry_tick(&mut self) {
        let now = Local::now();
        for id in self.camera_ids() {
            let Some((snapshot, events)) = self.with_unit(id, CameraUnit::refresh_parameters) else {
                continue;
            };
            self.absorb(events);
            self.pending.push(FleetEvent::ParametersUpdated(id));

            if let Err(e) = self.telemetry.write_parameter_row(now, id, &snapshot) {
                self.log(
                    LogLevel::Error,
                    format!("Failed to write parameter log: {}", e),
                    Some(id),
                );
            }
        }
        self.flush_events();
    }

    /// Run whichever ticks are due at `now`, frames first.
    pub fn run_due(&mut self, now: Instant) -> DueTicks {
        let ticks = DueTicks {
            frames: self.frame_task.poll(now),
            telemetry: self.telemetry_task.poll(now),
        };
        if ticks.frames {
            self.frame_tick();
        }
        if ticks.telemetry {
            self.telemetry_tick();
        }
        ticks
    }

    /// Nearest deadline of the enabled tasks.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.frame_task.next_deadline(), self.telemetry_task.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Enable or disable the frame tick.
    pub fn set_auto_update(&mut self, enabled: bool, interval: Duration) {
        if enabled {
            self.frame_task.start(interval, Instant::now());
            if self.frame_task.is_enabled() {
                self.log(
                    LogLevel::Info,
                    format!(
                        "Auto-update enabled ({} ms interval)",
                        self.frame_task.period().as_millis()
                    ),
                    None,
                );
            } else {
                self.log(
                    LogLevel::Warning,
                    "Frame interval out of range, auto-update disabled",
                    None,
                );
            }
        } else {
            self.frame_task.cancel();
            self.log(LogLevel::Info, "Auto-update disabled", None);
        }
        self.flush_events();
    }

    pub fn is_auto_update_enabled(&self) -> bool {
        self.frame_task.is_enabled()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_task.period()
    }

    /// Enable or disable the telemetry tick.
    pub fn set_telemetry_refresh(&mut self, enabled: bool, interval: Duration) {
        if enabled {
            self.telemetry_task.start(interval, Instant::now());
            log::debug!(
                "Telemetry refresh every {} ms",
                self.telemetry_task.period().as_millis()
            );
        } else {
            self.telemetry_task.cancel();
            log::debug!("Telemetry refresh disabled");
        }
    }

    pub fn telemetry_interval(&self) -> Duration {
        self.telemetry_task.period()
    }

    // ---- frames and parameters ----

    /// Pull a frame on demand. Does not feed the recorder.
    pub fn get_frame(&mut self, id: CameraId) -> Option<Frame> {
        if let Some(unit) = self.cameras.get_mut(&id) {
            return unit.pull_frame();
        }
        self.log(
            LogLevel::Warning,
            format!("Cannot get frame: Camera ID {} not found", id),
            None,
        );
        self.flush_events();
        None
    }

    /// Pull a frame from every camera, omitting those without one.
    pub fn get_all_frames(&mut self) -> BTreeMap<CameraId, Frame> {
        self.cameras
            .iter_mut()
            .filter_map(|(&id, unit)| unit.pull_frame().map(|frame| (id, frame)))
            .collect()
    }

    /// Frame cached by the last frame tick.
    pub fn latest_frame(&self, id: CameraId) -> Option<&Frame> {
        self.latest_frames.get(&id)
    }

    /// Refreshed telemetry of one camera.
    pub fn get_camera_parameters(&mut self, id: CameraId) -> Option<ParameterSnapshot> {
        match self.cameras.get_mut(&id) {
            Some(unit) => Some(unit.refresh_parameters()),
            None => {
                self.log(
                    LogLevel::Warning,
                    format!("Cannot get parameters: Camera ID {} not found", id),
                    None,
                );
                self.flush_events();
                None
            }
        }
    }

    pub fn set_exposure_time(&mut self, id: CameraId, value: f64) -> bool {
        self.apply_parameter(id, Parameter::ExposureTime(value))
    }

    pub fn set_gain(&mut self, id: CameraId, value: f64) -> bool {
        self.apply_parameter(id, Parameter::Gain(value))
    }

    pub fn set_power_status(&mut self, id: CameraId, on: bool) -> bool {
        self.apply_parameter(id, Parameter::Power(on))
    }

    fn apply_parameter(&mut self, id: CameraId, parameter: Parameter) -> bool {
        let result = match self.cameras.get_mut(&id) {
            Some(unit) => unit.set_parameter(parameter),
            None => {
                self.log(
                    LogLevel::Warning,
                    format!("Cannot set parameter: Camera ID {} not found", id),
                    None,
                );
                self.flush_events();
                return false;
            }
        };

        let applied = match result {
            Ok(()) => {
                self.log(LogLevel::Info, parameter.to_string(), Some(id));
                self.pending.push(FleetEvent::ParametersUpdated(id));
                true
            }
            Err(e) => {
                self.log(LogLevel::Warning, format!("Cannot set parameter: {}", e), Some(id));
                false
            }
        };
        self.flush_events();
        applied
    }

    // ---- recording ----

    /// Record every camera into `dir`. No-op while already recording.
    ///
    /// The frame rate of the files follows the frame tick period.
    pub fn start_recording(&mut self, dir: &Path, format: VideoFormat) -> Result<(), RecorderError> {
        if self.recorder.is_recording() {
            return Ok(());
        }

        let fps = 1.0 / self.frame_task.period().as_secs_f64();
        let result = self.recorder.start_recording(dir, fps, format);
        match &result {
            Ok(()) => self.log(
                LogLevel::Info,
                format!("Recording started in {} ({})", dir.display(), format),
                None,
            ),
            Err(e) => self.log(LogLevel::Error, format!("Cannot start recording: {}", e), None),
        }
        self.flush_events();
        result
    }

    /// Close every stream. Returns `None` when not recording.
    pub fn stop_recording(&mut self) -> Option<RecordingSummary> {
        let summary = self.recorder.stop_recording()?;
        for e in &summary.errors {
            self.report_recorder_error(e);
        }
        self.log(
            LogLevel::Info,
            format!("Recording stopped ({} stream(s))", summary.streams.len()),
            None,
        );
        self.flush_events();
        Some(summary)
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn recorder(&self) -> &StreamRecorder {
        &self.recorder
    }

    // ---- logging ----

    /// Mirror the log into a fresh transcript in `dir`.
    pub fn set_log_directory(&mut self, dir: &Path) -> Result<PathBuf, TelemetryError> {
        let result = self.telemetry.set_transcript_directory(dir);
        match &result {
            Ok(path) => self.log(
                LogLevel::Info,
                format!("Log file created at {}", path.display()),
                None,
            ),
            Err(e) => self.log(LogLevel::Warning, format!("Cannot create log file: {}", e), None),
        }
        self.flush_events();
        result
    }

    /// Open a fresh parameter CSV in `dir` and refresh telemetry every
    /// `interval`.
    pub fn start_parameter_logging(
        &mut self,
        dir: &Path,
        interval: Duration,
    ) -> Result<PathBuf, TelemetryError> {
        let result = self.telemetry.start_parameter_log(dir);
        match &result {
            Ok(path) => {
                self.telemetry_task.start(interval, Instant::now());
                self.log(
                    LogLevel::Info,
                    format!(
                        "Parameter logging started at {} (interval: {}ms)",
                        path.display(),
                        self.telemetry_task.period().as_millis()
                    ),
                    None,
                );
            }
            Err(e) => self.log(
                LogLevel::Warning,
                format!("Cannot start parameter logging: {}", e),
                None,
            ),
        }
        self.flush_events();
        result
    }

    /// Close the parameter CSV. The telemetry tick keeps running.
    pub fn stop_parameter_logging(&mut self) -> Option<PathBuf> {
        let path = self.telemetry.stop_parameter_log()?;
        self.log(LogLevel::Info, "Parameter logging stopped", None);
        self.flush_events();
        Some(path)
    }

    pub fn is_parameter_logging(&self) -> bool {
        self.telemetry.is_parameter_logging()
    }

    pub fn clear_logs(&mut self) {
        self.telemetry.clear();
        self.log(LogLevel::Info, "Log history cleared", None);
        self.flush_events();
    }

    pub fn log_history(&self) -> &[LogEntry] {
        self.telemetry.history()
    }

    pub fn telemetry(&self) -> &TelemetryLog {
        &self.telemetry
    }

    /// Stop recording, stop and disconnect every camera, close the
    /// parameter CSV.
    pub fn shutdown(&mut self) {
        self.stop_recording();
        self.frame_task.cancel();
        self.telemetry_task.cancel();
        self.stop_all();
        self.disconnect_all();
        self.stop_parameter_logging();
        self.log(LogLevel::Info, "Fleet controller shut down", None);
        self.flush_events();
        self.telemetry.close_transcript();
        self.shut_down = true;
    }

    // ---- internals ----

    /// Run `op` on one unit and collect the events it produced.
    fn with_unit<T>(
        &mut self,
        id: CameraId,
        op: impl FnOnce(&mut CameraUnit) -> T,
    ) -> Option<(T, Vec<CameraEvent>)> {
        let unit = self.cameras.get_mut(&id)?;
        let value = op(&mut *unit);
        Some((value, unit.drain_events()))
    }

    fn absorb(&mut self, events: Vec<CameraEvent>) {
        for event in events {
            match event {
                CameraEvent::ConnectionChanged { id, connected } => {
                    let status = if connected { "Connected" } else { "Disconnected" };
                    self.log(LogLevel::Info, format!("Connection status: {}", status), Some(id));
                    self.pending
                        .push(FleetEvent::ConnectionStatusChanged { id, connected });
                }
                CameraEvent::AcquisitionChanged { .. } => {}
                CameraEvent::Error { id, code, message } => {
                    self.log(LogLevel::Error, format!("Error {}: {}", code, message), Some(id));
                    self.pending.push(FleetEvent::CameraError { id, code, message });
                }
            }
        }
    }

    fn report_recorder_error(&mut self, error: &RecorderError) {
        let level = match error {
            RecorderError::GeometryMismatch { .. } | RecorderError::MalformedFrame { .. } => {
                LogLevel::Warning
            }
            _ => LogLevel::Error,
        };
        self.log(level, error.to_string(), error.camera_id());
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>, camera_id: Option<CameraId>) {
        let entry = self
            .telemetry
            .append(LogEntry::new(level, message, camera_id))
            .clone();
        self.pending.push(FleetEvent::LogAppended(entry));
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending);
        for observer in &mut self.observers {
            for event in &events {
                observer.on_event(event);
            }
        }
    }
}

impl Drop for FleetController {
    fn drop(&mut self) {
        if !self.shut_down {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Device, SimulatedDevice, SimulatorSettings};

    fn small_settings() -> SimulatorSettings {
        SimulatorSettings {
            width: 8,
            height: 6,
            ..SimulatorSettings::default()
        }
    }

    fn controller() -> FleetController {
        let factory = |_id: CameraId| -> Box<dyn Device> {
            Box::new(SimulatedDevice::new(small_settings()))
        };
        FleetController::new(Box::new(factory))
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut fleet = controller();
        assert_eq!(fleet.add_camera(), CameraId(0));
        assert_eq!(fleet.add_camera(), CameraId(1));
        assert_eq!(fleet.add_camera(), CameraId(2));
        assert!(fleet.remove_camera(CameraId(1)));
        assert_eq!(fleet.add_camera(), CameraId(3));
        assert_eq!(
            fleet.camera_ids(),
            vec![CameraId(0), CameraId(2), CameraId(3)]
        );
        assert_eq!(fleet.recorder().tracked_ids(), fleet.camera_ids());
    }

    #[test]
    fn test_remove_unknown_logs_warning() {
        let mut fleet = controller();
        fleet.add_camera();
        assert!(!fleet.remove_camera(CameraId(9)));
        assert_eq!(fleet.camera_count(), 1);
        let last = fleet.log_history().last().unwrap();
        assert_eq!(last.level, LogLevel::Warning);
        assert_eq!(last.message, "Cannot remove: Camera ID 9 not found");
    }

    #[test]
    fn test_lifecycle_through_ticks() {
        let mut fleet = controller();
        let id = fleet.add_camera();
        assert!(fleet.connect_all());
        assert!(fleet.start_all());
        assert_eq!(fleet.camera_state(id).map(|s| s.is_running()), Some(true));

        fleet.frame_tick();
        let frame = fleet.latest_frame(id).unwrap();
        assert_eq!((frame.width, frame.height), (8, 6));

        fleet.stop_all();
        assert!(fleet.latest_frame(id).is_none());
        assert!(fleet.get_all_frames().is_empty());
    }

    #[test]
    fn test_start_without_connect_reports_error() {
        let mut fleet = controller();
        let id = fleet.add_camera();
        assert!(!fleet.start_all());

        let errors: Vec<_> = fleet
            .log_history()
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(
            errors,
            vec![
                "Error -2: Cannot start: camera not connected".to_string(),
                format!("Failed to start camera {}", id),
            ]
        );
    }

    #[test]
    fn test_events_reach_observers_in_order() {
        let mut fleet = controller();
        let rx = fleet.subscribe();
        let id = fleet.add_camera();
        fleet.connect_all();

        let events: Vec<_> = rx
            .try_iter()
            .filter(|e| !matches!(e, FleetEvent::LogAppended(_)))
            .collect();
        assert_eq!(
            events,
            vec![
                FleetEvent::CameraAdded(id),
                FleetEvent::ConnectionStatusChanged {
                    id,
                    connected: true
                },
            ]
        );
    }

    #[test]
    fn test_parameter_setters() {
        let mut fleet = controller();
        let id = fleet.add_camera();
        assert!(!fleet.set_gain(id, 2.0));
        fleet.connect_all();
        assert!(fleet.set_gain(id, 2.0));
        assert!(fleet.set_exposure_time(id, 5000.0));
        assert!(!fleet.set_power_status(CameraId(42), false));

        let params = fleet.get_camera_parameters(id).unwrap();
        assert_eq!(params.gain, 2.0);
        assert_eq!(params.exposure_time, 5000.0);
        assert!(fleet.get_camera_parameters(CameraId(42)).is_none());
    }

    #[test]
    fn test_auto_update_interval() {
        let mut fleet = controller();
        fleet.set_auto_update(true, Duration::from_millis(40));
        assert_eq!(fleet.frame_interval(), Duration::from_millis(40));
        let start = fleet.log_history().last().unwrap();
        assert_eq!(start.message, "Auto-update enabled (40 ms interval)");

        fleet.set_auto_update(true, Duration::MAX);
        assert!(!fleet.is_auto_update_enabled());
        assert_eq!(fleet.log_history().last().unwrap().level, LogLevel::Warning);
    }

    #[test]
    fn test_run_due_and_next_deadline() {
        let mut fleet = controller();
        assert_eq!(fleet.next_deadline(), None);
        assert_eq!(fleet.run_due(Instant::now()), DueTicks::default());

        fleet.set_auto_update(true, Duration::from_millis(10));
        fleet.set_telemetry_refresh(true, Duration::from_secs(60));
        let deadline = fleet.next_deadline().unwrap();

        let ticks = fleet.run_due(deadline);
        assert!(ticks.frames);
        assert!(!ticks.telemetry);
    }

    #[test]
    fn test_clear_logs() {
        let mut fleet = controller();
        fleet.add_camera();
        fleet.clear_logs();
        assert_eq!(fleet.log_history().len(), 1);
        assert_eq!(fleet.log_history()[0].message, "Log history cleared");
    }

    #[test]
    fn test_shutdown_disconnects_everything() {
        let mut fleet = controller();
        let id = fleet.add_camera();
        fleet.connect_all();
        fleet.start_all();
        fleet.shutdown();
        assert_eq!(fleet.camera_state(id), Some(CameraState::default()));
        assert_eq!(fleet.next_deadline(), None);
    }
}
