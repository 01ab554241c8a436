//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use multicam_recorder::camera::{CameraId, Frame, FrameFormat};
use multicam_recorder::device::{Device, DeviceFactory};
use multicam_recorder::recorder::{
    EncoderError, EncoderFactory, EncoderSpec, StreamRecorder, VideoEncoder,
};

/// Observable, scriptable state behind a [`MockDevice`].
#[derive(Debug)]
pub struct DeviceState {
    pub fail_connect: bool,
    pub fail_start: bool,
    /// Reported by `error_code()`
    pub error_code: i32,
    /// Geometry of produced frames; `None` produces no frame
    pub frame: Option<(u32, u32, FrameFormat)>,
    pub connected: bool,
    pub running: bool,
    pub calls: Vec<&'static str>,
    pub frame_counter: u64,
    pub temperature: f64,
    pub exposure_time: f64,
    pub gain: f64,
    pub power: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            fail_connect: false,
            fail_start: false,
            error_code: 0,
            frame: Some((4, 4, FrameFormat::Gray)),
            connected: false,
            running: false,
            calls: Vec::new(),
            frame_counter: 0,
            temperature: 36.5,
            exposure_time: 1000.0,
            gain: 1.0,
            power: true,
        }
    }
}

pub type SharedState = Arc<Mutex<DeviceState>>;

pub struct MockDevice(pub SharedState);

impl Device for MockDevice {
    fn connect(&mut self) -> bool {
        let mut s = self.0.lock().unwrap();
        s.calls.push("connect");
        if s.fail_connect {
            return false;
        }
        s.connected = true;
        true
    }

    fn disconnect(&mut self) {
        let mut s = self.0.lock().unwrap();
        s.calls.push("disconnect");
        s.connected = false;
        s.running = false;
    }

    fn start(&mut self) -> bool {
        let mut s = self.0.lock().unwrap();
        s.calls.push("start");
        if s.fail_start {
            return false;
        }
        s.running = true;
        true
    }

    fn stop(&mut self) {
        let mut s = self.0.lock().unwrap();
        s.calls.push("stop");
        s.running = false;
    }

    fn get_frame(&mut self) -> Option<Frame> {
        let mut s = self.0.lock().unwrap();
        let (width, height, format) = s.frame?;
        s.frame_counter += 1;
        let value = (s.frame_counter % 256) as u8;
        let len = width as usize * height as usize * format.channels() as usize;
        Some(Frame::new(width, height, format, vec![value; len]))
    }

    fn temperature(&self) -> f64 {
        self.0.lock().unwrap().temperature
    }

    fn fps(&self) -> f64 {
        if self.0.lock().unwrap().running {
            30.0
        } else {
            0.0
        }
    }

    fn exposure_time(&self) -> f64 {
        self.0.lock().unwrap().exposure_time
    }

    fn set_exposure_time(&mut self, value: f64) {
        self.0.lock().unwrap().exposure_time = value;
    }

    fn gain(&self) -> f64 {
        self.0.lock().unwrap().gain
    }

    fn set_gain(&mut self, value: f64) {
        self.0.lock().unwrap().gain = value;
    }

    fn power_status(&self) -> bool {
        self.0.lock().unwrap().power
    }

    fn set_power_status(&mut self, on: bool) {
        self.0.lock().unwrap().power = on;
    }

    fn frame_counter(&self) -> u64 {
        self.0.lock().unwrap().frame_counter
    }

    fn error_code(&self) -> i32 {
        self.0.lock().unwrap().error_code
    }
}

/// Factory handing out mock devices, keeping a handle to each one's state.
#[derive(Clone, Default)]
pub struct MockDevices {
    states: Arc<Mutex<Vec<(CameraId, SharedState)>>>,
}

impl MockDevices {
    pub fn factory(&self) -> Box<dyn DeviceFactory> {
        Box::new(self.clone())
    }

    /// State of the device created for `id`.
    pub fn state(&self, id: CameraId) -> SharedState {
        let states = self.states.lock().unwrap();
        let (_, state) = states
            .iter()
            .find(|(created, _)| *created == id)
            .expect("no device created for this id");
        Arc::clone(state)
    }

    pub fn created(&self) -> Vec<CameraId> {
        self.states.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

impl DeviceFactory for MockDevices {
    fn create(&mut self, id: CameraId) -> Box<dyn Device> {
        let state = SharedState::default();
        self.states.lock().unwrap().push((id, Arc::clone(&state)));
        Box::new(MockDevice(state))
    }
}

/// One encoder opened by [`MockEncoders`].
#[derive(Debug, Clone)]
pub struct OpenedStream {
    pub spec: EncoderSpec,
    pub frames: usize,
    pub finished: bool,
}

/// Encoder factory writing raw frames to the requested path.
#[derive(Clone, Default)]
pub struct MockEncoders {
    opened: Arc<Mutex<Vec<OpenedStream>>>,
    /// Paths whose open should fail
    pub fail_paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockEncoders {
    pub fn recorder(&self) -> StreamRecorder {
        StreamRecorder::with_encoder_factory(Box::new(self.clone()))
    }

    pub fn opened(&self) -> Vec<OpenedStream> {
        self.opened.lock().unwrap().clone()
    }
}

struct MockEncoder {
    index: usize,
    opened: Arc<Mutex<Vec<OpenedStream>>>,
    file: std::fs::File,
}

impl VideoEncoder for MockEncoder {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), EncoderError> {
        use std::io::Write;
        self.file.write_all(&frame.data)?;
        self.opened.lock().unwrap()[self.index].frames += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), EncoderError> {
        self.opened.lock().unwrap()[self.index].finished = true;
        Ok(())
    }
}

impl EncoderFactory for MockEncoders {
    fn open(&self, spec: &EncoderSpec) -> Result<Box<dyn VideoEncoder>, EncoderError> {
        if self.fail_paths.lock().unwrap().contains(&spec.path) {
            return Err(EncoderError::FfmpegNotFound);
        }
        let file = std::fs::File::create(&spec.path)?;
        let mut opened = self.opened.lock().unwrap();
        opened.push(OpenedStream {
            spec: spec.clone(),
            frames: 0,
            finished: false,
        });
        Ok(Box::new(MockEncoder {
            index: opened.len() - 1,
            opened: Arc::clone(&self.opened),
            file,
        }))
    }
}
