//! Per-camera state machine and the value types it exchanges.
//!
//! - [`CameraUnit`] - owns a device and its connect/start/stop lifecycle
//! - [`Frame`], [`ParameterSnapshot`] - values copied out of a unit
//! - [`CameraEvent`], [`CameraError`] - outcomes reported to the fleet

mod types;
mod unit;

pub use types::{
    AcquisitionState, CameraError, CameraEvent, CameraId, CameraState, ConnectionState, Frame,
    FrameFormat, FrameGeometry, Parameter, ParameterSnapshot, CONNECT_FAILED_CODE,
    NOT_CONNECTED_CODE, START_FAILED_CODE,
};
pub use unit::CameraUnit;
