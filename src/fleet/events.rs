//! Notifications pushed from the fleet to display code.

use std::sync::mpsc::Sender;

use crate::camera::CameraId;
use crate::telemetry::LogEntry;

/// One-way notification emitted by the [`FleetController`](super::FleetController).
#[derive(Debug, Clone, PartialEq)]
pub enum FleetEvent {
    CameraAdded(CameraId),
    CameraRemoved(CameraId),
    /// A fast tick completed
    FramesUpdated,
    ParametersUpdated(CameraId),
    LogAppended(LogEntry),
    ConnectionStatusChanged { id: CameraId, connected: bool },
    CameraError { id: CameraId, code: i32, message: String },
}

/// Receives fleet events.
///
/// Observers are called synchronously at the end of the operation or tick
/// that produced the events, never from inside it.
pub trait FleetObserver: Send {
    fn on_event(&mut self, event: &FleetEvent);
}

/// Forwards events over a channel. A dropped receiver is ignored.
impl FleetObserver for Sender<FleetEvent> {
    fn on_event(&mut self, event: &FleetEvent) {
        let _ = self.send(event.clone());
    }
}

/// Adapts a closure into an observer.
pub struct CallbackObserver<F>(pub F);

impl<F> FleetObserver for CallbackObserver<F>
where
    F: FnMut(&FleetEvent) + Send,
{
    fn on_event(&mut self, event: &FleetEvent) {
        (self.0)(event)
    }
}
