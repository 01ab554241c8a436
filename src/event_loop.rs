//! Async driver for the fleet's periodic tasks.
//!
//! The controller never sleeps itself. This loop waits until the nearest
//! deadline on a tokio timer, runs whatever is due, and exits on Ctrl+C or
//! after an optional duration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::fleet::FleetController;

/// Longest single sleep, so Ctrl+C is noticed promptly.
const MAX_SLEEP: Duration = Duration::from_millis(100);

/// Global flag for handling Ctrl+C across the application
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, shutting down...");
    })
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    DurationElapsed,
}

/// Drive `fleet` until Ctrl+C or until `duration` has passed.
pub async fn run(fleet: &mut FleetController, duration: Option<Duration>) -> StopReason {
    let started = Instant::now();
    // a duration past the clock's range never ends
    let end = duration.and_then(|d| started.checked_add(d));
    let mut frame_ticks: u64 = 0;
    let mut telemetry_ticks: u64 = 0;

    let reason = loop {
        if ctrlc_received() {
            break StopReason::Interrupted;
        }

        let now = Instant::now();
        if let Some(end) = end {
            if now >= end {
                break StopReason::DurationElapsed;
            }
        }

        let mut wake = now + MAX_SLEEP;
        if let Some(deadline) = fleet.next_deadline() {
            wake = wake.min(deadline);
        }
        if let Some(end) = end {
            wake = wake.min(end);
        }
        tokio::time::sleep_until(tokio::time::Instant::from_std(wake)).await;

        let ticks = fleet.run_due(Instant::now());
        frame_ticks += u64::from(ticks.frames);
        telemetry_ticks += u64::from(ticks.telemetry);
    };

    log::info!(
        "Event loop stopped after {:.1}s ({} frame ticks, {} telemetry ticks)",
        started.elapsed().as_secs_f64(),
        frame_ticks,
        telemetry_ticks
    );
    reason
}
