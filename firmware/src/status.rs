#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Capture-path diagnostic counters.
//!
//! The capture task bumps these lock-free counters from interrupt priority; the
//! main loop only reads them for logging. Nothing here feeds the odometer
//! totals.

use odometer_core::CaptureOutcome;
use portable_atomic::{AtomicU32, Ordering};

/// Edges accepted into the pulse mailbox (including overwrites).
static EDGES_ACCEPTED: AtomicU32 = AtomicU32::new(0);
/// Edges rejected because the sensor line was not at its active level.
static EDGES_IGNORED: AtomicU32 = AtomicU32::new(0);
/// Pulses replaced before the main loop consumed them.
static SAMPLES_DROPPED: AtomicU32 = AtomicU32::new(0);

/// Point-in-time copy of the capture counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureSnapshot {
    pub accepted: u32,
    pub ignored: u32,
    pub dropped: u32,
}

/// Tallies the outcome of one sensor edge.
pub fn record_capture(outcome: CaptureOutcome) {
    match outcome {
        CaptureOutcome::Ignored => {
            EDGES_IGNORED.fetch_add(1, Ordering::Relaxed);
        }
        CaptureOutcome::Latched => {
            EDGES_ACCEPTED.fetch_add(1, Ordering::Relaxed);
        }
        CaptureOutcome::Overwrote => {
            EDGES_ACCEPTED.fetch_add(1, Ordering::Relaxed);
            SAMPLES_DROPPED.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Returns the current counter values.
pub fn snapshot() -> CaptureSnapshot {
    CaptureSnapshot {
        accepted: EDGES_ACCEPTED.load(Ordering::Relaxed),
        ignored: EDGES_IGNORED.load(Ordering::Relaxed),
        dropped: SAMPLES_DROPPED.load(Ordering::Relaxed),
    }
}
