//! Free-running elapsed-time counter.
//!
//! The executor's monotonic clock stands in for the hardware timer: `reset`
//! records a new epoch and `raw` reports ticks since that epoch at
//! [`COUNTER_HZ`](super::COUNTER_HZ). The epoch lives in one atomic so the
//! capture task can read it while the main loop resets it.

#![cfg(target_os = "none")]

use embassy_time::{Instant, TICK_HZ};
use odometer_core::ElapsedCounter;
use portable_atomic::{AtomicU64, Ordering};

use super::ticks_to_counter;

static EPOCH_TICKS: AtomicU64 = AtomicU64::new(0);

/// Handle onto the shared counter; every copy sees the same epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeRunningCounter;

impl FreeRunningCounter {
    pub const fn new() -> Self {
        Self
    }
}

impl ElapsedCounter for FreeRunningCounter {
    fn raw(&self) -> u32 {
        let now = Instant::now().as_ticks();
        let epoch = EPOCH_TICKS.load(Ordering::Acquire);
        ticks_to_counter(now.wrapping_sub(epoch), TICK_HZ)
    }

    fn reset(&self) {
        EPOCH_TICKS.store(Instant::now().as_ticks(), Ordering::Release);
    }
}
