#![allow(dead_code)]

use std::cell::Cell;

use odometer_core::{ElapsedCounter, LedBar};

/// Counter advanced by hand; `reset` zeroes it like the hardware timer.
#[derive(Default)]
pub struct ManualCounter {
    ticks: Cell<u32>,
    resets: Cell<u32>,
}

impl ManualCounter {
    pub fn advance(&self, ticks: u32) {
        self.ticks.set(self.ticks.get().wrapping_add(ticks));
    }

    pub fn resets(&self) -> u32 {
        self.resets.get()
    }
}

impl ElapsedCounter for ManualCounter {
    fn raw(&self) -> u32 {
        self.ticks.get()
    }

    fn reset(&self) {
        self.ticks.set(0);
        self.resets.set(self.resets.get() + 1);
    }
}

/// Bar that keeps every pattern written to it.
#[derive(Default)]
pub struct RecordingBar {
    pub patterns: Vec<u8>,
}

impl LedBar for RecordingBar {
    fn write_pattern(&mut self, pattern: u8) {
        self.patterns.push(pattern);
    }
}
