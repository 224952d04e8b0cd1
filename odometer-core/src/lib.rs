#![no_std]

// Measurement pipeline for the Hall-effect odometer.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library. Hardware specifics (timer, sensor line, LED port, UART)
// reach the pipeline only through the traits and handles exposed here.

pub mod capture;
pub mod config;
pub mod cycle;
pub mod display;
pub mod distance;
pub mod report;
pub mod speed;

pub use capture::{
    CaptureOutcome, ElapsedCounter, PulseCapture, PulseEvent, PulseMailbox, PulseReceiver,
};
pub use config::{ConfigError, OdometerConfig};
pub use cycle::Odometer;
pub use display::{DisplayLevel, DisplayMapper, LedBar, NoopLedBar, light_levels};
pub use distance::{DistanceAccumulator, DistanceState};
pub use report::{BANNER, CycleReport};
pub use speed::{Speed, SpeedError, SpeedEstimator, SpeedSample};
