//! Logging helpers for the odometer main loop.
//!
//! Target builds log through defmt over RTT; host builds print to stdout so the
//! same call sites work when the firmware crate is exercised off-target.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use odometer_core::{CycleReport, SpeedSample};

use crate::status::CaptureSnapshot;

/// Speed in hundredths of a major unit per hour (`cmph`), `None` when unknown.
///
/// Keeps the log path free of float formatting on the MCU. The float cast
/// saturates, so negative or NaN inputs log as zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn centi_speed(speed: SpeedSample) -> Option<u32> {
    speed.speed().map(|value| (value.per_hour() * 100.0) as u32)
}

/// Logs a completed computation cycle.
pub fn log_cycle(cycle: u32, report: &CycleReport) {
    emit_cycle(
        cycle,
        report.miles,
        report.feet,
        report.inches,
        centi_speed(report.speed),
        report.level.get(),
    );
}

/// Logs the capture counters, typically on an idle heartbeat.
pub fn log_capture_counters(snapshot: CaptureSnapshot) {
    emit_counters(snapshot.accepted, snapshot.ignored, snapshot.dropped);
}

/// Logs the startup banner and the active wheel configuration.
pub fn log_startup(circumference: u16, eighth_threshold: u16) {
    emit_startup(circumference, eighth_threshold);
}

#[cfg(target_os = "none")]
fn emit_cycle(cycle: u32, miles: u16, feet: u16, inches: u16, centi: Option<u32>, level: u8) {
    match centi {
        Some(centi) => defmt::debug!(
            "odometer: cycle={} {}mi {}ft {}in speed={}cmph level={}",
            cycle,
            miles,
            feet,
            inches,
            centi,
            level
        ),
        None => defmt::debug!(
            "odometer: cycle={} {}mi {}ft {}in speed=unknown level={}",
            cycle,
            miles,
            feet,
            inches,
            level
        ),
    }
}

#[cfg(not(target_os = "none"))]
fn emit_cycle(cycle: u32, miles: u16, feet: u16, inches: u16, centi: Option<u32>, level: u8) {
    match centi {
        Some(centi) => println!(
            "odometer: cycle={cycle} {miles}mi {feet}ft {inches}in speed={centi}cmph level={level}"
        ),
        None => println!(
            "odometer: cycle={cycle} {miles}mi {feet}ft {inches}in speed=unknown level={level}"
        ),
    }
}

#[cfg(target_os = "none")]
fn emit_counters(accepted: u32, ignored: u32, dropped: u32) {
    defmt::info!(
        "capture: accepted={} ignored={} dropped={}",
        accepted,
        ignored,
        dropped
    );
}

#[cfg(not(target_os = "none"))]
fn emit_counters(accepted: u32, ignored: u32, dropped: u32) {
    println!("capture: accepted={accepted} ignored={ignored} dropped={dropped}");
}

#[cfg(target_os = "none")]
fn emit_startup(circumference: u16, eighth_threshold: u16) {
    defmt::info!(
        "odometer: ready circumference={}in band={}ft",
        circumference,
        eighth_threshold
    );
}

#[cfg(not(target_os = "none"))]
fn emit_startup(circumference: u16, eighth_threshold: u16) {
    println!("odometer: ready circumference={circumference}in band={eighth_threshold}ft");
}
