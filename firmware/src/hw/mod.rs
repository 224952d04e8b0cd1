//! Board wiring for the odometer: LED port, sensor line, and the elapsed-time counter.
//!
//! Pure helpers stay host-compilable so they can be unit tested; the
//! peripheral-backed types only exist on the MCU target.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

pub mod counter;

#[cfg(target_os = "none")]
use embassy_stm32::gpio::Output;
#[cfg(target_os = "none")]
use odometer_core::{LedBar, light_levels};

/// Lights on the bar, leftmost first.
pub const LIGHT_COUNT: usize = odometer_core::display::LIGHT_COUNT as usize;

/// Raw counter rate: 16 ticks per millisecond, so a 4-bit prescale yields ms.
pub const COUNTER_HZ: u64 = 16_000;

/// Converts executor ticks into raw counter ticks, wrapping at 32 bits.
// Truncation is the counter's wraparound.
#[allow(clippy::cast_possible_truncation)]
pub fn ticks_to_counter(ticks: u64, tick_hz: u64) -> u32 {
    if tick_hz == 0 {
        return 0;
    }
    let scaled = u128::from(ticks) * u128::from(COUNTER_HZ) / u128::from(tick_hz);
    scaled as u32
}

/// Eight push-pull outputs driven as one port.
#[cfg(target_os = "none")]
pub struct PortLedBar<'d> {
    lights: [Output<'d>; LIGHT_COUNT],
}

#[cfg(target_os = "none")]
impl<'d> PortLedBar<'d> {
    /// Takes ownership of the eight light outputs, leftmost first.
    pub fn new(lights: [Output<'d>; LIGHT_COUNT]) -> Self {
        Self { lights }
    }
}

#[cfg(target_os = "none")]
impl LedBar for PortLedBar<'_> {
    fn write_pattern(&mut self, pattern: u8) {
        for (light, on) in self.lights.iter_mut().zip(light_levels(pattern)) {
            if on {
                light.set_high();
            } else {
                light.set_low();
            }
        }
    }
}
