//! Compile-time configuration for the odometer pipeline.
//!
//! Every factor the pipeline needs is fixed at build time. [`OdometerConfig`]
//! groups the wheel circumference, the three-tier unit conversion factors, the
//! display band width, and the timing scale used by the speed path so the
//! firmware and emulator share one definition.

use core::fmt;

use crate::display::LIGHT_COUNT;

/// Wheel and unit parameters shared by every pipeline stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdometerConfig {
    /// Linear distance covered by one pulse, in sub-units (inches).
    pub circumference: u16,
    /// Sub-units folded into one intermediate unit (inches per foot).
    pub subunits_per_intermediate: u16,
    /// Intermediate units folded into one major unit (feet per mile).
    pub intermediates_per_major: u16,
    /// Width of one display band, in intermediate units.
    pub eighth_threshold: u16,
    /// Right shift applied to the raw counter when a pulse is captured.
    pub prescale_shift: u8,
    /// Captured time units in one hour (milliseconds per hour).
    pub time_units_per_hour: f32,
}

impl OdometerConfig {
    /// Reference bicycle wheel: 88 in circumference, inches/feet/miles, ms timing.
    pub const BICYCLE: Self = Self::new(88, 12, 5_280, 660);

    /// Builds a configuration with the default timing scale (shift of 4, ms units).
    #[must_use]
    pub const fn new(
        circumference: u16,
        subunits_per_intermediate: u16,
        intermediates_per_major: u16,
        eighth_threshold: u16,
    ) -> Self {
        Self {
            circumference,
            subunits_per_intermediate,
            intermediates_per_major,
            eighth_threshold,
            prescale_shift: 4,
            time_units_per_hour: 3_600_000.0,
        }
    }

    /// Overrides the capture prescale and the number of time units per hour.
    #[must_use]
    pub const fn with_timing(mut self, prescale_shift: u8, time_units_per_hour: f32) -> Self {
        self.prescale_shift = prescale_shift;
        self.time_units_per_hour = time_units_per_hour;
        self
    }

    /// Sub-units in one major unit (inches per mile).
    #[must_use]
    pub const fn subunits_per_major(&self) -> u32 {
        self.subunits_per_intermediate as u32 * self.intermediates_per_major as u32
    }

    /// Checks that no factor would stall the carry chain or divide by zero.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.circumference == 0 {
            return Err(ConfigError::ZeroCircumference);
        }
        if self.subunits_per_intermediate == 0 || self.intermediates_per_major == 0 {
            return Err(ConfigError::ZeroConversionFactor);
        }
        if self.eighth_threshold == 0 {
            return Err(ConfigError::ZeroDisplayBand);
        }
        // The display residue is a u16; all eight bands must fit below its wrap.
        if u32::from(self.eighth_threshold) * u32::from(LIGHT_COUNT) > u32::from(u16::MAX) {
            return Err(ConfigError::DisplayBandTooWide);
        }
        if self.prescale_shift >= 32 {
            return Err(ConfigError::PrescaleTooWide);
        }
        if self.time_units_per_hour.is_nan() || self.time_units_per_hour <= 0.0 {
            return Err(ConfigError::InvalidTimeScale);
        }
        Ok(())
    }
}

impl Default for OdometerConfig {
    fn default() -> Self {
        Self::BICYCLE
    }
}

/// Reasons a configuration is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A pulse would cover no distance.
    ZeroCircumference,
    /// Inches per foot or feet per mile is zero.
    ZeroConversionFactor,
    /// The display band has no width.
    ZeroDisplayBand,
    /// Eight display bands exceed the range of the display residue.
    DisplayBandTooWide,
    /// The capture shift would discard the whole counter.
    PrescaleTooWide,
    /// Time units per hour is zero, negative or NaN.
    InvalidTimeScale,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCircumference => f.write_str("circumference must be non-zero"),
            ConfigError::ZeroConversionFactor => {
                f.write_str("unit conversion factors must be non-zero")
            }
            ConfigError::ZeroDisplayBand => f.write_str("display band width must be non-zero"),
            ConfigError::DisplayBandTooWide => f.write_str("display bands overflow 16 bits"),
            ConfigError::PrescaleTooWide => f.write_str("prescale shift must be below 32"),
            ConfigError::InvalidTimeScale => f.write_str("time units per hour must be positive"),
        }
    }
}
