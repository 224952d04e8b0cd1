//! Instantaneous speed from the interval between two pulses.

use core::fmt;

use crate::config::OdometerConfig;

/// Errors produced by [`SpeedEstimator::estimate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SpeedError {
    /// Two pulses landed in the same time unit (bounce or coalesced capture).
    ZeroElapsed,
}

impl fmt::Display for SpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedError::ZeroElapsed => f.write_str("zero elapsed time between pulses"),
        }
    }
}

/// Speed in major units per hour (mph).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Speed(f32);

impl Speed {
    /// Wraps a raw major-units-per-hour value.
    #[must_use]
    pub const fn from_per_hour(value: f32) -> Self {
        Self(value)
    }

    /// Returns the speed in major units per hour.
    #[must_use]
    pub const fn per_hour(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Outcome of one cycle's speed estimate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SpeedSample {
    Measured(Speed),
    /// No defined speed this cycle (zero elapsed time).
    Unknown,
}

impl SpeedSample {
    /// Returns the measured speed, if any.
    #[must_use]
    pub const fn speed(self) -> Option<Speed> {
        match self {
            SpeedSample::Measured(speed) => Some(speed),
            SpeedSample::Unknown => None,
        }
    }
}

impl From<Result<Speed, SpeedError>> for SpeedSample {
    fn from(result: Result<Speed, SpeedError>) -> Self {
        match result {
            Ok(speed) => SpeedSample::Measured(speed),
            Err(SpeedError::ZeroElapsed) => SpeedSample::Unknown,
        }
    }
}

impl fmt::Display for SpeedSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedSample::Measured(speed) => speed.fmt(f),
            SpeedSample::Unknown => f.write_str("--"),
        }
    }
}

/// Converts elapsed time units into speed.
///
/// `speed = circumference * (time_units_per_hour / subunits_per_major) / elapsed`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedEstimator {
    scale: f32,
}

impl SpeedEstimator {
    /// Precomputes the constant numerator for `config`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(config: &OdometerConfig) -> Self {
        let per_subunit = config.time_units_per_hour / config.subunits_per_major() as f32;
        Self {
            scale: f32::from(config.circumference) * per_subunit,
        }
    }

    /// Estimates speed over `elapsed` time units since the previous pulse.
    ///
    /// # Errors
    ///
    /// Returns [`SpeedError::ZeroElapsed`] when `elapsed` is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate(&self, elapsed: u32) -> Result<Speed, SpeedError> {
        if elapsed == 0 {
            return Err(SpeedError::ZeroElapsed);
        }
        Ok(Speed(self.scale / elapsed as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f32, expected: f32) -> bool {
        let delta = actual - expected;
        delta > -1e-3 && delta < 1e-3
    }

    #[test]
    fn one_second_per_revolution_is_five_mph() {
        let estimator = SpeedEstimator::new(&OdometerConfig::BICYCLE);
        let speed = estimator.estimate(1_000).expect("non-zero elapsed");
        assert!(close(speed.per_hour(), 5.0), "got {}", speed.per_hour());
    }

    #[test]
    fn zero_elapsed_is_rejected() {
        let estimator = SpeedEstimator::new(&OdometerConfig::BICYCLE);
        assert_eq!(estimator.estimate(0), Err(SpeedError::ZeroElapsed));
        assert_eq!(
            SpeedSample::from(estimator.estimate(0)),
            SpeedSample::Unknown
        );
    }

    #[test]
    fn unknown_sample_has_no_speed() {
        assert_eq!(SpeedSample::Unknown.speed(), None);
        let measured = SpeedSample::Measured(Speed::from_per_hour(12.5));
        assert_eq!(measured.speed(), Some(Speed::from_per_hour(12.5)));
    }
}
