//! Console report emitted after every computation cycle.
//!
//! The console is a human-readable stream: labelled lines, no delimiters meant
//! for machines. Field order is inches, feet, miles, then speed.

use core::fmt;

use crate::display::DisplayLevel;
use crate::speed::SpeedSample;

/// Banner written once before the first pulse.
pub const BANNER: &str = "ODOMETER - - - -\r\n";

/// Snapshot of one computation cycle, ready for the console and the light bar.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub inches: u16,
    pub feet: u16,
    pub miles: u16,
    pub speed: SpeedSample,
    pub level: DisplayLevel,
    pub pattern: u8,
}

impl CycleReport {
    /// Adapter that renders only the distance block.
    #[must_use]
    pub const fn distance(&self) -> DistanceLines<'_> {
        DistanceLines(self)
    }

    /// Adapter that renders only the speed line.
    #[must_use]
    pub const fn speed_line(&self) -> SpeedLine<'_> {
        SpeedLine(self)
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.distance().fmt(f)?;
        self.speed_line().fmt(f)
    }
}

/// Distance block of a [`CycleReport`].
pub struct DistanceLines<'a>(&'a CycleReport);

impl fmt::Display for DistanceLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        f.write_str("\r\nDistance Traveled: \r\n")?;
        write!(f, "\tInches: {}", report.inches)?;
        write!(f, "\r\n\tFeet: {}", report.feet)?;
        write!(f, "\r\n\tMiles: {}", report.miles)?;
        f.write_str("\r\n")
    }
}

/// Speed line of a [`CycleReport`].
pub struct SpeedLine<'a>(&'a CycleReport);

impl fmt::Display for SpeedLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\r\nCurrent Speed: {}  mph \r\n", self.0.speed)
    }
}
