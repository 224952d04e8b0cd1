//! Eight-light progress bar for the current major unit.
//!
//! The intermediate units travelled since the bar last wrapped are split into
//! eight bands of `eighth_threshold` units. Level `k` lights while the residue
//! sits in `((k - 1) * band, k * band]`; one unit past the eighth band the bar
//! wraps to dark and the residue restarts at zero.

use crate::config::OdometerConfig;
use crate::distance::DistanceState;

/// Number of lights on the bar.
pub const LIGHT_COUNT: u8 = 8;

/// Port pattern for each level, bit 7 is the leftmost light.
///
/// Level 7 drives `0b0111_1110` on the reference board; kept as-is so the bar
/// matches that hardware light for light.
pub const LEVEL_PATTERNS: [u8; LIGHT_COUNT as usize + 1] = [
    0b0000_0000,
    0b1000_0000,
    0b1100_0000,
    0b1110_0000,
    0b1111_0000,
    0b1111_1000,
    0b1111_1100,
    0b0111_1110,
    0b1111_1111,
];

/// Splits a port pattern into per-light states, leftmost (bit 7) first.
#[must_use]
pub fn light_levels(pattern: u8) -> [bool; LIGHT_COUNT as usize] {
    core::array::from_fn(|index| pattern & (0x80 >> index) != 0)
}

/// Illumination level, `0` (dark) through [`LIGHT_COUNT`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct DisplayLevel(u8);

impl DisplayLevel {
    pub const OFF: Self = Self(0);
    pub const FULL: Self = Self(LIGHT_COUNT);

    /// Builds a level, rejecting values past [`LIGHT_COUNT`].
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        if level <= LIGHT_COUNT {
            Some(Self(level))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Port pattern driven for this level.
    #[must_use]
    pub const fn pattern(self) -> u8 {
        LEVEL_PATTERNS[self.0 as usize]
    }
}

/// Output lines behind the progress bar.
pub trait LedBar {
    /// Drives all eight lights at once; bit 7 is the leftmost light.
    fn write_pattern(&mut self, pattern: u8);
}

/// Bar that discards every pattern.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopLedBar;

impl NoopLedBar {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LedBar for NoopLedBar {
    fn write_pattern(&mut self, _: u8) {}
}

/// Result of evaluating the bar for one cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DisplayFrame {
    pub level: DisplayLevel,
    pub pattern: u8,
    /// The residue passed the last band and was reset this cycle.
    pub wrapped: bool,
}

/// Maps the display residue onto a [`DisplayLevel`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DisplayMapper {
    band: u16,
}

impl DisplayMapper {
    #[must_use]
    pub const fn new(config: &OdometerConfig) -> Self {
        Self {
            band: config.eighth_threshold,
        }
    }

    /// Level for `residue`, or `None` once it has passed the last band.
    #[must_use]
    pub fn level_for(&self, residue: u16) -> Option<DisplayLevel> {
        if residue == 0 {
            return Some(DisplayLevel::OFF);
        }
        if self.band == 0 {
            return None;
        }
        let band = u32::from(self.band);
        let level = (u32::from(residue) - 1) / band + 1;
        u8::try_from(level).ok().and_then(DisplayLevel::new)
    }

    /// Evaluates the bar for the current state, applying the wrap reset.
    pub fn update(&self, state: &mut DistanceState) -> DisplayFrame {
        match self.level_for(state.display_residue()) {
            Some(level) => DisplayFrame {
                level,
                pattern: level.pattern(),
                wrapped: false,
            },
            None => {
                state.clear_display_residue();
                DisplayFrame {
                    level: DisplayLevel::OFF,
                    pattern: DisplayLevel::OFF.pattern(),
                    wrapped: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_map_to_expected_levels() {
        let mapper = DisplayMapper::new(&OdometerConfig::BICYCLE);
        assert_eq!(mapper.level_for(0), Some(DisplayLevel::OFF));
        assert_eq!(mapper.level_for(1), DisplayLevel::new(1));
        assert_eq!(mapper.level_for(660), DisplayLevel::new(1));
        assert_eq!(mapper.level_for(661), DisplayLevel::new(2));
        assert_eq!(mapper.level_for(4_620), DisplayLevel::new(7));
        assert_eq!(mapper.level_for(5_280), Some(DisplayLevel::FULL));
        assert_eq!(mapper.level_for(5_281), None);
        assert_eq!(mapper.level_for(u16::MAX), None);
    }

    #[test]
    fn patterns_follow_reference_table() {
        let patterns: [u8; 9] = core::array::from_fn(|level| {
            DisplayLevel::new(level as u8).map_or(0xAA, DisplayLevel::pattern)
        });
        assert_eq!(patterns, LEVEL_PATTERNS);
        assert_eq!(DisplayLevel::new(7).map(DisplayLevel::pattern), Some(0x7E));
        assert_eq!(DisplayLevel::new(9), None);
    }

    #[test]
    fn light_levels_read_left_to_right() {
        assert_eq!(light_levels(0), [false; LIGHT_COUNT as usize]);
        assert_eq!(
            light_levels(0b1100_0000),
            [true, true, false, false, false, false, false, false]
        );
        assert_eq!(
            light_levels(0b0111_1110),
            [false, true, true, true, true, true, true, false]
        );
    }

    #[test]
    fn update_clears_residue_only_on_wrap() {
        let mapper = DisplayMapper::new(&OdometerConfig::new(12, 12, 16, 2));
        let accumulator = crate::DistanceAccumulator::new(&OdometerConfig::new(12, 12, 16, 2));
        let mut state = DistanceState::new();
        let mut bar = NoopLedBar::new();

        for _ in 0..16 {
            accumulator.accumulate(&mut state);
            let frame = mapper.update(&mut state);
            assert!(!frame.wrapped);
            bar.write_pattern(frame.pattern);
        }
        assert_eq!(state.display_residue(), 16);

        accumulator.accumulate(&mut state);
        let frame = mapper.update(&mut state);
        assert!(frame.wrapped);
        assert_eq!(frame.level, DisplayLevel::OFF);
        assert_eq!(frame.pattern, 0);
        assert_eq!(state.display_residue(), 0);

        let again = mapper.update(&mut state);
        assert!(!again.wrapped);
        assert_eq!(again.level, DisplayLevel::OFF);
    }
}
