//! Cumulative distance and the sub-unit → intermediate → major carry chain.

use crate::config::OdometerConfig;

/// Odometer totals, normalized after every pulse.
///
/// `subunit_residue < subunits_per_intermediate` and
/// `intermediate_total < intermediates_per_major` hold whenever the state is
/// observable outside [`DistanceAccumulator::accumulate`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DistanceState {
    subunit_residue: u16,
    intermediate_total: u16,
    major_total: u16,
    display_residue: u16,
}

impl DistanceState {
    /// State at power-on: nothing travelled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subunit_residue: 0,
            intermediate_total: 0,
            major_total: 0,
            display_residue: 0,
        }
    }

    /// Sub-units not yet folded into an intermediate unit (inches).
    #[must_use]
    pub const fn subunit_residue(&self) -> u16 {
        self.subunit_residue
    }

    /// Intermediate units not yet folded into a major unit (feet).
    #[must_use]
    pub const fn intermediate_total(&self) -> u16 {
        self.intermediate_total
    }

    /// Completed major units (miles).
    #[must_use]
    pub const fn major_total(&self) -> u16 {
        self.major_total
    }

    /// Intermediate units since the display last completed a cycle.
    #[must_use]
    pub const fn display_residue(&self) -> u16 {
        self.display_residue
    }

    /// Total distance expressed in sub-units.
    #[must_use]
    pub fn total_subunits(&self, config: &OdometerConfig) -> u64 {
        u64::from(self.major_total) * u64::from(config.subunits_per_major())
            + u64::from(self.intermediate_total) * u64::from(config.subunits_per_intermediate)
            + u64::from(self.subunit_residue)
    }

    pub(crate) fn clear_display_residue(&mut self) {
        self.display_residue = 0;
    }
}

/// Units carried by a single [`DistanceAccumulator::accumulate`] call.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Carry {
    /// Whole intermediate units produced by the increment.
    pub intermediates: u16,
    /// At least one major unit was completed.
    pub major_rolled: bool,
}

/// Folds per-pulse increments into [`DistanceState`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DistanceAccumulator {
    increment: u16,
    subunits_per_intermediate: u16,
    intermediates_per_major: u16,
}

impl DistanceAccumulator {
    /// Builds an accumulator adding one circumference per pulse.
    #[must_use]
    pub const fn new(config: &OdometerConfig) -> Self {
        Self {
            increment: config.circumference,
            subunits_per_intermediate: config.subunits_per_intermediate,
            intermediates_per_major: config.intermediates_per_major,
        }
    }

    /// Records one pulse: adds the circumference and normalizes the carry chain.
    pub fn accumulate(&self, state: &mut DistanceState) -> Carry {
        self.accumulate_by(state, self.increment)
    }

    /// Adds `increment` sub-units and normalizes the carry chain.
    ///
    /// Both steps loop, so one increment may span several intermediate units
    /// or several major units.
    pub fn accumulate_by(&self, state: &mut DistanceState, increment: u16) -> Carry {
        let mut carry = Carry::default();
        // u32 so neither tier wraps before normalization.
        let mut residue = u32::from(state.subunit_residue) + u32::from(increment);
        let mut intermediates = u32::from(state.intermediate_total);
        let step = u32::from(self.subunits_per_intermediate);
        let per_major = u32::from(self.intermediates_per_major);

        while step > 0 && residue >= step {
            residue -= step;
            intermediates += 1;
            state.display_residue = state.display_residue.wrapping_add(1);
            carry.intermediates = carry.intermediates.wrapping_add(1);
        }

        while per_major > 0 && intermediates >= per_major {
            intermediates -= per_major;
            state.major_total = state.major_total.wrapping_add(1);
            carry.major_rolled = true;
        }

        state.subunit_residue = u16::try_from(residue).unwrap_or(u16::MAX);
        state.intermediate_total = u16::try_from(intermediates).unwrap_or(u16::MAX);
        carry
    }
}
