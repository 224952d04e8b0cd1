//! Main-loop context: owns all odometer state and runs one cycle per pulse.
//!
//! [`Odometer`] is the only writer of [`DistanceState`]. The capture context
//! reaches it exclusively through the [`PulseMailbox`](crate::PulseMailbox),
//! whose receiving half lives here.

use crate::capture::{ElapsedCounter, PulseEvent, PulseReceiver};
use crate::config::{ConfigError, OdometerConfig};
use crate::display::{DisplayMapper, LedBar};
use crate::distance::{DistanceAccumulator, DistanceState};
use crate::report::CycleReport;
use crate::speed::{SpeedEstimator, SpeedSample};

/// Measurement pipeline bound to one pulse mailbox.
pub struct Odometer<'a> {
    config: OdometerConfig,
    state: DistanceState,
    accumulator: DistanceAccumulator,
    estimator: SpeedEstimator,
    mapper: DisplayMapper,
    receiver: PulseReceiver<'a>,
    cycles: u32,
}

impl<'a> Odometer<'a> {
    /// Validates `config` and builds a zeroed odometer.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`OdometerConfig::validate`].
    pub fn new(config: OdometerConfig, receiver: PulseReceiver<'a>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: DistanceState::new(),
            accumulator: DistanceAccumulator::new(&config),
            estimator: SpeedEstimator::new(&config),
            mapper: DisplayMapper::new(&config),
            receiver,
            cycles: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &OdometerConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &DistanceState {
        &self.state
    }

    /// Number of computation cycles completed since power-on.
    #[must_use]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Returns `true` when a pulse is waiting in the mailbox.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.receiver.is_pending()
    }

    /// Consumes a pending pulse, if any, and runs one computation cycle.
    ///
    /// The counter is reset after the cycle so the next capture measures the
    /// interval from the end of this cycle.
    pub fn poll<C, L>(&mut self, counter: &C, leds: &mut L) -> Option<CycleReport>
    where
        C: ElapsedCounter,
        L: LedBar,
    {
        let event = self.receiver.try_take()?;
        let report = self.run_cycle(event, leds);
        counter.reset();
        Some(report)
    }

    fn run_cycle<L: LedBar>(&mut self, event: PulseEvent, leds: &mut L) -> CycleReport {
        self.accumulator.accumulate(&mut self.state);
        let speed = SpeedSample::from(self.estimator.estimate(event.captured_time));

        let frame = self.mapper.update(&mut self.state);
        leds.write_pattern(frame.pattern);

        self.cycles = self.cycles.wrapping_add(1);

        CycleReport {
            inches: self.state.subunit_residue(),
            feet: self.state.intermediate_total(),
            miles: self.state.major_total(),
            speed,
            level: frame.level,
            pattern: frame.pattern,
        }
    }
}
