//! Pulse capture handoff between the sensor interrupt and the main loop.
//!
//! The interrupt side owns nothing but a [`PulseCapture`] handle: it may latch
//! a timestamp and raise the pending flag, both in one atomic store. The main
//! loop drains the slot through a [`PulseReceiver`]. The slot holds a single
//! event; a second capture before the main loop drains it replaces the first.

use portable_atomic::{AtomicU64, Ordering};

/// Slot value meaning "no pulse pending".
const EMPTY: u64 = 0;

/// A single sensor detection, in time units since the last counter reset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseEvent {
    pub captured_time: u32,
}

/// Result of presenting an edge to [`PulseCapture::on_edge`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaptureOutcome {
    /// The sensor line was not at its active level; nothing was latched.
    Ignored,
    /// The timestamp was latched into an empty slot.
    Latched,
    /// The timestamp replaced a pulse the main loop had not consumed yet.
    Overwrote,
}

/// Free-running elapsed-time counter shared by the capture path and the main loop.
///
/// Implementations read from interrupt context and are reset from the main
/// loop, so both operations take `&self`.
pub trait ElapsedCounter {
    /// Returns the raw counter value (before the capture prescale).
    fn raw(&self) -> u32;

    /// Restarts the counter from zero.
    fn reset(&self);
}

/// Single-slot, overwrite-on-full mailbox for pulse timestamps.
///
/// The timestamp and the pending flag share one 64-bit atomic: `0` is empty,
/// any other value is `captured_time + 1`.
pub struct PulseMailbox {
    slot: AtomicU64,
}

impl PulseMailbox {
    /// Creates an empty mailbox.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: AtomicU64::new(EMPTY),
        }
    }

    /// Returns the latch-only handle for the interrupt context.
    #[must_use]
    pub const fn capture(&self, prescale_shift: u8) -> PulseCapture<'_> {
        PulseCapture {
            mailbox: self,
            prescale_shift,
        }
    }

    /// Returns the take-only handle for the main loop.
    #[must_use]
    pub const fn receiver(&self) -> PulseReceiver<'_> {
        PulseReceiver { mailbox: self }
    }

    /// Returns `true` when a pulse is waiting to be consumed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Acquire) != EMPTY
    }

    fn post(&self, captured_time: u32) -> bool {
        let previous = self.slot.swap(encode(captured_time), Ordering::AcqRel);
        previous != EMPTY
    }

    fn take(&self) -> Option<PulseEvent> {
        decode(self.slot.swap(EMPTY, Ordering::AcqRel))
    }
}

impl Default for PulseMailbox {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(captured_time: u32) -> u64 {
    u64::from(captured_time) + 1
}

fn decode(raw: u64) -> Option<PulseEvent> {
    if raw == EMPTY {
        return None;
    }
    let captured_time = u32::try_from(raw - 1).ok()?;
    Some(PulseEvent { captured_time })
}

/// Interrupt-side handle: latches timestamps, never touches odometer state.
#[derive(Copy, Clone)]
pub struct PulseCapture<'a> {
    mailbox: &'a PulseMailbox,
    prescale_shift: u8,
}

impl PulseCapture<'_> {
    /// Handles one sensor line change.
    ///
    /// `line_active` is the sensor level sampled on interrupt entry and
    /// `raw_counter` the free-running counter at the same instant. Bounded
    /// time, no blocking.
    pub fn on_edge(&self, line_active: bool, raw_counter: u32) -> CaptureOutcome {
        if !line_active {
            return CaptureOutcome::Ignored;
        }

        let captured_time = raw_counter.checked_shr(u32::from(self.prescale_shift)).unwrap_or(0);
        if self.mailbox.post(captured_time) {
            CaptureOutcome::Overwrote
        } else {
            CaptureOutcome::Latched
        }
    }

    /// Samples `counter` and handles the edge in one call.
    pub fn on_edge_with<C: ElapsedCounter>(
        &self,
        line_active: bool,
        counter: &C,
    ) -> CaptureOutcome {
        if !line_active {
            return CaptureOutcome::Ignored;
        }
        self.on_edge(true, counter.raw())
    }
}

/// Main-loop handle: consumes at most one pending pulse per call.
pub struct PulseReceiver<'a> {
    mailbox: &'a PulseMailbox,
}

impl PulseReceiver<'_> {
    /// Takes the pending pulse, clearing the slot.
    pub fn try_take(&mut self) -> Option<PulseEvent> {
        self.mailbox.take()
    }

    /// Returns `true` when a pulse is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.mailbox.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_edges_are_ignored() {
        let mailbox = PulseMailbox::new();
        let capture = mailbox.capture(4);

        assert_eq!(capture.on_edge(false, 1_600), CaptureOutcome::Ignored);
        assert!(!mailbox.is_pending());
    }

    #[test]
    fn capture_applies_prescale_shift() {
        let mailbox = PulseMailbox::new();
        let capture = mailbox.capture(4);
        let mut receiver = mailbox.receiver();

        assert_eq!(capture.on_edge(true, 16_000), CaptureOutcome::Latched);
        assert_eq!(
            receiver.try_take(),
            Some(PulseEvent {
                captured_time: 1_000
            })
        );
        assert_eq!(receiver.try_take(), None);
    }

    #[test]
    fn zero_timestamp_is_distinct_from_empty() {
        let mailbox = PulseMailbox::new();
        let capture = mailbox.capture(0);
        let mut receiver = mailbox.receiver();

        capture.on_edge(true, 0);
        assert!(receiver.is_pending());
        assert_eq!(receiver.try_take(), Some(PulseEvent { captured_time: 0 }));
    }

    #[test]
    fn full_width_timestamp_survives_encoding() {
        let mailbox = PulseMailbox::new();
        let capture = mailbox.capture(0);
        let mut receiver = mailbox.receiver();

        capture.on_edge(true, u32::MAX);
        assert_eq!(
            receiver.try_take(),
            Some(PulseEvent {
                captured_time: u32::MAX
            })
        );
    }

    #[test]
    fn second_capture_overwrites_pending_pulse() {
        let mailbox = PulseMailbox::new();
        let capture = mailbox.capture(0);
        let mut receiver = mailbox.receiver();

        assert_eq!(capture.on_edge(true, 400), CaptureOutcome::Latched);
        assert_eq!(capture.on_edge(true, 900), CaptureOutcome::Overwrote);
        assert_eq!(receiver.try_take(), Some(PulseEvent { captured_time: 900 }));
        assert_eq!(receiver.try_take(), None);
    }
}
