//! Emulator command grammar.
//!
//! Commands are short, single-line, and case-insensitive:
//!
//! ```text
//! pulse <ms>            one sensor pulse <ms> after the previous cycle
//! ride <count> <ms>     <count> pulses at a steady <ms> interval
//! burst <ms> <ms>       two pulses before the main loop runs once
//! glitch                an edge with the sensor line inactive
//! status                odometer totals and capture counters
//! help                  command summary
//! ```
//!
//! Durations accept an optional `ms` suffix.

use core::fmt;

use winnow::ascii::{Caseless, digit1, space0, space1};
use winnow::combinator::{alt, eof, opt, preceded, terminated};
use winnow::prelude::*;

/// Parsed emulator command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Pulse { after_ms: u32 },
    Ride { pulses: u32, interval_ms: u32 },
    Burst { first_ms: u32, second_ms: u32 },
    Glitch,
    Status,
    Help,
}

/// Rejected command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub offset: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized input at column {}", self.offset + 1)
    }
}

/// Parses one command line, ignoring surrounding whitespace.
pub fn parse_command(line: &str) -> Result<Command, SyntaxError> {
    command.parse(line.trim()).map_err(|err| SyntaxError {
        offset: err.offset(),
    })
}

fn command(input: &mut &str) -> ModalResult<Command> {
    terminated(alt((pulse, ride, burst, keyword)), (space0, eof)).parse_next(input)
}

fn pulse(input: &mut &str) -> ModalResult<Command> {
    preceded((Caseless("pulse"), space1), millis)
        .map(|after_ms| Command::Pulse { after_ms })
        .parse_next(input)
}

fn ride(input: &mut &str) -> ModalResult<Command> {
    preceded((Caseless("ride"), space1), (count, space1, millis))
        .map(|(pulses, _, interval_ms)| Command::Ride {
            pulses,
            interval_ms,
        })
        .parse_next(input)
}

fn burst(input: &mut &str) -> ModalResult<Command> {
    preceded((Caseless("burst"), space1), (millis, space1, millis))
        .map(|(first_ms, _, second_ms)| Command::Burst {
            first_ms,
            second_ms,
        })
        .parse_next(input)
}

fn keyword(input: &mut &str) -> ModalResult<Command> {
    alt((
        Caseless("glitch").value(Command::Glitch),
        Caseless("status").value(Command::Status),
        Caseless("help").value(Command::Help),
    ))
    .parse_next(input)
}

fn count(input: &mut &str) -> ModalResult<u32> {
    digit1.parse_to().parse_next(input)
}

fn millis(input: &mut &str) -> ModalResult<u32> {
    terminated(count, opt(Caseless("ms"))).parse_next(input)
}
