use std::cell::Cell;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant as HostInstant};

use odometer_core::{
    BANNER, CaptureOutcome, ConfigError, CycleReport, ElapsedCounter, LedBar, Odometer,
    OdometerConfig, PulseCapture, PulseMailbox, light_levels,
};

use crate::command::{Command, parse_command};

pub const HELP_TOPICS: &[&str] = &[
    "pulse <ms>            - one sensor pulse <ms> after the previous cycle",
    "ride <count> <ms>     - <count> pulses at a steady <ms> interval",
    "burst <ms> <ms>       - two pulses before the main loop runs once",
    "glitch                - edge with the sensor line inactive",
    "status                - odometer totals and capture counters",
    "help                  - show this list",
];

/// Counter advanced by the emulator instead of a hardware timer.
struct SimulatedCounter {
    ticks: Cell<u32>,
    prescale_shift: u8,
}

impl SimulatedCounter {
    fn new(prescale_shift: u8) -> Self {
        Self {
            ticks: Cell::new(0),
            prescale_shift,
        }
    }

    /// Advances by `ms` captured time units, expressed in raw ticks.
    fn advance_ms(&self, ms: u32) {
        let raw = ms.checked_shl(u32::from(self.prescale_shift)).unwrap_or(0);
        self.ticks.set(self.ticks.get().wrapping_add(raw));
    }
}

impl ElapsedCounter for SimulatedCounter {
    fn raw(&self) -> u32 {
        self.ticks.get()
    }

    fn reset(&self) {
        self.ticks.set(0);
    }
}

/// Remembers the last pattern so `status` can redraw the bar.
#[derive(Default)]
struct TerminalLedBar {
    pattern: u8,
}

impl LedBar for TerminalLedBar {
    fn write_pattern(&mut self, pattern: u8) {
        self.pattern = pattern;
    }
}

#[derive(Default)]
struct CaptureCounters {
    accepted: u32,
    ignored: u32,
    dropped: u32,
}

impl CaptureCounters {
    fn record(&mut self, outcome: CaptureOutcome) {
        match outcome {
            CaptureOutcome::Ignored => self.ignored = self.ignored.wrapping_add(1),
            CaptureOutcome::Latched => self.accepted = self.accepted.wrapping_add(1),
            CaptureOutcome::Overwrote => {
                self.accepted = self.accepted.wrapping_add(1);
                self.dropped = self.dropped.wrapping_add(1);
            }
        }
    }
}

pub struct Session {
    odometer: Odometer<'static>,
    capture: PulseCapture<'static>,
    counter: SimulatedCounter,
    leds: TerminalLedBar,
    counters: CaptureCounters,
    transcript: Option<TranscriptLogger>,
    started_at: HostInstant,
}

impl Session {
    /// Builds a session around a fresh odometer.
    pub fn new(config: OdometerConfig) -> Result<Self, ConfigError> {
        // One mailbox per session, alive for the rest of the process like the firmware's static.
        let mailbox: &'static PulseMailbox = Box::leak(Box::new(PulseMailbox::new()));
        let odometer = Odometer::new(config, mailbox.receiver())?;

        Ok(Self {
            odometer,
            capture: mailbox.capture(config.prescale_shift),
            counter: SimulatedCounter::new(config.prescale_shift),
            leds: TerminalLedBar::default(),
            counters: CaptureCounters::default(),
            transcript: None,
            started_at: HostInstant::now(),
        })
    }

    /// Mirrors every command and response into `path`.
    pub fn with_transcript(mut self, path: &Path) -> io::Result<Self> {
        self.transcript = Some(TranscriptLogger::new(path)?);
        Ok(self)
    }

    /// Banner lines shown before the first prompt.
    pub fn banner(&self) -> Vec<String> {
        let config = self.odometer.config();
        vec![
            BANNER.trim_end().to_string(),
            format!(
                "wheel {}in, {}in/ft, {}ft/mi, light band {}ft",
                config.circumference,
                config.subunits_per_intermediate,
                config.intermediates_per_major,
                config.eighth_threshold
            ),
        ]
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Vec<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let elapsed = self.started_at.elapsed();
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.append_line(elapsed, TranscriptRole::Host, trimmed)?;
        }

        let lines = match parse_command(trimmed) {
            Ok(command) => self.execute(command),
            Err(err) => vec![format!("ERR syntax {err}"), "Type `help` for commands.".into()],
        };

        if let Some(transcript) = self.transcript.as_mut() {
            for response in &lines {
                transcript.append_line(elapsed, TranscriptRole::Device, response)?;
            }
        }
        Ok(lines)
    }

    pub fn execute(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Pulse { after_ms } => self.pulse(after_ms),
            Command::Ride {
                pulses,
                interval_ms,
            } => self.ride(pulses, interval_ms),
            Command::Burst {
                first_ms,
                second_ms,
            } => self.burst(first_ms, second_ms),
            Command::Glitch => self.glitch(),
            Command::Status => self.status(),
            Command::Help => HELP_TOPICS.iter().map(|line| (*line).to_string()).collect(),
        }
    }

    fn edge(&mut self, after_ms: u32, line_active: bool) -> CaptureOutcome {
        self.counter.advance_ms(after_ms);
        let outcome = self.capture.on_edge_with(line_active, &self.counter);
        self.counters.record(outcome);
        outcome
    }

    fn run_main_loop(&mut self) -> Option<CycleReport> {
        self.odometer.poll(&self.counter, &mut self.leds)
    }

    fn pulse(&mut self, after_ms: u32) -> Vec<String> {
        self.edge(after_ms, true);
        match self.run_main_loop() {
            Some(report) => render_report(&report),
            None => vec!["no pulse pending".to_string()],
        }
    }

    fn ride(&mut self, pulses: u32, interval_ms: u32) -> Vec<String> {
        let mut last = None;
        for _ in 0..pulses {
            self.edge(interval_ms, true);
            if let Some(report) = self.run_main_loop() {
                last = Some(report);
            }
        }

        match last {
            Some(report) => {
                let mut lines = vec![format!(
                    "ride: {pulses} pulses, {} cycles total",
                    self.odometer.cycles()
                )];
                lines.extend(render_report(&report));
                lines
            }
            None => vec!["ride: nothing to do".to_string()],
        }
    }

    fn burst(&mut self, first_ms: u32, second_ms: u32) -> Vec<String> {
        self.edge(first_ms, true);
        let second = self.edge(second_ms, true);

        let mut lines = Vec::new();
        if second == CaptureOutcome::Overwrote {
            lines.push("burst: first pulse overwritten before the main loop ran".to_string());
        }
        if let Some(report) = self.run_main_loop() {
            lines.extend(render_report(&report));
        }
        lines
    }

    fn glitch(&mut self) -> Vec<String> {
        let outcome = self.edge(0, false);
        debug_assert_eq!(outcome, CaptureOutcome::Ignored);
        match self.run_main_loop() {
            Some(report) => render_report(&report),
            None => vec!["glitch: edge ignored, sensor line inactive".to_string()],
        }
    }

    fn status(&self) -> Vec<String> {
        let state = self.odometer.state();
        vec![
            format!(
                "distance: {}mi {}ft {}in",
                state.major_total(),
                state.intermediate_total(),
                state.subunit_residue()
            ),
            format!(
                "display: residue={}ft bar {}",
                state.display_residue(),
                render_bar(self.leds.pattern)
            ),
            format!(
                "capture: cycles={} accepted={} ignored={} dropped={}",
                self.odometer.cycles(),
                self.counters.accepted,
                self.counters.ignored,
                self.counters.dropped
            ),
        ]
    }
}

/// Console text of `report`, split into lines, followed by the bar.
fn render_report(report: &CycleReport) -> Vec<String> {
    let text = report.to_string();
    let mut lines: Vec<String> = text
        .split("\r\n")
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    lines.push(format!("Lights: {}", render_bar(report.pattern)));
    lines
}

/// Draws the bar leftmost light first: `#` lit, `.` dark.
fn render_bar(pattern: u8) -> String {
    let lights: String = light_levels(pattern)
        .into_iter()
        .map(|on| if on { '#' } else { '.' })
        .collect();
    format!("[{lights}]")
}

#[derive(Clone, Copy)]
enum TranscriptRole {
    Host,
    Device,
}

impl TranscriptRole {
    fn prefix(self) -> &'static str {
        match self {
            TranscriptRole::Host => ">",
            TranscriptRole::Device => "<",
        }
    }
}

struct TranscriptLogger {
    writer: BufWriter<fs::File>,
}

impl TranscriptLogger {
    fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "Odometer emulator transcript")?;
        writer.flush()?;
        Ok(Self { writer })
    }

    fn append_line(
        &mut self,
        elapsed: Duration,
        role: TranscriptRole,
        line: &str,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "[+{:>6}ms] {} {}",
            elapsed.as_millis(),
            role.prefix(),
            line
        )?;
        self.writer.flush()
    }
}
