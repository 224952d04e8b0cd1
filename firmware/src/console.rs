//! Operator console over the debug UART.
//!
//! Reports are rendered into a bounded buffer first so a formatting overflow
//! never leaves a half-written report on the wire.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use core::fmt::{self, Write as _};

use heapless::String;
use odometer_core::{BANNER, CycleReport};

/// Capacity of one rendered report, comfortably above the longest report.
pub const CONSOLE_LINE_CAPACITY: usize = 192;

/// Rendered console text.
pub type ConsoleText = String<CONSOLE_LINE_CAPACITY>;

/// Renders one cycle report into console text.
pub fn render_report(report: &CycleReport) -> Result<ConsoleText, fmt::Error> {
    let mut text = ConsoleText::new();
    write!(text, "{report}")?;
    Ok(text)
}

/// Renders the startup banner.
pub fn render_banner() -> Result<ConsoleText, fmt::Error> {
    let mut text = ConsoleText::new();
    text.push_str(BANNER).map_err(|_| fmt::Error)?;
    Ok(text)
}

#[cfg(target_os = "none")]
pub use target::Console;

#[cfg(target_os = "none")]
mod target {
    use embassy_time::{Duration, Timer};
    use embedded_io_async::Write;
    use odometer_core::CycleReport;

    use super::{ConsoleText, render_banner, render_report};

    const RETRY_DELAY: Duration = Duration::from_millis(5);

    /// Console writer bound to a UART transmitter.
    pub struct Console<W> {
        tx: W,
    }

    impl<W: Write> Console<W> {
        pub fn new(tx: W) -> Self {
            Self { tx }
        }

        /// Writes the startup banner.
        pub async fn write_banner(&mut self) {
            match render_banner() {
                Ok(text) => self.write_text(&text).await,
                Err(_) => defmt::warn!("console: banner overflow"),
            }
        }

        /// Writes one cycle report; failures are logged and the report dropped.
        pub async fn write_report(&mut self, report: &CycleReport) {
            match render_report(report) {
                Ok(text) => self.write_text(&text).await,
                Err(_) => defmt::warn!("console: report overflow"),
            }
        }

        async fn write_text(&mut self, text: &ConsoleText) {
            if self.tx.write_all(text.as_bytes()).await.is_err() {
                defmt::warn!("console: UART write error");
                Timer::after(RETRY_DELAY).await;
                return;
            }
            if self.tx.flush().await.is_err() {
                defmt::warn!("console: UART flush error");
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use odometer_core::{DisplayLevel, Speed, SpeedSample};

    use super::*;

    #[test]
    fn widest_report_fits_the_buffer() {
        let report = CycleReport {
            inches: u16::MAX,
            feet: u16::MAX,
            miles: u16::MAX,
            // Fastest possible sample: one time unit between pulses.
            speed: SpeedSample::Measured(Speed::from_per_hour(88.0 * 3_600_000.0 / 63_360.0)),
            level: DisplayLevel::FULL,
            pattern: 0xFF,
        };

        let text = render_report(&report).expect("report fits");
        assert!(text.starts_with("\r\nDistance Traveled: \r\n"));
        assert!(text.contains("Current Speed: 5000.0  mph"));
    }

    #[test]
    fn banner_is_rendered_verbatim() {
        assert_eq!(render_banner().unwrap().as_str(), "ODOMETER - - - -\r\n");
    }
}
