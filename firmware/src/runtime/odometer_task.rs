use embassy_futures::select::{Either, select};
use embassy_stm32::usart::BufferedUartTx;
use embassy_time::{Duration, Timer};
use odometer_core::{ElapsedCounter, LedBar, Odometer};

use super::PULSE_READY;
use crate::console::Console;
use crate::hw::PortLedBar;
use crate::hw::counter::FreeRunningCounter;
use crate::{status, telemetry};

/// Quiet period after which the capture counters are logged.
const IDLE_HEARTBEAT: Duration = Duration::from_secs(30);

#[embassy_executor::task]
pub async fn run(
    mut odometer: Odometer<'static>,
    mut leds: PortLedBar<'static>,
    mut console: Console<BufferedUartTx<'static>>,
) -> ! {
    let counter = FreeRunningCounter::new();

    leds.write_pattern(0);
    console.write_banner().await;
    let config = *odometer.config();
    telemetry::log_startup(config.circumference, config.eighth_threshold);
    counter.reset();

    loop {
        match select(PULSE_READY.wait(), Timer::after(IDLE_HEARTBEAT)).await {
            Either::First(()) => {
                // The mailbox holds one pulse, so this runs at most one cycle
                // per capture; a stale wake finds it empty.
                while let Some(report) = odometer.poll(&counter, &mut leds) {
                    telemetry::log_cycle(odometer.cycles(), &report);
                    console.write_report(&report).await;
                }
            }
            Either::Second(()) => telemetry::log_capture_counters(status::snapshot()),
        }
    }
}
