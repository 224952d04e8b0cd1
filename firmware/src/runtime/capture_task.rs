use embassy_stm32::exti::ExtiInput;
use odometer_core::{CaptureOutcome, PulseCapture};

use super::PULSE_READY;
use crate::hw::counter::FreeRunningCounter;
use crate::status;

/// Runs at interrupt priority: latches the counter and wakes the main loop, nothing else.
#[embassy_executor::task]
pub async fn run(mut sensor: ExtiInput<'static>, capture: PulseCapture<'static>) -> ! {
    let counter = FreeRunningCounter::new();

    loop {
        sensor.wait_for_any_edge().await;

        let outcome = capture.on_edge_with(sensor.is_low(), &counter);
        status::record_capture(outcome);
        if outcome != CaptureOutcome::Ignored {
            PULSE_READY.signal(());
        }
    }
}
