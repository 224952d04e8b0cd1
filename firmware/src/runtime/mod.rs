use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32 as hal;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::usart::{BufferedUart, Config as UartConfig, DataBits, Parity, StopBits};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use odometer_core::{Odometer, OdometerConfig, PulseMailbox};
use static_cell::StaticCell;

use crate::console::Console;
use crate::hw::PortLedBar;

mod capture_task;
mod odometer_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        cortex_m::interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                cortex_m::interrupt::enable();
            }
        }
    }
}

embassy_stm32::bind_interrupts!(struct ConsoleIrqs {
    USART2_LPUART2 => embassy_stm32::usart::BufferedInterruptHandler<hal::peripherals::USART2>;
});

/// Wheel and unit configuration baked into this build.
pub(super) const CONFIG: OdometerConfig = OdometerConfig::BICYCLE;

const CONSOLE_BAUD: u32 = 9_600;
const CONSOLE_BUFFER_SIZE: usize = 256;

/// Single-slot handoff between the capture task and the main loop.
pub(super) static PULSE_MAILBOX: PulseMailbox = PulseMailbox::new();
/// Wakes the main loop after a capture; the mailbox carries the data.
pub(super) static PULSE_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static CAPTURE_EXECUTOR: InterruptExecutor = InterruptExecutor::new();
static UART_TX_BUFFER: StaticCell<[u8; CONSOLE_BUFFER_SIZE]> = StaticCell::new();
static UART_RX_BUFFER: StaticCell<[u8; CONSOLE_BUFFER_SIZE]> = StaticCell::new();

// SPI1 is unused on this board; its vector runs the capture executor.
#[interrupt]
unsafe fn SPI1() {
    unsafe { CAPTURE_EXECUTOR.on_interrupt() }
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        EXTI0,
        PA2,
        PA3,
        PB0,
        PB1,
        PB2,
        PB3,
        PB4,
        PB5,
        PB6,
        PB7,
        USART2,
        ..
    } = hal::init(config);

    // Hall sensor pulls the line low while the magnet passes.
    let sensor = ExtiInput::new(PA0, EXTI0, Pull::Up);

    let leds = PortLedBar::new([
        Output::new(PB7, Level::Low, Speed::Low),
        Output::new(PB6, Level::Low, Speed::Low),
        Output::new(PB5, Level::Low, Speed::Low),
        Output::new(PB4, Level::Low, Speed::Low),
        Output::new(PB3, Level::Low, Speed::Low),
        Output::new(PB2, Level::Low, Speed::Low),
        Output::new(PB1, Level::Low, Speed::Low),
        Output::new(PB0, Level::Low, Speed::Low),
    ]);

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = CONSOLE_BAUD;
    uart_config.data_bits = DataBits::DataBits8;
    uart_config.stop_bits = StopBits::STOP1;
    uart_config.parity = Parity::ParityNone;

    let uart = BufferedUart::new(
        USART2,
        PA3,
        PA2,
        UART_TX_BUFFER.init([0; CONSOLE_BUFFER_SIZE]),
        UART_RX_BUFFER.init([0; CONSOLE_BUFFER_SIZE]),
        ConsoleIrqs,
        uart_config,
    )
    .expect("failed to initialize console UART");
    let (uart_tx, _uart_rx) = uart.split();

    let odometer =
        Odometer::new(CONFIG, PULSE_MAILBOX.receiver()).expect("invalid odometer configuration");

    interrupt::SPI1.set_priority(Priority::P1);
    let capture_spawner = CAPTURE_EXECUTOR.start(interrupt::SPI1);
    capture_spawner
        .spawn(capture_task::run(
            sensor,
            PULSE_MAILBOX.capture(CONFIG.prescale_shift),
        ))
        .expect("failed to spawn capture task");

    spawner
        .spawn(odometer_task::run(odometer, leds, Console::new(uart_tx)))
        .expect("failed to spawn odometer task");

    core::future::pending::<()>().await;
}
