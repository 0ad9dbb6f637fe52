//! Meridian - Location-aware Watch Face Firmware
//!
//! Main firmware binary for RP2040-based watches. The position fix comes
//! from a companion device over UART; sunrise, sunset, twilight and the
//! moon phase are computed on the watch.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use meridian_core::Watch;
use meridian_hal_rp2040::flash::RecordStore;

use crate::clock::unix_now;
use crate::config::ConfigPersistence;

mod channels;
mod clock;
mod config;
mod link;
mod presenter;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Meridian firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Configuration and the location cache share the record partition
    let store = RecordStore::new(p.FLASH, p.DMA_CH0);
    let mut persistence = ConfigPersistence::new(store);
    let config = persistence.load().await;
    let store = persistence.into_storage();

    let watch = Watch::load(store, config, unix_now()).await;
    info!("Cached fix: {:?}", watch.fix());

    // Companion link on UART0 (GPIO0 TX, GPIO1 RX)
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion link");

    // Tap button to ground on GPIO15
    let button = Input::new(p.PIN_15, Pull::Up);

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::link_tx_task(tx, config.link_ack_timeout_ms))
        .unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner.spawn(tasks::controller_task(watch)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
