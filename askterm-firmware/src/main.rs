//! Askterm - Pocket Terminal for a Streaming Text-Generation Server
//!
//! Firmware for the Raspberry Pi Pico W with a 128x64 SSD1306 OLED.
//! Questions typed on the UART console or picked with the two preset
//! buttons are sent to a bridge server over WiFi; the answer is painted on
//! the display token by token as it streams back.
//!
//! All application logic runs in the single control loop at the end of
//! `main`; the spawned tasks only move bytes (UART, buttons, WiFi chip,
//! network stack).

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use askterm_core::command::{self, Button, HELP};
use askterm_core::config::{parse_config, DeviceConfig};
use askterm_core::connection;
use askterm_core::traits::{Clock, Reporter};
use askterm_core::{ui, Context, Io};

use crate::channels::INPUT_CHANNEL;
use crate::display::Ssd1306;
use crate::platform::{CywLink, EmbassyClock, PicoW, TcpConnector, UartReporter};

mod channels;
mod display;
mod platform;
mod tasks;

/// Embedded default configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// Longest the control loop sleeps without input
const POLL_INTERVAL_MS: u64 = 500;

/// Seed for the network stack's port and sequence randomisation
const NET_SEED: u64 = 0x0a5c_7e21_d00d_f00d;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Askterm firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Console UART (GPIO0 TX, GPIO1 RX, 115200 baud)
    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for console");

    // OLED on I2C0 (GPIO4 SDA, GPIO5 SCL)
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let mut oled = Ssd1306::new(i2c);
    if let Err(e) = oled.init() {
        defmt::panic!("OLED init failed: {:?}", e);
    }
    info!("OLED initialized");

    // Preset buttons (GPIO12, GPIO14), active low
    let button1 = Input::new(p.PIN_12, Pull::Up);
    let button2 = Input::new(p.PIN_14, Pull::Up);

    // CYW43439 WiFi over PIO SPI
    let fw = cyw43_firmware();
    let clm = cyw43_clm();

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("WiFi chip initialized");

    let (stack, net_runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        NET_SEED,
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();

    // Spawn input tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::button_task(button1, Button::Preset1))
        .unwrap();
    spawner
        .spawn(tasks::button_task(button2, Button::Preset2))
        .unwrap();

    info!("All tasks spawned, entering control loop");

    let idle_timeout_ms = config.timing.stream_idle_timeout_ms;
    let mut ctx = Context::new(config);
    let mut io: Io<PicoW> = Io::new(
        CywLink::new(control, stack),
        TcpConnector::new(stack, idle_timeout_ms),
        oled,
        UartReporter::new(tx),
        EmbassyClock,
    );

    for line in HELP {
        io.reporter.status(line);
    }
    ui::boot(&mut ctx.screen);
    if let Err(e) = ctx.refresh(&mut io.display) {
        warn!("Display refresh failed: {:?}", e);
    }

    loop {
        if let Some(result) = connection::service(&mut ctx, &mut io).await {
            info!(
                "Connection attempt {}: {:?}",
                ctx.connection.attempts(),
                result
            );
        }
        if let Err(e) = ctx.refresh(&mut io.display) {
            warn!("Display refresh failed: {:?}", e);
        }

        let wait = ctx
            .connection
            .next_attempt_at()
            .map_or(POLL_INTERVAL_MS, |at| {
                at.saturating_sub(io.clock.now_ms()).min(POLL_INTERVAL_MS)
            });

        match select(
            INPUT_CHANNEL.receive(),
            Timer::after(Duration::from_millis(wait)),
        )
        .await
        {
            Either::First(input) => {
                debug!("Routing input: {:?}", input);
                command::route(&mut ctx, &mut io, &input).await;
            }
            Either::Second(()) => {
                trace!("Control loop tick");
            }
        }
    }
}

/// Parse the embedded device.toml, falling back to built-in defaults
///
/// build.rs validates the file, so the fallback only triggers when the
/// host-side validator and the on-device reader disagree.
fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration: {:?}", config);
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            DeviceConfig::default()
        }
    }
}

/// CYW43439 firmware blob, flashed separately at 0x10100000
///
/// ```text
/// probe-rs download 43439A0.bin --binary-format bin --chip RP2040 --base-address 0x10100000
/// probe-rs download 43439A0_clm.bin --binary-format bin --chip RP2040 --base-address 0x10140000
/// ```
fn cyw43_firmware() -> &'static [u8] {
    // SAFETY: the region is flash written before this firmware runs and is
    // never modified while it executes
    unsafe { core::slice::from_raw_parts(0x1010_0000 as *const u8, 230_321) }
}

/// CYW43439 country locale matrix, flashed separately at 0x10140000
fn cyw43_clm() -> &'static [u8] {
    // SAFETY: as for `cyw43_firmware`
    unsafe { core::slice::from_raw_parts(0x1014_0000 as *const u8, 4_752) }
}
