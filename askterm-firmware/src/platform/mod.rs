//! Pico W implementations of the core platform traits

pub mod clock;
pub mod connector;
pub mod link;
pub mod reporter;

use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;

use askterm_core::traits::Platform;

use crate::display::Ssd1306;

pub use clock::EmbassyClock;
pub use connector::TcpConnector;
pub use link::CywLink;
pub use reporter::UartReporter;

/// Raspberry Pi Pico W with an SSD1306 on I2C0
pub struct PicoW;

impl Platform for PicoW {
    type Link = CywLink;
    type Connector = TcpConnector;
    type Display = Ssd1306<I2c<'static, I2C0, Blocking>>;
    type Reporter = UartReporter;
    type Clock = EmbassyClock;
}
