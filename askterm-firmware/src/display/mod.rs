//! OLED panel driver
//!
//! The core renders through `askterm_display::DisplayBackend`; this module
//! provides the implementation for the SSD1306 on the I2C bus.

pub mod ssd1306;

pub use ssd1306::Ssd1306;
