//! Operator input
//!
//! Lines typed on the console are either control commands or questions;
//! the two buttons ask preset questions.

pub mod line;
pub mod parser;
pub mod router;

use heapless::String;

pub use line::{LineAssembler, LineError};
pub use parser::{parse, ControlCommand};
pub use router::route;

/// Longest console line accepted
pub const MAX_INPUT_LEN: usize = 256;

/// Console help, printed at boot
pub const HELP: &[&str] = &[
    "=== COMMANDS ===",
    "setwifi:ssid,password  change WiFi network",
    "setip:192.168.1.10     change server address",
    "setport:5005           change server port",
    "status                 show connection status",
    "connect                connect to WiFi now",
    "disconnect             leave the WiFi network",
    "anything else          ask the server",
    "================",
];

/// Physical preset buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Preset1,
    Preset2,
}

/// One unit of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlInput {
    /// A console line, without its terminator
    Line(String<MAX_INPUT_LEN>),
    /// A button press
    Preset(Button),
}
