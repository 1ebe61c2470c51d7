//! Embassy async tasks
//!
//! Input tasks feed the control loop through `INPUT_CHANNEL`; the network
//! runners only need to be polled.

pub mod buttons;
pub mod net;
pub mod serial_rx;

pub use buttons::button_task;
pub use net::{cyw43_task, net_task};
pub use serial_rx::serial_rx_task;
