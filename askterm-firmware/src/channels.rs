//! Inter-task communication channels
//!
//! The console and button tasks feed operator input to the control loop in
//! `main` through a single bounded channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use askterm_core::command::ControlInput;

/// Channel capacity for operator input
const INPUT_CHANNEL_SIZE: usize = 4;

/// Console lines and button presses, in arrival order
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, ControlInput, INPUT_CHANNEL_SIZE> =
    Channel::new();
