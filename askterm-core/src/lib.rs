//! Board-agnostic core logic for the Askterm terminal firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware:
//!
//! - Platform traits (WiFi link, TCP connector, console, clock)
//! - Connection state machine and retry timing
//! - Stream consumer turning the server's answer into screen lines
//! - Request dispatch and the model name query
//! - Control command parsing and routing
//! - Configuration types and the embedded config reader
//!
//! ```text
//!  button / console line
//!          │
//!          ▼
//!    command::route ──▶ connection::service ──▶ WifiLink
//!          │
//!          ▼
//!    request::ask ──▶ Connector ──▶ stream::StreamConsumer ──▶ LineWrapBuffer
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod request;
pub mod state;
pub mod stream;
pub mod traits;
pub mod ui;

#[cfg(test)]
mod testing;

pub use context::{Context, Io};
