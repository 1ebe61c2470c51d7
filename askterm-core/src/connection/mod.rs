//! Connection lifecycle
//!
//! [`ConnectionManager`] decides when a join may be attempted; [`service`]
//! performs the attempt against the board and updates the screen.

pub mod manager;
pub mod service;

pub use manager::ConnectionManager;
pub use service::{force_attempt, service};
