//! Connection state machine
//!
//! Network availability is a function of the current state and an event.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::LinkEvent;
pub use machine::ConnectionState;
