//! Events that trigger connection state transitions

use crate::error::ConnectivityError;

/// Events that can change the connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A join attempt was started
    AttemptStarted,
    /// The join completed and an address was assigned
    AttemptSucceeded,
    /// The join failed or timed out
    AttemptFailed(ConnectivityError),
    /// The operator asked to disconnect
    DisconnectRequested,
    /// The link dropped on its own
    LinkLost,
}
