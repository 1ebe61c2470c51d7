//! State machine definition

use super::events::LinkEvent;

/// Network availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No network; questions are refused
    #[default]
    Disconnected,
    /// A join attempt is in flight
    Connecting,
    /// Joined with an address; questions may be sent
    Connected,
}

impl ConnectionState {
    /// Check if network operations are allowed
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Human readable label for status output
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "No",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Yes",
        }
    }

    /// Process an event and return the next state
    ///
    /// Events that make no sense in the current state leave it unchanged.
    pub fn transition(self, event: LinkEvent) -> Self {
        use ConnectionState::*;
        use LinkEvent::*;

        match (self, event) {
            (Disconnected, AttemptStarted) => Connecting,

            (Connecting, AttemptSucceeded) => Connected,
            (Connecting, AttemptFailed(_)) => Disconnected,
            (Connecting, DisconnectRequested) => Disconnected,

            (Connected, DisconnectRequested) => Disconnected,
            (Connected, LinkLost) => Disconnected,

            // Only one attempt in flight; a second start is ignored
            (Connecting, AttemptStarted) => Connecting,

            (state, _) => state,
        }
    }
}
