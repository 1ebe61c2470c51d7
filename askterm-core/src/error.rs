//! Error types shared by the core components
//!
//! None of these stop the control loop. Connectivity failures are retried on
//! the timer, transport failures abandon the current request, and bad control
//! commands are reported and ignored.

use askterm_protocol::EncodeError;

/// Joining the wireless network failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityError {
    /// The join did not complete within the connect timeout
    Timeout,
    /// The access point rejected the join (bad SSID or password)
    JoinFailed,
    /// Joined, but no address was assigned in time
    NoAddress,
}

/// Talking to the bridge server failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Configured host is not a dotted IPv4 address
    InvalidAddress,
    /// The server refused or did not answer the connection
    Refused,
    /// Connecting took too long
    Timeout,
    /// The request could not be sent
    Write,
}

/// A control command was not understood
///
/// Nothing is changed when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `setwifi:` without the `,` between SSID and password
    MissingSeparator,
    /// `setip:` value is not a dotted IPv4 address
    InvalidAddress,
    /// `setport:` value is not a number in `1..=65535`
    InvalidPort,
    /// SSID empty or a value longer than its field allows
    InvalidLength,
}

impl ConfigError {
    /// Usage hint shown on the console
    pub fn usage(&self) -> &'static str {
        match self {
            ConfigError::MissingSeparator => "Invalid format. Use: setwifi:ssid,password",
            ConfigError::InvalidAddress => "Invalid IP. Use: setip:192.168.1.10",
            ConfigError::InvalidPort => "Invalid port. Use: setport:5005",
            ConfigError::InvalidLength => "Invalid length. SSID 1-32 chars, password up to 64",
        }
    }
}

/// A question could not be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// No network; nothing was sent
    NotConnected,
    /// Connection or send failure
    Transport(TransportError),
    /// The question does not fit in a request
    Encode(EncodeError),
}

impl From<TransportError> for DispatchError {
    fn from(e: TransportError) -> Self {
        DispatchError::Transport(e)
    }
}

impl From<EncodeError> for DispatchError {
    fn from(e: EncodeError) -> Self {
        DispatchError::Encode(e)
    }
}
