//! Configuration type definitions
//!
//! These types hold the device configuration. Defaults are compiled in, a
//! `device.toml` embedded in the firmware image overrides them at boot, and
//! control commands change them at runtime (in RAM only).

use core::net::Ipv4Addr;
use core::str::FromStr;

use askterm_display::MAX_LINE_CHARS;
use heapless::String;

use crate::command::Button;
use crate::error::ConfigError;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Longest dotted IPv4 address
pub const MAX_HOST_LEN: usize = 15;

/// Maximum question length in bytes
pub const MAX_QUESTION_LEN: usize = 256;

/// Wireless network credentials
///
/// Deliberately not `defmt::Format`: the password must not reach the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

impl Credentials {
    /// Validate and copy a credential pair
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        if ssid.is_empty() {
            return Err(ConfigError::InvalidLength);
        }
        Ok(Self {
            ssid: bounded(ssid).ok_or(ConfigError::InvalidLength)?,
            password: bounded(password).ok_or(ConfigError::InvalidLength)?,
        })
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            ssid: truncated("askterm"),
            password: String::new(),
        }
    }
}

/// Bridge server address
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServerEndpoint {
    /// Dotted IPv4 address
    pub host: String<MAX_HOST_LEN>,
    pub port: u16,
}

impl ServerEndpoint {
    /// Host parsed as an address, if it is one
    pub fn address(&self) -> Option<Ipv4Addr> {
        Ipv4Addr::from_str(&self.host).ok()
    }
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self {
            host: truncated("192.168.0.118"),
            port: 5005,
        }
    }
}

/// Check that `host` is a dotted IPv4 address and copy it
pub fn parse_host(host: &str) -> Result<String<MAX_HOST_LEN>, ConfigError> {
    Ipv4Addr::from_str(host).map_err(|_| ConfigError::InvalidAddress)?;
    bounded(host).ok_or(ConfigError::InvalidAddress)
}

/// Check that `port` is a number in `1..=65535`
pub fn parse_port(port: &str) -> Result<u16, ConfigError> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidPort),
        Ok(p) => Ok(p),
    }
}

/// Connection timing, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Wait after a failed join before trying again
    pub retry_interval_ms: u64,
    /// Upper bound on a single join attempt
    pub connect_timeout_ms: u64,
    /// How long transient messages stay on screen
    pub message_hold_ms: u64,
    /// Silence after which an open server connection is dropped; 0 waits
    /// for the server to close, however long the model takes
    pub stream_idle_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: 20_000,
            connect_timeout_ms: 15_000,
            message_hold_ms: 2_000,
            stream_idle_timeout_ms: 0,
        }
    }
}

/// Panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Panel width in pixels
    pub width_px: u16,
    /// Average glyph advance in pixels
    pub glyph_width_px: u16,
}

impl DisplayConfig {
    /// Characters per line
    pub fn max_chars(&self) -> usize {
        let chars = self.width_px / self.glyph_width_px.max(1);
        (chars as usize).clamp(1, MAX_LINE_CHARS)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width_px: 128,
            glyph_width_px: 6,
        }
    }
}

/// Questions bound to the physical buttons
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresetConfig {
    pub button1: String<MAX_QUESTION_LEN>,
    pub button2: String<MAX_QUESTION_LEN>,
}

impl PresetConfig {
    /// Question for `button`
    pub fn question(&self, button: Button) -> &String<MAX_QUESTION_LEN> {
        match button {
            Button::Preset1 => &self.button1,
            Button::Preset2 => &self.button2,
        }
    }
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            button1: truncated("In one sentence, what is a microcontroller?"),
            button2: truncated("Tell me a short fun fact about space."),
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    pub wifi: Credentials,
    pub server: ServerEndpoint,
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub presets: PresetConfig,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DeviceConfig {{ ssid: {}, server: {}, timing: {}, display: {} }}",
            self.wifi.ssid.as_str(),
            self.server,
            self.timing,
            self.display,
        );
    }
}

/// Copy `s`, or `None` if it does not fit
pub(crate) fn bounded<const N: usize>(s: &str) -> Option<String<N>> {
    let mut out = String::new();
    out.push_str(s).ok()?;
    Some(out)
}

/// Copy as many whole characters of `s` as fit
pub(crate) fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
