//! Minimal TOML reader for `device.toml`
//!
//! Handles only the subset the device configuration needs. It does NOT
//! support the full TOML grammar.
//!
//! Supported:
//! - `[section]` headers (`wifi`, `server`, `timing`, `display`, `presets`)
//! - `key = value` pairs with quoted strings or integers
//! - Comments (`# ...`), whole-line or trailing
//!
//! Not supported:
//! - Escape sequences inside strings
//! - Multi-line strings, arrays, tables, dotted keys
//!
//! Keys left out keep their default values.

use heapless::String;

use super::types::{bounded, parse_host, DeviceConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Key not known in its section
    UnknownKey,
    /// Wrong value type or out of range
    InvalidValue,
    /// String longer than its field
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Server,
    Timing,
    Display,
    Presets,
}

/// Parse `input` on top of the defaults
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = line
                .split('#')
                .next()
                .map(str::trim)
                .and_then(|h| h.strip_prefix('['))
                .and_then(|h| h.strip_suffix(']'))
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "wifi" => Ok(Section::Wifi),
        "server" => Ok(Section::Server),
        "timing" => Ok(Section::Timing),
        "display" => Ok(Section::Display),
        "presets" => Ok(Section::Presets),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Trailing comment, unless the # sits inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|v| !v.contains('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Integers may use `_` as a digit separator (`20_000`)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<24> = String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bounded<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    bounded(parse_string(value)?).ok_or(ParseError::TooLong)
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Wifi, "ssid") => {
            let ssid = parse_bounded(value)?;
            if ssid.is_empty() {
                return Err(ParseError::InvalidValue);
            }
            config.wifi.ssid = ssid;
        }
        (Section::Wifi, "password") => config.wifi.password = parse_bounded(value)?,

        (Section::Server, "host") => {
            config.server.host =
                parse_host(parse_string(value)?).map_err(|_| ParseError::InvalidValue)?;
        }
        (Section::Server, "port") => {
            config.server.port = match parse_int::<u16>(value)? {
                0 => return Err(ParseError::InvalidValue),
                port => port,
            };
        }

        (Section::Timing, "retry_interval_ms") => {
            config.timing.retry_interval_ms = parse_int(value)?
        }
        (Section::Timing, "connect_timeout_ms") => {
            config.timing.connect_timeout_ms = parse_int(value)?
        }
        (Section::Timing, "message_hold_ms") => config.timing.message_hold_ms = parse_int(value)?,
        (Section::Timing, "stream_idle_timeout_ms") => {
            config.timing.stream_idle_timeout_ms = parse_int(value)?
        }

        (Section::Display, "width_px") => config.display.width_px = parse_int(value)?,
        (Section::Display, "glyph_width_px") => {
            config.display.glyph_width_px = match parse_int::<u16>(value)? {
                0 => return Err(ParseError::InvalidValue),
                width => width,
            };
        }

        (Section::Presets, "button1") => config.presets.button1 = parse_bounded(value)?,
        (Section::Presets, "button2") => config.presets.button2 = parse_bounded(value)?,

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
