//! Control command parser
//!
//! ```text
//! setwifi:<ssid>,<password>   password may be empty, may contain ','
//! setip:<a.b.c.d>
//! setport:<1-65535>
//! status | connect | disconnect
//! <anything else>             a question
//! ```

use heapless::String;

use crate::config::{parse_host, parse_port, Credentials, MAX_HOST_LEN};
use crate::error::ConfigError;

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand<'a> {
    SetWifi(Credentials),
    SetIp(String<MAX_HOST_LEN>),
    SetPort(u16),
    Status,
    Connect,
    Disconnect,
    Ask(&'a str),
}

/// Parse one console line
///
/// Surrounding whitespace is ignored; an empty line yields `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ControlCommand<'_>>, ConfigError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let command = if let Some(rest) = line.strip_prefix("setwifi:") {
        let (ssid, password) = rest.split_once(',').ok_or(ConfigError::MissingSeparator)?;
        ControlCommand::SetWifi(Credentials::new(ssid.trim(), password)?)
    } else if let Some(rest) = line.strip_prefix("setip:") {
        ControlCommand::SetIp(parse_host(rest.trim())?)
    } else if let Some(rest) = line.strip_prefix("setport:") {
        ControlCommand::SetPort(parse_port(rest.trim())?)
    } else {
        match line {
            "status" => ControlCommand::Status,
            "connect" => ControlCommand::Connect,
            "disconnect" => ControlCommand::Disconnect,
            question => ControlCommand::Ask(question),
        }
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(parse("status"), Ok(Some(ControlCommand::Status)));
        assert_eq!(parse(" connect \r"), Ok(Some(ControlCommand::Connect)));
        assert_eq!(parse("disconnect"), Ok(Some(ControlCommand::Disconnect)));
    }

    #[test]
    fn test_empty_line_is_ignored() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("  \r"), Ok(None));
    }

    #[test]
    fn test_setwifi() {
        let Ok(Some(ControlCommand::SetWifi(creds))) = parse("setwifi:HomeNet,pa,ss") else {
            panic!("expected setwifi");
        };
        assert_eq!(creds.ssid.as_str(), "HomeNet");
        assert_eq!(creds.password.as_str(), "pa,ss");
    }

    #[test]
    fn test_setwifi_open_network() {
        let Ok(Some(ControlCommand::SetWifi(creds))) = parse("setwifi:cafe,") else {
            panic!("expected setwifi");
        };
        assert!(creds.password.is_empty());
    }

    #[test]
    fn test_setwifi_errors() {
        assert_eq!(parse("setwifi:nocomma"), Err(ConfigError::MissingSeparator));
        assert_eq!(parse("setwifi:,pass"), Err(ConfigError::InvalidLength));
    }

    #[test]
    fn test_setip() {
        match parse("setip:10.1.2.3") {
            Ok(Some(ControlCommand::SetIp(host))) => assert_eq!(host.as_str(), "10.1.2.3"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(parse("setip:localhost"), Err(ConfigError::InvalidAddress));
        assert_eq!(parse("setip:"), Err(ConfigError::InvalidAddress));
    }

    #[test]
    fn test_setport() {
        assert_eq!(parse("setport:8080"), Ok(Some(ControlCommand::SetPort(8080))));
        assert_eq!(parse("setport:0"), Err(ConfigError::InvalidPort));
        assert_eq!(parse("setport:abc"), Err(ConfigError::InvalidPort));
    }

    #[test]
    fn test_anything_else_is_a_question() {
        assert_eq!(
            parse("What is the status of Rust?"),
            Ok(Some(ControlCommand::Ask("What is the status of Rust?")))
        );
        // Keywords only match whole lines
        assert_eq!(parse("status?"), Ok(Some(ControlCommand::Ask("status?"))));
        assert_eq!(parse("Status"), Ok(Some(ControlCommand::Ask("Status"))));
    }
}
