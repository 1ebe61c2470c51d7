//! Build script for askterm-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Sections device.toml must contain
const REQUIRED_SECTIONS: &[&str] = &["wifi", "server"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml as its default configuration.   ║\n\
            ║  Please create one in the askterm-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let missing: Vec<String> = REQUIRED_SECTIONS
        .iter()
        .filter(|section| config.get(**section).is_none())
        .map(|section| format!("Missing [{}] section", section))
        .collect();
    report("Missing required sections in device.toml", &missing);

    report("Invalid [wifi] configuration", &validate_wifi(&config));
    report("Invalid [server] configuration", &validate_server(&config));
    report("Invalid [timing] configuration", &validate_timing(&config));

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail the build with one boxed diagnostic listing every error
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_wifi(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(wifi) = config.get("wifi").and_then(|w| w.as_table()) else {
        return errors;
    };

    match wifi.get("ssid") {
        Some(toml::Value::String(ssid)) if ssid.is_empty() => {
            errors.push("[wifi] ssid cannot be empty".to_string());
        }
        Some(toml::Value::String(ssid)) if ssid.len() > 32 => {
            errors.push("[wifi] ssid must be at most 32 bytes".to_string());
        }
        Some(toml::Value::String(_)) => {}
        Some(_) => errors.push("[wifi] ssid must be a string".to_string()),
        None => errors.push("[wifi] missing 'ssid'".to_string()),
    }

    match wifi.get("password") {
        Some(toml::Value::String(password)) if password.len() > 64 => {
            errors.push("[wifi] password must be at most 64 bytes".to_string());
        }
        Some(toml::Value::String(_)) | None => {}
        Some(_) => errors.push("[wifi] password must be a string".to_string()),
    }

    errors
}

fn validate_server(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(server) = config.get("server").and_then(|s| s.as_table()) else {
        return errors;
    };

    match server.get("host") {
        Some(toml::Value::String(host)) => {
            if host.parse::<Ipv4Addr>().is_err() {
                errors.push(format!("[server] host '{}' is not an IPv4 address", host));
            }
        }
        Some(_) => errors.push("[server] host must be a string".to_string()),
        None => errors.push("[server] missing 'host'".to_string()),
    }

    match server.get("port") {
        Some(toml::Value::Integer(port)) => {
            if *port < 1 || *port > 65535 {
                errors.push("[server] port must be 1-65535".to_string());
            }
        }
        Some(_) => errors.push("[server] port must be an integer".to_string()),
        None => errors.push("[server] missing 'port'".to_string()),
    }

    errors
}

fn validate_timing(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(timing) = config.get("timing").and_then(|t| t.as_table()) else {
        return errors;
    };

    for (key, value) in timing {
        match value {
            toml::Value::Integer(ms) if *ms < 0 => {
                errors.push(format!("[timing] {} cannot be negative", key));
            }
            toml::Value::Integer(_) => {}
            _ => errors.push(format!("[timing] {} must be an integer", key)),
        }
    }

    errors
}
