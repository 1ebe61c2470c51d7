//! Fixed screens and console summaries
//!
//! Every screen starts from a cleared buffer; rows wider than the panel are
//! cut by [`LineWrapBuffer::push_line`], except the question on the query
//! screen, which is wrapped.

use core::fmt::{self, Write};
use core::net::Ipv4Addr;

use askterm_display::{DisplayLine, LineWrapBuffer};
use heapless::String;

use crate::config::DeviceConfig;
use crate::context::Context;
use crate::request::ModelName;
use crate::traits::Reporter;

/// Header row of a query screen
pub const QUERY_LINE: &str = "Query:";

/// Placeholder shown until the first token arrives
pub const WAITING_LINE: &str = "Waiting response...";

/// Console line width for status output
const REPORT_LINE_LEN: usize = 96;

fn push_fmt(screen: &mut LineWrapBuffer, args: fmt::Arguments<'_>) {
    let mut line = DisplayLine::new();
    // A row that does not fit is cut anyway
    let _ = line.write_fmt(args);
    screen.push_line(&line);
}

fn report_fmt<R: Reporter>(reporter: &mut R, args: fmt::Arguments<'_>) {
    let mut line: String<REPORT_LINE_LEN> = String::new();
    let _ = line.write_fmt(args);
    reporter.status(&line);
}

/// Power-on splash
pub fn boot(screen: &mut LineWrapBuffer) {
    screen.reset();
    screen.push_line("Askterm");
    screen.push_line("Initializing...");
}

/// Join in progress
pub fn connecting(screen: &mut LineWrapBuffer, ssid: &str) {
    screen.reset();
    screen.push_line("Connecting to:");
    screen.push_line(ssid);
}

/// Ready screen shown while connected
pub fn welcome(
    screen: &mut LineWrapBuffer,
    config: &DeviceConfig,
    address: Option<Ipv4Addr>,
    model: &ModelName,
) {
    screen.reset();
    screen.push_line("Connected: Ready!");
    push_fmt(screen, format_args!("SSID: {}", config.wifi.ssid));
    match address {
        Some(ip) => push_fmt(screen, format_args!("IP: {}", ip)),
        None => screen.push_line("IP: -"),
    }
    push_fmt(screen, format_args!("Server: {}", config.server.host));
    push_fmt(screen, format_args!("Port: {}", config.server.port));
    push_fmt(screen, format_args!("Model: {}", model.as_str()));
}

/// Idle screen shown while disconnected
pub fn offline(screen: &mut LineWrapBuffer, config: &DeviceConfig) {
    screen.reset();
    screen.push_line("Offline");
    push_fmt(screen, format_args!("SSID: {}", config.wifi.ssid));
    push_fmt(screen, format_args!("Server: {}", config.server.host));
    push_fmt(screen, format_args!("Port: {}", config.server.port));
    screen.push_line("Type connect or");
    screen.push_line("setwifi:ssid,pass");
}

/// Welcome or offline screen, whichever applies
pub fn home(ctx: &mut Context, address: Option<Ipv4Addr>) {
    if ctx.connection.is_connected() {
        welcome(&mut ctx.screen, &ctx.config, address, &ctx.model);
    } else {
        offline(&mut ctx.screen, &ctx.config);
    }
}

/// Guidance after a failed join
pub fn wifi_failed(screen: &mut LineWrapBuffer, ssid: &str) {
    screen.reset();
    screen.push_line("WiFi failed!");
    screen.push_line("Use serial to set:");
    screen.push_line("setwifi:ssid,pass");
    push_fmt(screen, format_args!("Current: {}", ssid));
}

/// A question was asked without connectivity
pub fn no_wifi(screen: &mut LineWrapBuffer) {
    screen.reset();
    screen.push_line("No WiFi!");
    screen.push_line("Connect first");
}

/// Header of a new query; clears the previous answer
pub fn query(screen: &mut LineWrapBuffer, question: &str) {
    screen.reset();
    screen.push_line(QUERY_LINE);
    let width = screen.max_chars();
    let mut rest = question;
    while !rest.is_empty() {
        let cut = rest.char_indices().nth(width).map_or(rest.len(), |(idx, _)| idx);
        screen.push_line(&rest[..cut]);
        rest = &rest[cut..];
    }
    screen.push_line(WAITING_LINE);
}

/// The server could not be reached
pub fn conn_failed(screen: &mut LineWrapBuffer) {
    screen.reset();
    screen.push_line("Conn failed");
}

/// Two-row transient message, e.g. "IP updated to:" and the new value
pub fn notice(screen: &mut LineWrapBuffer, title: &str, value: impl fmt::Display) {
    screen.reset();
    screen.push_line(title);
    push_fmt(screen, format_args!("{}", value));
}

/// New credentials accepted
pub fn new_wifi(screen: &mut LineWrapBuffer, ssid: &str) {
    screen.reset();
    screen.push_line("New WiFi set:");
    push_fmt(screen, format_args!("SSID: {}", ssid));
    screen.push_line("Connecting...");
}

/// Print the status summary on the console
pub fn report_status<R: Reporter>(reporter: &mut R, ctx: &Context, address: Option<Ipv4Addr>) {
    reporter.status("=== STATUS ===");
    report_fmt(reporter, format_args!("SSID: {}", ctx.config.wifi.ssid));
    report_fmt(
        reporter,
        format_args!("Connected: {}", ctx.connection.state().label()),
    );
    if let (true, Some(ip)) = (ctx.connection.is_connected(), address) {
        report_fmt(reporter, format_args!("IP: {}", ip));
    }
    report_fmt(
        reporter,
        format_args!("Server: {}:{}", ctx.config.server.host, ctx.config.server.port),
    );
    report_fmt(reporter, format_args!("Model: {}", ctx.model.as_str()));
    reporter.status("==============");
}

/// Print the join result and, on success, the assigned address
pub fn report_joined<R: Reporter>(reporter: &mut R, address: Option<Ipv4Addr>) {
    reporter.status("WiFi connected!");
    if let Some(ip) = address {
        report_fmt(reporter, format_args!("IP address: {}", ip));
    }
}
