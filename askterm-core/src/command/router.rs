//! Command routing
//!
//! Executes operator input against the context. Every path ends with the
//! screen redrawn; errors are reported on the console and never propagate.

use core::fmt::Write as _;

use heapless::String;

use crate::connection::force_attempt;
use crate::context::{Context, Io};
use crate::request::{ask, fetch_model};
use crate::state::ConnectionState;
use crate::traits::{Clock, Platform, Reporter, WifiLink};
use crate::ui;

use super::parser::{parse, ControlCommand};
use super::ControlInput;

/// Handle one unit of operator input
pub async fn route<P: Platform>(ctx: &mut Context, io: &mut Io<P>, input: &ControlInput) {
    match input {
        ControlInput::Line(line) => route_line(ctx, io, line).await,
        ControlInput::Preset(button) => {
            let question = ctx.config.presets.question(*button).clone();
            // Failures were already shown and reported
            let _ = ask(ctx, io, &question).await;
        }
    }
}

async fn route_line<P: Platform>(ctx: &mut Context, io: &mut Io<P>, line: &str) {
    let command = match parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(e) => {
            io.reporter.status(e.usage());
            return;
        }
    };

    match command {
        ControlCommand::SetWifi(credentials) => {
            ctx.config.wifi = credentials;
            report(
                &mut io.reporter,
                format_args!("WiFi credentials updated. SSID: {}", ctx.config.wifi.ssid),
            );
            ui::new_wifi(&mut ctx.screen, &ctx.config.wifi.ssid);
            ctx.refresh(&mut io.display).ok();

            if ctx.connection.state() != ConnectionState::Disconnected {
                io.link.leave().await;
                ctx.connection.disconnect(io.clock.now_ms());
            }
            force_attempt(ctx, io).await;
        }
        ControlCommand::SetIp(host) => {
            ctx.config.server.host = host;
            report(
                &mut io.reporter,
                format_args!("Server IP updated to: {}", ctx.config.server.host),
            );
            refresh_model(ctx, io).await;
            ui::notice(&mut ctx.screen, "IP updated to:", &ctx.config.server.host);
            hold_then_home(ctx, io).await;
        }
        ControlCommand::SetPort(port) => {
            ctx.config.server.port = port;
            report(
                &mut io.reporter,
                format_args!("Server port updated to: {}", port),
            );
            refresh_model(ctx, io).await;
            ui::notice(&mut ctx.screen, "Port updated to:", port);
            hold_then_home(ctx, io).await;
        }
        ControlCommand::Status => {
            let address = io.link.local_address();
            ui::report_status(&mut io.reporter, ctx, address);
        }
        ControlCommand::Connect => {
            if ctx.connection.is_connected() {
                io.reporter.status("Already connected to WiFi");
            } else if force_attempt(ctx, io).await.is_none() {
                io.reporter.status("Connection attempt already in progress");
            }
        }
        ControlCommand::Disconnect => {
            io.link.leave().await;
            ctx.connection.disconnect(io.clock.now_ms());
            io.reporter.status("WiFi disconnected");
            ui::notice(&mut ctx.screen, "WiFi", "disconnected");
            hold_then_home(ctx, io).await;
        }
        ControlCommand::Ask(question) => {
            let _ = ask(ctx, io, question).await;
        }
    }
}

/// Re-query the model after the endpoint changed
async fn refresh_model<P: Platform>(ctx: &mut Context, io: &mut Io<P>) {
    if ctx.connection.is_connected() {
        ctx.model = fetch_model(&mut io.connector, &ctx.config.server).await;
        report(
            &mut io.reporter,
            format_args!("Model: {}", ctx.model.as_str()),
        );
    }
}

/// Show the current screen for the hold time, then the home screen
async fn hold_then_home<P: Platform>(ctx: &mut Context, io: &mut Io<P>) {
    ctx.refresh(&mut io.display).ok();
    io.clock.pause(ctx.config.timing.message_hold_ms).await;
    ui::home(ctx, io.link.local_address());
    ctx.refresh(&mut io.display).ok();
}

fn report<R: Reporter>(reporter: &mut R, args: core::fmt::Arguments<'_>) {
    let mut line: String<96> = String::new();
    let _ = line.write_fmt(args);
    reporter.status(&line);
}
