//! Driving join attempts on the board

use crate::context::{Context, Io};
use crate::error::ConnectivityError;
use crate::request::fetch_model;
use crate::traits::{Clock, Platform, Reporter, WifiLink};
use crate::ui;

/// Run one step of the connection lifecycle
///
/// Notices a dropped link, then starts a join if one is due. After a
/// successful join the model name is fetched and the welcome screen shown;
/// after a failure the guidance screen is shown and the retry wait starts.
///
/// Returns the outcome of the attempt, or `None` if none was made.
pub async fn service<P: Platform>(
    ctx: &mut Context,
    io: &mut Io<P>,
) -> Option<Result<(), ConnectivityError>> {
    let now = io.clock.now_ms();

    if ctx.connection.is_connected() && !io.link.is_up() {
        ctx.connection.link_lost(now);
        io.reporter.status("WiFi connection lost");
        ui::home(ctx, None);
        ctx.refresh(&mut io.display).ok();
    }

    if !ctx.connection.begin_attempt(now) {
        return None;
    }

    io.reporter
        .status("Attempting WiFi connection with current credentials...");
    ui::connecting(&mut ctx.screen, &ctx.config.wifi.ssid);
    ctx.refresh(&mut io.display).ok();

    let result = io
        .link
        .join(&ctx.config.wifi, ctx.connection.connect_timeout_ms())
        .await;
    ctx.connection.finish_attempt(result, io.clock.now_ms());

    match result {
        Ok(()) => {
            let address = io.link.local_address();
            ui::report_joined(&mut io.reporter, address);
            ctx.model = fetch_model(&mut io.connector, &ctx.config.server).await;
            ui::report_status(&mut io.reporter, ctx, address);
            ui::welcome(&mut ctx.screen, &ctx.config, address, &ctx.model);
        }
        Err(_) => {
            io.reporter.status("WiFi connection failed!");
            io.reporter
                .status("Check credentials. Use: setwifi:ssid,password");
            ui::wifi_failed(&mut ctx.screen, &ctx.config.wifi.ssid);
        }
    }
    ctx.refresh(&mut io.display).ok();

    Some(result)
}

/// Attempt a join now, bypassing the retry timer
///
/// Does nothing while connected or while an attempt is in flight.
pub async fn force_attempt<P: Platform>(
    ctx: &mut Context,
    io: &mut Io<P>,
) -> Option<Result<(), ConnectivityError>> {
    ctx.connection.request_immediate();
    service(ctx, io).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::request::ModelName;
    use crate::state::ConnectionState;
    use crate::testing::{fake_io, Script};
    use embassy_futures::block_on;
    use std::vec::Vec;

    const MODEL_REPLY: &[u8] =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"model\":\"llama3\"}";

    #[test]
    fn test_boot_attempt_connects_and_fetches_model() {
        let mut ctx = Context::new(DeviceConfig::default());
        let mut io = fake_io();
        io.link.join_results.push_back(Ok(()));
        io.connector.scripts.push_back(Script::Respond(MODEL_REPLY.to_vec()));

        let outcome = block_on(service(&mut ctx, &mut io));

        assert_eq!(outcome, Some(Ok(())));
        assert_eq!(ctx.connection.state(), ConnectionState::Connected);
        assert_eq!(ctx.model.as_str(), "llama3");
        assert_eq!(ctx.screen.screen().get(0), Some("Connected: Ready!"));
        assert!(io.reporter.statuses.iter().any(|s| s == "WiFi connected!"));
        assert!(io.reporter.statuses.iter().any(|s| s == "=== STATUS ==="));
        assert!(io.connector.requests[0].starts_with(b"GET /model HTTP/1.1\r\n"));
    }

    #[test]
    fn test_failed_attempt_shows_guidance_and_no_model_query() {
        let mut ctx = Context::new(DeviceConfig::default());
        let mut io = fake_io();
        io.link
            .join_results
            .push_back(Err(ConnectivityError::JoinFailed));

        let outcome = block_on(service(&mut ctx, &mut io));

        assert_eq!(outcome, Some(Err(ConnectivityError::JoinFailed)));
        assert_eq!(ctx.connection.state(), ConnectionState::Disconnected);
        assert_eq!(ctx.screen.screen().get(0), Some("WiFi failed!"));
        assert!(io.connector.requests.is_empty());
        assert_eq!(ctx.model, ModelName::Unknown);
        assert!(io.display.renders > 0);
    }

    #[test]
    fn test_unreachable_model_endpoint_yields_no_resp() {
        let mut ctx = Context::new(DeviceConfig::default());
        let mut io = fake_io();
        io.link.join_results.push_back(Ok(()));

        block_on(service(&mut ctx, &mut io));

        assert!(ctx.connection.is_connected());
        assert_eq!(ctx.model, ModelName::NoResponse);
    }

    #[test]
    fn test_retry_never_sooner_than_interval_after_failure() {
        let config = DeviceConfig::default();
        let interval = config.timing.retry_interval_ms;
        let mut ctx = Context::new(config);
        let mut io = fake_io();
        // Every join fails fast, far below the connect timeout
        io.link.join_duration_ms = 250;
        for _ in 0..10 {
            io.link
                .join_results
                .push_back(Err(ConnectivityError::JoinFailed));
        }

        let mut attempts: Vec<(u64, u64)> = Vec::new();
        for _ in 0..200 {
            let start = io.clock.now_ms();
            if block_on(service(&mut ctx, &mut io)).is_some() {
                attempts.push((start, io.clock.now_ms()));
            }
            io.clock.advance(500);
        }

        assert!(attempts.len() >= 3);
        for pair in attempts.windows(2) {
            let (_, previous_end) = pair[0];
            let (next_start, _) = pair[1];
            assert!(next_start - previous_end >= interval);
        }
    }

    #[test]
    fn test_force_attempt_bypasses_timer() {
        let mut ctx = Context::new(DeviceConfig::default());
        let mut io = fake_io();
        io.link
            .join_results
            .push_back(Err(ConnectivityError::Timeout));
        io.link.join_results.push_back(Ok(()));

        block_on(service(&mut ctx, &mut io));
        assert!(block_on(service(&mut ctx, &mut io)).is_none());

        let outcome = block_on(force_attempt(&mut ctx, &mut io));
        assert_eq!(outcome, Some(Ok(())));
        assert_eq!(io.link.joins.len(), 2);
    }

    #[test]
    fn test_link_drop_is_noticed() {
        let mut ctx = Context::new(DeviceConfig::default());
        let mut io = fake_io();
        io.link.join_results.push_back(Ok(()));
        block_on(service(&mut ctx, &mut io));
        assert!(ctx.connection.is_connected());

        io.link.up = false;
        let outcome = block_on(service(&mut ctx, &mut io));

        assert!(outcome.is_none());
        assert_eq!(ctx.connection.state(), ConnectionState::Disconnected);
        assert!(io.reporter.statuses.iter().any(|s| s == "WiFi connection lost"));
        assert_eq!(ctx.screen.screen().get(0), Some("Offline"));
    }
}
