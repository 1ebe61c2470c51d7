//! Question dispatch
//!
//! Sends one question and drives the answer stream to the screen. Only one
//! request runs at a time; the caller does not regain control until the
//! server closes the connection.

use askterm_protocol::{encode_ask, MAX_REQUEST_LEN};
use embedded_io_async::Write;

use crate::context::{Context, Io};
use crate::error::{DispatchError, TransportError};
use crate::stream::{StreamConsumer, StreamSession};
use crate::traits::{Clock, Connector, DisplayBackend, Platform, Reporter, WifiLink};
use crate::ui;

/// Ask `question` and stream the answer onto the screen
///
/// Without connectivity nothing is sent: the "No WiFi!" screen is shown for
/// the hold time and the home screen restored. On success the complete
/// answer goes to the reporter.
pub async fn ask<P: Platform>(
    ctx: &mut Context,
    io: &mut Io<P>,
    question: &str,
) -> Result<StreamSession, DispatchError> {
    if !ctx.connection.is_connected() {
        io.reporter
            .status("Error: Not connected to WiFi. Use 'connect' or 'setwifi:ssid,pass'");
        ui::no_wifi(&mut ctx.screen);
        ctx.refresh(&mut io.display).ok();
        io.clock.pause(ctx.config.timing.message_hold_ms).await;
        ui::home(ctx, io.link.local_address());
        ctx.refresh(&mut io.display).ok();
        return Err(DispatchError::NotConnected);
    }

    let mut request = [0u8; MAX_REQUEST_LEN];
    let len = match encode_ask(
        &ctx.config.server.host,
        ctx.config.server.port,
        question,
        &mut request,
    ) {
        Ok(len) => len,
        Err(e) => {
            io.reporter.status("Error: question too long");
            return Err(e.into());
        }
    };

    ui::query(&mut ctx.screen, question);
    ctx.refresh(&mut io.display).ok();

    let mut connection = match io.connector.connect(&ctx.config.server).await {
        Ok(connection) => connection,
        Err(e) => return Err(transport_failed(ctx, &mut io.reporter, &mut io.display, e)),
    };
    if connection.write_all(&request[..len]).await.is_err()
        || connection.flush().await.is_err()
    {
        return Err(transport_failed(
            ctx,
            &mut io.reporter,
            &mut io.display,
            TransportError::Write,
        ));
    }

    let session = StreamConsumer::new()
        .consume(&mut connection, &mut ctx.screen, &mut io.display)
        .await;
    drop(connection);

    io.reporter.status("--- SERVER RESPONSE ---");
    io.reporter.response(session.response());
    if session.is_truncated() {
        io.reporter.status("[truncated]");
    }
    io.reporter.status("--- END OF RESPONSE ---");

    Ok(session)
}

fn transport_failed<R: Reporter, D: DisplayBackend>(
    ctx: &mut Context,
    reporter: &mut R,
    display: &mut D,
    error: TransportError,
) -> DispatchError {
    reporter.status("Error: connection to server failed");
    ui::conn_failed(&mut ctx.screen);
    ctx.refresh(display).ok();
    DispatchError::Transport(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::testing::{fake_io, FakePlatform, Script};
    use crate::ui::WAITING_LINE;
    use embassy_futures::block_on;

    const ANSWER: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\n\r\n\
{\"response\":\"Hello\"}\n\
{\"response\":\", world\"}\n";

    fn connected() -> (Context, Io<FakePlatform>) {
        let mut ctx = Context::new(DeviceConfig::default());
        assert!(ctx.connection.begin_attempt(0));
        ctx.connection.finish_attempt(Ok(()), 0);
        (ctx, fake_io())
    }

    #[test]
    fn test_not_connected_sends_nothing() {
        let mut ctx = Context::new(DeviceConfig::default());
        let mut io = fake_io();

        let result = block_on(ask(&mut ctx, &mut io, "hi"));

        assert_eq!(result.err(), Some(DispatchError::NotConnected));
        assert_eq!(io.connector.connects, 0);
        assert_eq!(io.clock.paused, [2_000]);
        assert_eq!(ctx.screen.screen().get(0), Some("Offline"));
        assert!(io.display.renders >= 2);
        assert!(io.reporter.statuses[0].starts_with("Error: Not connected"));
    }

    #[test]
    fn test_streams_answer_and_reports_it() {
        let (mut ctx, mut io) = connected();
        io.connector.scripts.push_back(Script::Respond(ANSWER.to_vec()));

        let session = block_on(ask(&mut ctx, &mut io, "Say hello")).unwrap();

        assert_eq!(session.response(), "Hello, world");
        assert_eq!(io.reporter.responses, ["Hello, world"]);

        let rows: std::vec::Vec<&str> = ctx.screen.screen().lines().collect();
        assert_eq!(rows, ["Query:", "Say hello", "Hello, world"]);
        assert!(!rows.contains(&WAITING_LINE));
    }

    #[test]
    fn test_request_carries_question_as_json() {
        let (mut ctx, mut io) = connected();
        io.connector.scripts.push_back(Script::Respond(ANSWER.to_vec()));

        block_on(ask(&mut ctx, &mut io, "Is \"this\" ok?")).unwrap();

        let sent = std::string::String::from_utf8(io.connector.requests[0].clone()).unwrap();
        assert!(sent.starts_with("POST /ask_stream HTTP/1.1\r\n"));
        assert!(sent.contains("Host: 192.168.0.118:5005\r\n"));
        assert!(sent.contains("Connection: close\r\n"));
        assert!(sent.ends_with(r#"{"question":"Is \"this\" ok?"}"#));
    }

    #[test]
    fn test_connection_failure_shows_conn_failed() {
        let (mut ctx, mut io) = connected();
        io.connector
            .scripts
            .push_back(Script::Refuse(TransportError::Refused));

        let result = block_on(ask(&mut ctx, &mut io, "hi"));

        assert_eq!(
            result.err(),
            Some(DispatchError::Transport(TransportError::Refused))
        );
        assert_eq!(ctx.screen.screen().get(0), Some("Conn failed"));
        assert!(io.reporter.responses.is_empty());
    }

    #[test]
    fn test_new_query_clears_previous_answer() {
        let (mut ctx, mut io) = connected();
        io.connector.scripts.push_back(Script::Respond(ANSWER.to_vec()));
        io.connector.scripts.push_back(Script::Respond(
            b"HTTP/1.1 200 OK\r\n\r\n{\"response\":\"second\"}\n".to_vec(),
        ));

        block_on(ask(&mut ctx, &mut io, "first")).unwrap();
        block_on(ask(&mut ctx, &mut io, "again")).unwrap();

        let rows: std::vec::Vec<&str> = ctx.screen.screen().lines().collect();
        assert_eq!(rows, ["Query:", "again", "second"]);
        assert_eq!(io.reporter.responses, ["Hello, world", "second"]);
    }

    #[test]
    fn test_reset_mid_stream_still_reports_partial_answer() {
        let (mut ctx, mut io) = connected();
        io.connector.scripts.push_back(Script::ResetAfter(
            b"HTTP/1.1 200 OK\r\n\r\n{\"response\":\"half an \"}\n{\"resp".to_vec(),
        ));

        let session = block_on(ask(&mut ctx, &mut io, "q")).unwrap();

        assert!(session.read_failed());
        assert_eq!(io.reporter.responses, ["half an "]);
    }
}
