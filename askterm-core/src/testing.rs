//! Scripted board fakes for host tests

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use core::net::Ipv4Addr;

use askterm_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

use crate::config::{Credentials, ServerEndpoint};
use crate::context::Io;
use crate::error::{ConnectivityError, TransportError};
use crate::traits::{Clock, Connector, Platform, Reporter, WifiLink};

/// Manual clock shared between the fakes
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<u64>>,
    /// Every pause requested, in order
    pub paused: Vec<u64>,
}

impl FakeClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    async fn pause(&mut self, ms: u64) {
        self.paused.push(ms);
        self.advance(ms);
    }
}

/// Link whose join results are queued up front
pub struct FakeLink {
    clock: FakeClock,
    /// Results handed out by `join`, in order; empty means failure
    pub join_results: VecDeque<Result<(), ConnectivityError>>,
    /// Time each join takes
    pub join_duration_ms: u64,
    /// SSIDs passed to `join`
    pub joins: Vec<String>,
    pub leaves: usize,
    pub up: bool,
}

impl WifiLink for FakeLink {
    async fn join(
        &mut self,
        credentials: &Credentials,
        _timeout_ms: u64,
    ) -> Result<(), ConnectivityError> {
        self.joins.push(credentials.ssid.as_str().into());
        self.clock.advance(self.join_duration_ms);
        let result = self
            .join_results
            .pop_front()
            .unwrap_or(Err(ConnectivityError::JoinFailed));
        self.up = result.is_ok();
        result
    }

    async fn leave(&mut self) {
        self.leaves += 1;
        self.up = false;
    }

    fn is_up(&self) -> bool {
        self.up
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.up.then(|| Ipv4Addr::new(192, 168, 0, 42))
    }
}

/// What the next connection does
pub enum Script {
    /// Fail to connect
    Refuse(TransportError),
    /// Send these bytes, then close cleanly
    Respond(Vec<u8>),
    /// Send these bytes, then fail the next read
    ResetAfter(Vec<u8>),
}

/// Connector replaying queued scripts
pub struct FakeConnector {
    pub scripts: VecDeque<Script>,
    /// Bytes written on each connection
    pub requests: Vec<Vec<u8>>,
    pub connects: usize,
    /// Largest read returned by a connection
    pub chunk: usize,
}

impl Default for FakeConnector {
    fn default() -> Self {
        Self {
            scripts: VecDeque::new(),
            requests: Vec::new(),
            connects: 0,
            chunk: 13,
        }
    }
}

impl Connector for FakeConnector {
    type Connection<'a> = FakeConnection<'a>;

    async fn connect(
        &mut self,
        _endpoint: &ServerEndpoint,
    ) -> Result<FakeConnection<'_>, TransportError> {
        self.connects += 1;
        let (incoming, reset) = match self
            .scripts
            .pop_front()
            .unwrap_or(Script::Refuse(TransportError::Refused))
        {
            Script::Refuse(e) => return Err(e),
            Script::Respond(bytes) => (bytes, false),
            Script::ResetAfter(bytes) => (bytes, true),
        };
        self.requests.push(Vec::new());
        let sent = self.requests.last_mut().unwrap();
        Ok(FakeConnection::new(incoming, self.chunk, reset, sent))
    }
}

/// In-memory connection
pub struct FakeConnection<'a> {
    incoming: Vec<u8>,
    position: usize,
    chunk: usize,
    reset: bool,
    sent: &'a mut Vec<u8>,
}

impl<'a> FakeConnection<'a> {
    pub fn new(incoming: Vec<u8>, chunk: usize, reset: bool, sent: &'a mut Vec<u8>) -> Self {
        Self {
            incoming,
            position: 0,
            chunk: chunk.max(1),
            reset,
            sent,
        }
    }
}

impl ErrorType for FakeConnection<'_> {
    type Error = ErrorKind;
}

impl Read for FakeConnection<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        let remaining = &self.incoming[self.position..];
        if remaining.is_empty() {
            return if self.reset {
                Err(ErrorKind::ConnectionReset)
            } else {
                Ok(0)
            };
        }
        let n = remaining.len().min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

impl Write for FakeConnection<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        self.sent.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Display that keeps the rows of the last frame
#[derive(Default)]
pub struct FakeDisplay {
    pub rows: Vec<String>,
    pub renders: usize,
}

impl DisplayBackend for FakeDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.rows.clear();
        Ok(())
    }

    fn draw_text(&mut self, _row: u8, _col: u8, text: &str) -> Result<(), DisplayError> {
        self.rows.push(text.into());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.renders += 1;
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Console that records every line
#[derive(Default)]
pub struct FakeReporter {
    pub statuses: Vec<String>,
    pub responses: Vec<String>,
}

impl Reporter for FakeReporter {
    fn status(&mut self, line: &str) {
        self.statuses.push(line.into());
    }

    fn response(&mut self, text: &str) {
        self.responses.push(text.into());
    }
}

pub struct FakePlatform;

impl Platform for FakePlatform {
    type Link = FakeLink;
    type Connector = FakeConnector;
    type Display = FakeDisplay;
    type Reporter = FakeReporter;
    type Clock = FakeClock;
}

/// Fresh fakes sharing one clock; joins take 100 ms
pub fn fake_io() -> Io<FakePlatform> {
    let clock = FakeClock::default();
    let link = FakeLink {
        clock: clock.clone(),
        join_results: VecDeque::new(),
        join_duration_ms: 100,
        joins: Vec::new(),
        leaves: 0,
        up: false,
    };
    Io::new(
        link,
        FakeConnector::default(),
        FakeDisplay::default(),
        FakeReporter::default(),
        clock,
    )
}
