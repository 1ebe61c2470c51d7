//! Retry timing and connection state
//!
//! Time comes in as milliseconds since boot so the manager can be driven by
//! a fake clock in tests.

use crate::config::TimingConfig;
use crate::error::ConnectivityError;
use crate::state::{ConnectionState, LinkEvent};

/// Owns network availability and decides when to try joining
///
/// - The first attempt is due immediately after boot.
/// - After a failed attempt or an explicit disconnect, the next one is due
///   a full retry interval later, counted from when the failure ended.
/// - [`request_immediate`](Self::request_immediate) makes the next attempt
///   due now, bypassing the timer.
/// - Nothing is due while an attempt is in flight or while connected.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionManager {
    state: ConnectionState,
    retry_interval_ms: u64,
    connect_timeout_ms: u64,
    /// Start of the current retry wait, `None` before the first attempt
    retry_from_ms: Option<u64>,
    /// Operator asked for an attempt now
    forced: bool,
    /// Attempts started since boot
    attempts: u32,
    last_error: Option<ConnectivityError>,
}

impl ConnectionManager {
    /// Create a manager in the Disconnected state
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            retry_interval_ms: timing.retry_interval_ms,
            connect_timeout_ms: timing.connect_timeout_ms,
            retry_from_ms: None,
            forced: false,
            attempts: 0,
            last_error: None,
        }
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True while questions may be sent
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Upper bound for one join attempt
    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms
    }

    /// Attempts started since boot
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Why the most recent attempt failed
    pub fn last_error(&self) -> Option<ConnectivityError> {
        self.last_error
    }

    /// When the next timed attempt becomes due
    ///
    /// `None` when no attempt is pending (connected or connecting).
    pub fn next_attempt_at(&self) -> Option<u64> {
        if self.state != ConnectionState::Disconnected {
            return None;
        }
        if self.forced {
            return Some(0);
        }
        Some(
            self.retry_from_ms
                .map_or(0, |t| t.saturating_add(self.retry_interval_ms)),
        )
    }

    /// Whether an attempt should start at `now_ms`
    pub fn attempt_due(&self, now_ms: u64) -> bool {
        self.next_attempt_at().is_some_and(|at| now_ms >= at)
    }

    /// Make the next attempt due immediately
    pub fn request_immediate(&mut self) {
        self.forced = true;
    }

    /// Enter Connecting if an attempt is due
    ///
    /// Returns false, and changes nothing, when no attempt may start.
    pub fn begin_attempt(&mut self, now_ms: u64) -> bool {
        if !self.attempt_due(now_ms) {
            return false;
        }
        self.forced = false;
        self.attempts = self.attempts.wrapping_add(1);
        self.apply(LinkEvent::AttemptStarted);
        true
    }

    /// Record the outcome of the attempt started by [`begin_attempt`](Self::begin_attempt)
    ///
    /// `now_ms` is when the attempt ended; a failure restarts the retry
    /// wait from there.
    pub fn finish_attempt(&mut self, result: Result<(), ConnectivityError>, now_ms: u64) {
        if self.state != ConnectionState::Connecting {
            return;
        }
        match result {
            Ok(()) => {
                self.last_error = None;
                self.apply(LinkEvent::AttemptSucceeded);
            }
            Err(e) => {
                self.last_error = Some(e);
                self.retry_from_ms = Some(now_ms);
                self.apply(LinkEvent::AttemptFailed(e));
            }
        }
    }

    /// Operator disconnect; the retry wait restarts at `now_ms`
    pub fn disconnect(&mut self, now_ms: u64) {
        self.forced = false;
        self.retry_from_ms = Some(now_ms);
        self.apply(LinkEvent::DisconnectRequested);
    }

    /// The link dropped while connected; retry after a full interval
    pub fn link_lost(&mut self, now_ms: u64) {
        if self.state == ConnectionState::Connected {
            self.retry_from_ms = Some(now_ms);
            self.apply(LinkEvent::LinkLost);
        }
    }

    fn apply(&mut self, event: LinkEvent) {
        self.state = self.state.transition(event);
    }
}
