//! Token stream consumer
//!
//! The answer arrives as an HTTP head followed by one JSON object per line.
//! Head lines are dropped up to the bare `\r` separator. After that every
//! line that decodes to `{"response": ...}` is one token; anything else is
//! skipped without a word. The stream ends when the server closes the
//! connection, or when reading fails, which is handled the same way.

use askterm_display::LineWrapBuffer;
use askterm_protocol::{Frame, TokenFrame};
use embedded_io_async::Read;
use heapless::String;

use crate::traits::DisplayBackend;
use crate::ui::WAITING_LINE;

use super::reader::FrameReader;

/// Bound on the text kept for the console report
pub const MAX_RESPONSE_LEN: usize = 4096;

/// How a frame was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// HTTP head line, dropped
    Head,
    /// The blank line ending the head
    HeadEnd,
    /// A decoded token
    Token,
    /// Body line that was not a token frame
    Skipped,
    /// Empty body line
    Blank,
}

/// Per-request state and statistics
#[derive(Debug, Clone, Default)]
pub struct StreamSession {
    header_done: bool,
    first_token_seen: bool,
    response: String<MAX_RESPONSE_LEN>,
    truncated: bool,
    tokens: u32,
    skipped: u32,
    read_failed: bool,
}

impl StreamSession {
    /// Concatenation of every token received
    pub fn response(&self) -> &str {
        &self.response
    }

    /// True if the response outgrew [`MAX_RESPONSE_LEN`] and was cut
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// True once the head separator was seen
    pub fn header_done(&self) -> bool {
        self.header_done
    }

    /// Number of tokens decoded
    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    /// Body lines that were not token frames, oversized lines included
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// True if the stream ended with a read error
    pub fn read_failed(&self) -> bool {
        self.read_failed
    }

    fn accumulate(&mut self, token: &str) {
        if self.truncated {
            return;
        }
        if self.response.push_str(token).is_err() {
            for ch in token.chars() {
                if self.response.push(ch).is_err() {
                    break;
                }
            }
            self.truncated = true;
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StreamSession {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StreamSession {{ tokens: {}, skipped: {}, bytes: {}, truncated: {}, read_failed: {} }}",
            self.tokens,
            self.skipped,
            self.response.len(),
            self.truncated,
            self.read_failed,
        );
    }
}

/// Feeds decoded tokens into the screen
#[derive(Debug, Default)]
pub struct StreamConsumer {
    session: StreamSession,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session state so far
    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    /// Handle one frame
    pub fn feed_frame<const N: usize>(
        &mut self,
        frame: &Frame,
        screen: &mut LineWrapBuffer<N>,
    ) -> FrameKind {
        if !self.session.header_done {
            if frame.is_head_terminator() {
                self.session.header_done = true;
                return FrameKind::HeadEnd;
            }
            return FrameKind::Head;
        }

        let line = frame.trimmed();
        if line.is_empty() {
            return FrameKind::Blank;
        }

        match TokenFrame::decode_token(line) {
            Ok(token) => {
                if !self.session.first_token_seen {
                    self.session.first_token_seen = true;
                    screen.remove_last_if(WAITING_LINE);
                }
                screen.append_token(&token);
                self.session.accumulate(&token);
                self.session.tokens = self.session.tokens.saturating_add(1);
                FrameKind::Token
            }
            Err(_) => {
                self.session.skipped = self.session.skipped.saturating_add(1);
                FrameKind::Skipped
            }
        }
    }

    /// End the session; pushes the unterminated last line to the screen
    pub fn finish<const N: usize>(self, screen: &mut LineWrapBuffer<N>) -> StreamSession {
        screen.flush_residual();
        self.session
    }

    /// Consume `connection` until it ends, redrawing after every token
    ///
    /// Display errors do not stop the stream.
    pub async fn consume<R, D, const N: usize>(
        mut self,
        connection: R,
        screen: &mut LineWrapBuffer<N>,
        display: &mut D,
    ) -> StreamSession
    where
        R: Read,
        D: DisplayBackend,
    {
        let mut reader = FrameReader::new(connection);
        while let Some(frame) = reader.next_frame().await {
            if self.feed_frame(&frame, screen) == FrameKind::Token {
                screen.render(display).ok();
            }
        }

        self.session.skipped = self.session.skipped.saturating_add(reader.overflowed());
        self.session.read_failed = reader.read_failed();

        let session = self.finish(screen);
        screen.render(display).ok();
        session
    }
}
