//! Pull-based frame iterator over an async byte stream

use askterm_protocol::{Frame, FrameError, LineFramer};
use embedded_io_async::Read;

/// Bytes requested from the connection per read
const CHUNK_LEN: usize = 128;

/// Yields frames until the connection ends
///
/// End of stream and read errors are treated alike: both end the iteration
/// normally, after delivering any unterminated last line.
pub struct FrameReader<R> {
    reader: R,
    framer: LineFramer,
    chunk: [u8; CHUNK_LEN],
    start: usize,
    end: usize,
    closed: bool,
    read_failed: bool,
    overflowed: u32,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            framer: LineFramer::new(),
            chunk: [0; CHUNK_LEN],
            start: 0,
            end: 0,
            closed: false,
            read_failed: false,
            overflowed: 0,
        }
    }

    /// Next complete frame, or `None` once the connection has ended
    pub async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            while self.start < self.end {
                let byte = self.chunk[self.start];
                self.start += 1;
                match self.framer.feed(byte) {
                    Ok(Some(frame)) => return Some(frame),
                    Ok(None) => {}
                    Err(FrameError::Overflow) => {
                        self.overflowed = self.overflowed.saturating_add(1)
                    }
                }
            }

            if self.closed {
                return self.framer.finish();
            }

            match self.reader.read(&mut self.chunk).await {
                Ok(0) => self.closed = true,
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                }
                Err(_) => {
                    self.read_failed = true;
                    self.closed = true;
                }
            }
        }
    }

    /// True once the connection has ended
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True if the stream ended with a read error instead of a clean close
    pub fn read_failed(&self) -> bool {
        self.read_failed
    }

    /// Lines dropped for exceeding the frame size
    pub fn overflowed(&self) -> u32 {
        self.overflowed
    }
}
