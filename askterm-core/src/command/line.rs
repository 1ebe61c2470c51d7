//! Console line assembly
//!
//! Bytes arrive from the UART in arbitrary chunks; `\r`, `\n` or both end a
//! line. Lines that do not fit are dropped whole rather than cut, so a
//! half-received command is never executed.

use heapless::{String, Vec};

use super::{ControlInput, MAX_INPUT_LEN};

/// Errors reported while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// The line exceeded `MAX_INPUT_LEN` bytes and was dropped
    TooLong,
    /// The line was not valid UTF-8 and was dropped
    InvalidUtf8,
}

/// Byte-at-a-time console line collector
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: Vec<u8, MAX_INPUT_LEN>,
    overflowed: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(input))` when a terminator completes a non-blank
    /// line, `Ok(None)` otherwise. An error is returned once, at the
    /// terminator of a rejected line.
    pub fn feed(&mut self, byte: u8) -> Result<Option<ControlInput>, LineError> {
        if byte != b'\r' && byte != b'\n' {
            if !self.overflowed && self.buffer.push(byte).is_err() {
                self.overflowed = true;
            }
            return Ok(None);
        }

        if core::mem::take(&mut self.overflowed) {
            self.buffer.clear();
            return Err(LineError::TooLong);
        }

        let bytes = core::mem::take(&mut self.buffer);
        let text = core::str::from_utf8(&bytes).map_err(|_| LineError::InvalidUtf8)?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let mut line: String<MAX_INPUT_LEN> = String::new();
        // Cannot fail: same capacity as the byte buffer
        let _ = line.push_str(text);
        Ok(Some(ControlInput::Line(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec as StdVec;

    fn feed_all(assembler: &mut LineAssembler, bytes: &[u8]) -> StdVec<Result<Option<ControlInput>, LineError>> {
        bytes
            .iter()
            .map(|&b| assembler.feed(b))
            .filter(|r| !matches!(r, Ok(None)))
            .collect()
    }

    fn line(text: &str) -> ControlInput {
        ControlInput::Line(String::try_from(text).unwrap())
    }

    #[test]
    fn test_crlf_yields_one_line() {
        let mut assembler = LineAssembler::new();
        let out = feed_all(&mut assembler, b"status\r\n");
        assert_eq!(out, [Ok(Some(line("status")))]);
    }

    #[test]
    fn test_lines_split_across_chunks() {
        let mut assembler = LineAssembler::new();
        assert!(feed_all(&mut assembler, b"setport:").is_empty());
        let out = feed_all(&mut assembler, b"6000\nconnect\r");
        assert_eq!(out, [Ok(Some(line("setport:6000"))), Ok(Some(line("connect")))]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut assembler = LineAssembler::new();
        assert!(feed_all(&mut assembler, b"\r\n  \n\n").is_empty());
    }

    #[test]
    fn test_overlong_line_is_dropped_whole() {
        let mut assembler = LineAssembler::new();
        let mut bytes = StdVec::from([b'q'; MAX_INPUT_LEN + 10]);
        bytes.extend_from_slice(b"\nstatus\n");

        let out = feed_all(&mut assembler, &bytes);
        assert_eq!(out, [Err(LineError::TooLong), Ok(Some(line("status")))]);
    }

    #[test]
    fn test_line_of_exact_capacity_is_kept() {
        let mut assembler = LineAssembler::new();
        let mut bytes = StdVec::from([b'a'; MAX_INPUT_LEN]);
        bytes.push(b'\n');

        let out = feed_all(&mut assembler, &bytes);
        assert_eq!(out.len(), 1);
        match &out[0] {
            Ok(Some(ControlInput::Line(text))) => assert_eq!(text.len(), MAX_INPUT_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut assembler = LineAssembler::new();
        let out = feed_all(&mut assembler, b"\xff\xfe\nok\n");
        assert_eq!(out, [Err(LineError::InvalidUtf8), Ok(Some(line("ok")))]);
    }
}
