//! Console reporter over the UART, mirrored to defmt

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io::Write;

use askterm_core::traits::Reporter;

pub struct UartReporter {
    tx: BufferedUartTx,
}

impl UartReporter {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }

    /// Print a line followed by CRLF
    pub fn line(&mut self, text: &str) {
        if self.tx.write_all(text.as_bytes()).is_err() || self.tx.write_all(b"\r\n").is_err() {
            warn!("Console write failed");
        }
    }
}

impl Reporter for UartReporter {
    fn status(&mut self, line: &str) {
        info!("{}", line);
        self.line(line);
    }

    fn response(&mut self, text: &str) {
        debug!("Response: {} bytes", text.len());
        for part in text.split('\n') {
            self.line(part);
        }
    }
}
