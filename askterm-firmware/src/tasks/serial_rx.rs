//! Console UART receive task
//!
//! Assembles typed lines and queues them for the control loop.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use askterm_core::command::{LineAssembler, LineError};

use crate::channels::INPUT_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Console RX task - turns UART bytes into `ControlInput::Line`
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match assembler.feed(byte) {
                        Ok(Some(input)) => {
                            debug!("Console input: {:?}", input);
                            if INPUT_CHANNEL.try_send(input).is_err() {
                                warn!("Input channel full, dropping line");
                            }
                        }
                        Ok(None) => {}
                        Err(LineError::TooLong) => warn!("Console line too long, dropped"),
                        Err(LineError::InvalidUtf8) => warn!("Console line not UTF-8, dropped"),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
