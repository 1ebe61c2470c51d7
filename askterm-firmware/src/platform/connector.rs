//! TCP connections over embassy-net

use defmt::*;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};

use askterm_core::config::ServerEndpoint;
use askterm_core::error::TransportError;
use askterm_core::traits::Connector;

/// Time allowed for the TCP handshake
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 1024;

/// One socket at a time, reusing the same buffers
pub struct TcpConnector {
    stack: Stack<'static>,
    /// Longest silence tolerated on an open connection; `None` waits for
    /// the server to close
    idle_timeout: Option<Duration>,
    rx_buffer: [u8; RX_BUFFER_SIZE],
    tx_buffer: [u8; TX_BUFFER_SIZE],
}

impl TcpConnector {
    /// `idle_timeout_ms` of 0 disables the idle timeout
    pub fn new(stack: Stack<'static>, idle_timeout_ms: u64) -> Self {
        Self {
            stack,
            idle_timeout: (idle_timeout_ms > 0).then(|| Duration::from_millis(idle_timeout_ms)),
            rx_buffer: [0; RX_BUFFER_SIZE],
            tx_buffer: [0; TX_BUFFER_SIZE],
        }
    }
}

impl Connector for TcpConnector {
    type Connection<'a> = TcpSocket<'a>;

    async fn connect(
        &mut self,
        endpoint: &ServerEndpoint,
    ) -> Result<TcpSocket<'_>, TransportError> {
        let address = endpoint.address().ok_or(TransportError::InvalidAddress)?;

        let mut socket = TcpSocket::new(self.stack, &mut self.rx_buffer, &mut self.tx_buffer);
        socket.set_timeout(self.idle_timeout);

        debug!("Connecting to {}:{}", endpoint.host.as_str(), endpoint.port);
        match with_timeout(CONNECT_TIMEOUT, socket.connect((address, endpoint.port))).await {
            Ok(Ok(())) => Ok(socket),
            Ok(Err(e)) => {
                warn!("TCP connect failed: {:?}", e);
                Err(TransportError::Refused)
            }
            Err(_) => {
                warn!("TCP connect timed out");
                Err(TransportError::Timeout)
            }
        }
    }
}
