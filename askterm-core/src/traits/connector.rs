//! TCP connections to the bridge server

use embedded_io_async::{Read, Write};

use crate::config::ServerEndpoint;
use crate::error::TransportError;

/// Opens byte-stream connections
///
/// A connection closes when dropped. Reads return `Ok(0)` once the peer has
/// closed its side.
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Connection<'a>: Read + Write
    where
        Self: 'a;

    /// Connect to `endpoint`
    async fn connect(
        &mut self,
        endpoint: &ServerEndpoint,
    ) -> Result<Self::Connection<'_>, TransportError>;
}
