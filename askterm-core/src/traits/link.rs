//! Wireless network link

use core::net::Ipv4Addr;

use crate::config::Credentials;
use crate::error::ConnectivityError;

/// Station-mode wireless link
#[allow(async_fn_in_trait)]
pub trait WifiLink {
    /// Join the network and wait for an address
    ///
    /// Must give up with [`ConnectivityError::Timeout`] once `timeout_ms`
    /// has elapsed.
    async fn join(
        &mut self,
        credentials: &Credentials,
        timeout_ms: u64,
    ) -> Result<(), ConnectivityError>;

    /// Leave the current network; a no-op when not joined
    async fn leave(&mut self);

    /// Whether the link is still associated with an address
    fn is_up(&self) -> bool;

    /// Address assigned by DHCP
    fn local_address(&self) -> Option<Ipv4Addr>;
}
