//! CYW43439 station link

use core::net::Ipv4Addr;

use cyw43::JoinOptions;
use defmt::*;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Instant};

use askterm_core::config::Credentials;
use askterm_core::error::ConnectivityError;
use askterm_core::traits::WifiLink;

/// WiFi link backed by the cyw43 control handle and the embassy-net stack
pub struct CywLink {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
}

impl CywLink {
    pub fn new(control: cyw43::Control<'static>, stack: Stack<'static>) -> Self {
        Self { control, stack }
    }
}

impl WifiLink for CywLink {
    async fn join(
        &mut self,
        credentials: &Credentials,
        timeout_ms: u64,
    ) -> Result<(), ConnectivityError> {
        let started = Instant::now();
        let budget = Duration::from_millis(timeout_ms);

        let options = if credentials.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(credentials.password.as_bytes())
        };

        debug!("Joining {}", credentials.ssid.as_str());
        match with_timeout(budget, self.control.join(credentials.ssid.as_str(), options)).await {
            Err(_) => return Err(ConnectivityError::Timeout),
            Ok(Err(e)) => {
                warn!("Join rejected: {:?}", Debug2Format(&e));
                return Err(ConnectivityError::JoinFailed);
            }
            Ok(Ok(())) => {}
        }

        // DHCP gets whatever is left of the budget
        let remaining = budget
            .checked_sub(started.elapsed())
            .unwrap_or(Duration::from_ticks(0));
        if with_timeout(remaining, self.stack.wait_config_up()).await.is_err() {
            warn!("No DHCP lease within timeout");
            self.control.leave().await;
            return Err(ConnectivityError::NoAddress);
        }

        Ok(())
    }

    async fn leave(&mut self) {
        self.control.leave().await;
    }

    fn is_up(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.stack.config_v4().map(|config| config.address.address())
    }
}
