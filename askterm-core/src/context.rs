//! Explicit application context
//!
//! Everything the components share lives here and is passed to them by
//! reference: the configuration, the screen, the connection manager and the
//! last known model name. Board resources travel separately in [`Io`].

use askterm_display::{DisplayError, LineWrapBuffer};

use crate::config::DeviceConfig;
use crate::connection::ConnectionManager;
use crate::request::ModelName;
use crate::traits::{DisplayBackend, Platform};

/// Mutable application state
pub struct Context {
    pub config: DeviceConfig,
    pub screen: LineWrapBuffer,
    pub connection: ConnectionManager,
    pub model: ModelName,
}

impl Context {
    /// Build the context from a loaded configuration
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            screen: LineWrapBuffer::new(config.display.max_chars()),
            connection: ConnectionManager::new(&config.timing),
            model: ModelName::Unknown,
            config,
        }
    }

    /// Redraw the display if the screen changed since the last draw
    pub fn refresh<D: DisplayBackend>(&mut self, display: &mut D) -> Result<(), DisplayError> {
        if self.screen.is_dirty() {
            self.screen.render(display)?;
        }
        Ok(())
    }
}

/// Board resources used by the components
pub struct Io<P: Platform> {
    pub link: P::Link,
    pub connector: P::Connector,
    pub display: P::Display,
    pub reporter: P::Reporter,
    pub clock: P::Clock,
}

impl<P: Platform> Io<P> {
    pub fn new(
        link: P::Link,
        connector: P::Connector,
        display: P::Display,
        reporter: P::Reporter,
        clock: P::Clock,
    ) -> Self {
        Self {
            link,
            connector,
            display,
            reporter,
            clock,
        }
    }
}
