//! Platform abstraction traits
//!
//! These traits define the interface between the application logic and the
//! board: the wireless link, TCP connections, the console, and time. The
//! display seam lives in `askterm-display`.

pub mod clock;
pub mod connector;
pub mod link;
pub mod report;

pub use askterm_display::DisplayBackend;
pub use clock::Clock;
pub use connector::Connector;
pub use link::WifiLink;
pub use report::Reporter;

/// Bundles the concrete types of one board
///
/// Lets components take a single generic parameter instead of five.
pub trait Platform {
    type Link: WifiLink;
    type Connector: Connector;
    type Display: DisplayBackend;
    type Reporter: Reporter;
    type Clock: Clock;
}
