//! Configuration types and the embedded config file reader

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
