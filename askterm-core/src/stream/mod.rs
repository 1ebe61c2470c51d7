//! Streamed answer handling
//!
//! [`FrameReader`] pulls newline-delimited frames off a connection;
//! [`StreamConsumer`] turns them into tokens on the screen.

pub mod consumer;
pub mod reader;

pub use consumer::{FrameKind, StreamConsumer, StreamSession, MAX_RESPONSE_LEN};
pub use reader::FrameReader;
