//! Requests to the bridge server

pub mod dispatcher;
pub mod model;

pub use dispatcher::ask;
pub use model::{fetch_model, ModelName};
