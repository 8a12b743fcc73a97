//! Command handlers: the dispatch and lifecycle surface around the engine.

pub mod config;
pub mod link;
pub mod serial;
pub mod status;
pub mod tux;

pub use tux::{dispatch, TuxRequest};
