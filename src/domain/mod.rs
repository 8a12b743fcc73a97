//! Core domain types
//!
//! Pure types with no I/O dependencies. These represent the display requests,
//! button snapshots and link settings the rest of the crate passes around.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
