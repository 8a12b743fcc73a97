//! Port traits (interfaces)
//!
//! These traits define the boundary between the protocol engine and the
//! byte-stream transport. Adapters implement them to reach real hardware.

pub mod serial;

pub use serial::*;
