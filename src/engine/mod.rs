//! Protocol engine for the Tux controller.
//!
//! - `buttons`: latest button snapshot, lock-free
//! - `gate`: at-most-one-in-flight flow control for display commands
//! - `session`: ties both to a link and reacts to controller events
//!
//! Two contexts drive a `Session`: the receive thread feeding decoded
//! events and any number of request callers. Neither ever waits on the
//! controller.

pub mod buttons;
pub mod gate;
pub mod session;

pub use buttons::ButtonStore;
pub use gate::{AckGate, GateState};
pub use session::Session;
