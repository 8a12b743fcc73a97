//! MTCP wire protocol for the Tux controller.
//!
//! This module separates the three concerns of talking to the controller:
//! - `encode`: translate display requests / init → outbound frames (pure, no I/O)
//! - `decode`: translate inbound frames → `Event` (pure, no I/O)
//! - `framer`: carve 3-byte frames out of a raw byte stream
//!
//! Everything here is pure so it can be tested without any serial port.

pub mod decode;
pub mod encode;
pub mod framer;

pub use decode::{decode, remap_buttons};
pub use encode::{init, led_set};
pub use framer::PacketFramer;

/// Every packet the controller sends is exactly this long.
pub const INBOUND_FRAME_LEN: usize = 3;

/// Inbound frame, opcode first.
pub type Frame = [u8; INBOUND_FRAME_LEN];

const fn command_opcode(n: u8) -> u8 {
    0xC0 | (n & 0x7) | ((n & 0x18) << 1)
}

const fn response_opcode(n: u8) -> u8 {
    0x40 | (n & 0x7) | ((n & 0x18) << 1)
}

// Host → controller
/// Enable button interrupt-on-change
pub const BIOC_ON: u8 = command_opcode(0x03);
/// Disable button interrupt-on-change
pub const BIOC_OFF: u8 = command_opcode(0x04);
/// Set the LED display (followed by a position mask and segment bytes)
pub const LED_SET: u8 = command_opcode(0x06);
/// Put the LED display into user-driven mode
pub const LED_USR: u8 = command_opcode(0x08);

// Controller → host
pub const ACK: u8 = response_opcode(0x00);
pub const BIOC_EVENT: u8 = response_opcode(0x01);
pub const RESET: u8 = response_opcode(0x09);

/// Position selector for `LED_SET`: all four positions are always written.
pub const LED_SET_ALL_POSITIONS: u8 = 0x0F;

/// Bit of a segment byte that drives the decimal point.
pub const DECIMAL_POINT_SHIFT: u8 = 4;

/// Segment bytes for hex digits 0–F, matching the controller's wiring.
pub const SEGMENTS: [u8; 16] = [
    0xE7, 0x06, 0xCB, 0x8F, 0x2E, 0xAD, 0xED, 0x86, 0xEF, 0xAF, 0xEE, 0x6D, 0xE1, 0x4F, 0xE9,
    0xE8,
];

/// Unsolicited packets from the controller that the engine acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The previous command has been processed
    Acknowledge,
    /// Button state changed; carries the two raw status bytes
    ButtonChange { b: u8, c: u8 },
    /// The controller rebooted and lost its mode settings
    Reset,
}
