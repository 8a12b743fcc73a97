//! Tux controller host engine
//!
//! Talks to the serial Tux controller (4-digit 7-segment display, 8-button
//! pad) over its MTCP packet protocol at 9600 baud.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `mtcp/` - Wire protocol: opcodes, frame encode/decode, stream framing
//! - `engine/` - Protocol state: button store, acknowledgment gate, session
//! - `ports/` - Trait definitions (interfaces) for the serial transport
//! - `adapters/` - Implementations of ports (serialport, simulator) and the receive loop
//! - `commands/` - Request dispatch, attach/detach, profiles, status
//! - `state/` - Application state management

// Core domain (pure, no I/O)
pub mod domain;
pub mod engine;
pub mod mtcp;
pub mod ports;

// Adapters (external I/O)
pub mod adapters;

// Dispatch layer
pub mod commands;
pub mod state;
