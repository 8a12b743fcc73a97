//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory` — static methods for listing and opening ports
//! - `SerialConnection` — instance methods for reading/writing data

use crate::domain::{SerialPortInfo, TuxResult};

/// Factory for creating serial connections.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports() -> TuxResult<Vec<SerialPortInfo>>;

    /// Open a serial port at the given baud rate, returning a boxed connection
    fn open(
        port: &str,
        baud_rate: u32,
        read_timeout_ms: u64,
    ) -> TuxResult<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
/// Only requires `Send` (not `Sync`): the write half lives behind the
/// session's gate mutex and the read half is owned by the receive thread.
pub trait SerialConnection: Send {
    /// Write bytes to the port
    fn write(&mut self, data: &[u8]) -> TuxResult<usize>;

    /// Read bytes from the port. Returns `Ok(0)` when the read timed out.
    fn read(&mut self, buffer: &mut [u8]) -> TuxResult<usize>;

    /// Open a second handle onto the same link, used to split the
    /// receive side off from the write side.
    fn try_clone(&self) -> TuxResult<Box<dyn SerialConnection>>;

    /// Close the connection
    fn close(&mut self) -> TuxResult<()>;

    /// Check if the port is still connected
    fn is_connected(&self) -> bool;
}
