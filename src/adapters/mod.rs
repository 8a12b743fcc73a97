//! Adapters: implementations of the port traits plus the receive loop.

pub mod mock_tux;
pub mod reader;
pub mod serial_port;

pub use mock_tux::{MockTux, MockTuxHandle};
pub use reader::LinkReader;
pub use serial_port::SerialPortFactory;
