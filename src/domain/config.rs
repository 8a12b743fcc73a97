//! Link configuration profiles
//!
//! A LinkConfig is a saved profile describing how to reach one controller
//! (which serial port, at what speed, how long each read may wait).

use serde::{Deserialize, Serialize};

/// The controller only speaks 9600 8N1.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

fn default_read_timeout_ms() -> u64 {
    100
}

/// A saved link profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Profile name (e.g., "Lab bench", "Laptop USB")
    pub name: String,
    /// Serial port name, `None` until one has been picked
    pub serial_port: Option<String>,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Per-read timeout for the receive loop, in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}
