//! Serial port commands — list, connect, disconnect

use std::sync::Arc;

use crate::adapters::SerialPortFactory;
use crate::domain::{LinkConfig, SerialPortInfo, TuxError, TuxResult};
use crate::engine::Session;
use crate::ports::SerialFactory;
use crate::state::AppState;

use super::link;

pub fn list_serial_ports() -> TuxResult<Vec<SerialPortInfo>> {
    SerialPortFactory::list_ports()
}

/// Open the port named in `config` and attach it.
pub fn connect_serial(state: &AppState, config: &LinkConfig) -> TuxResult<Arc<Session>> {
    let port = config.serial_port.as_deref().ok_or_else(|| {
        TuxError::Config(format!("Profile '{}' has no serial port set", config.name))
    })?;
    let connection = SerialPortFactory::open(port, config.baud_rate, config.read_timeout_ms)?;
    link::attach(state, connection, port)
}

pub fn disconnect_serial(state: &AppState) -> TuxResult<()> {
    link::detach(state)
}
