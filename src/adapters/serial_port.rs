//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.
//! `SerialPortFactory` has no instance data, just static methods for
//! listing/opening ports.

use std::io::ErrorKind;
use std::time::Duration;

use crate::domain::{SerialPortInfo, TuxError, TuxResult};
use crate::ports::{SerialConnection, SerialFactory};

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports() -> TuxResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| TuxError::Serial(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn open(
        port: &str,
        baud_rate: u32,
        read_timeout_ms: u64,
    ) -> TuxResult<Box<dyn SerialConnection>> {
        // The controller talks 8N1 with no flow control
        let serial = serialport::new(port, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(read_timeout_ms))
            .open()
            .map_err(|e| TuxError::Serial(format!("Failed to open {port}: {e}")))?;

        log::info!("opened {port} at {baud_rate} baud");
        Ok(Box::new(SerialPortConnection {
            port: serial,
            connected: true,
        }))
    }
}

/// An open serial port connection wrapping the `serialport` crate.
pub struct SerialPortConnection {
    port: Box<dyn serialport::SerialPort>,
    connected: bool,
}

impl SerialConnection for SerialPortConnection {
    fn write(&mut self, data: &[u8]) -> TuxResult<usize> {
        use std::io::Write;
        self.port
            .write_all(data)
            .map_err(|e| TuxError::Serial(format!("Write failed: {e}")))?;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> TuxResult<usize> {
        use std::io::Read;
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            // Quiet line: the controller only talks when something happens
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(TuxError::Serial(format!("Read failed: {e}"))),
        }
    }

    fn try_clone(&self) -> TuxResult<Box<dyn SerialConnection>> {
        let port = self
            .port
            .try_clone()
            .map_err(|e| TuxError::Serial(format!("Failed to clone port: {e}")))?;
        Ok(Box::new(SerialPortConnection {
            port,
            connected: self.connected,
        }))
    }

    fn close(&mut self) -> TuxResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
