//! Byte stream → 3-byte MTCP frames.
//!
//! The serial driver hands us bytes in whatever chunks it likes, and a
//! freshly opened port can start mid-packet. Packets are self-synchronizing:
//! the opcode byte has bit 7 clear and both payload bytes have bit 7 set.

use super::{Frame, INBOUND_FRAME_LEN};

const PAYLOAD_MARKER: u8 = 0x80;

fn is_opcode(byte: u8) -> bool {
    byte & PAYLOAD_MARKER == 0
}

/// Reassembles inbound packets one byte at a time.
#[derive(Debug, Default)]
pub struct PacketFramer {
    buf: Frame,
    len: usize,
}

impl PacketFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a frame when the third byte of a packet lands.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if is_opcode(byte) {
            if self.len != 0 {
                log::trace!("framer: resync, dropped {} partial byte(s)", self.len);
            }
            self.buf[0] = byte;
            self.len = 1;
            return None;
        }

        if self.len == 0 {
            log::trace!("framer: dropped stray payload byte {byte:#04x}");
            return None;
        }

        self.buf[self.len] = byte;
        self.len += 1;
        if self.len == INBOUND_FRAME_LEN {
            self.len = 0;
            return Some(self.buf);
        }
        None
    }

    /// Feed a chunk; returns every frame it completes, in order.
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().filter_map(|&b| self.push(b)).collect()
    }

    /// Bytes of a partial packet currently held.
    pub fn buffered(&self) -> usize {
        self.len
    }
}
