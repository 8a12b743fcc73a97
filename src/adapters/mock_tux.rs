//! Simulated Tux controller for development and testing without hardware.
//!
//! Activate from the CLI with `--mock`:
//!
//!   RUST_LOG=tuxctl_lib=info tuxctl run --mock
//!
//! The simulator parses every command the host writes, answers each one
//! with an `ACK` after roughly the time the bytes would take on a 9600 baud
//! line, and shows what the display would look like at INFO level. Button
//! presses and resets are injected through a [`MockTuxHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::domain::{TuxError, TuxResult};
use crate::mtcp::{Frame, ACK, BIOC_EVENT, BIOC_OFF, BIOC_ON, LED_SET, LED_USR, RESET};
use crate::ports::SerialConnection;

/// One byte at 9600 8N1 (10 bits on the wire).
const BYTE_TIME: Duration = Duration::from_micros(1042);

const IDLE_PAYLOAD: u8 = 0x80;

type Inbound = (Instant, Frame);

#[derive(Debug, Default)]
struct MockState {
    sent: Mutex<Vec<Vec<u8>>>,
    segments: Mutex<[u8; 4]>,
    auto_ack: AtomicBool,
}

/// The controller end of a simulated link.
pub struct MockTux {
    state: Arc<MockState>,
    inbound_tx: Sender<Inbound>,
    inbound_rx: Receiver<Inbound>,
    leftover: Vec<u8>,
    byte_time: Duration,
    read_timeout: Duration,
    connected: bool,
}

/// Test/demo handle onto a `MockTux` that stays valid after the
/// connection has been boxed and handed to a session.
#[derive(Clone)]
pub struct MockTuxHandle {
    state: Arc<MockState>,
    inbound_tx: Sender<Inbound>,
}

impl MockTux {
    pub fn new() -> Self {
        Self::with_byte_time(BYTE_TIME)
    }

    /// Simulate a line where each byte takes `byte_time` to arrive.
    pub fn with_byte_time(byte_time: Duration) -> Self {
        let (inbound_tx, inbound_rx) = crossbeam_channel::unbounded();
        let state = MockState::default();
        state.auto_ack.store(true, Ordering::SeqCst);
        log::info!("[MOCK TUX] powered on");
        Self {
            state: Arc::new(state),
            inbound_tx,
            inbound_rx,
            leftover: Vec::new(),
            byte_time,
            read_timeout: Duration::from_millis(100),
            connected: true,
        }
    }

    pub fn handle(&self) -> MockTuxHandle {
        MockTuxHandle {
            state: Arc::clone(&self.state),
            inbound_tx: self.inbound_tx.clone(),
        }
    }

    fn reply(&self, frame: Frame, sent_len: usize) {
        let on_wire = self.byte_time * (sent_len + frame.len()) as u32;
        // Receiver lives in self, so the channel cannot be disconnected here
        let _ = self.inbound_tx.send((Instant::now() + on_wire, frame));
    }

    fn handle_command(&self, data: &[u8]) {
        let Some(&opcode) = data.first() else {
            return;
        };
        match opcode {
            LED_SET if data.len() >= 6 => {
                let segments = [data[2], data[3], data[4], data[5]];
                *self.state.segments.lock().unwrap_or_else(|p| p.into_inner()) = segments;
                log::info!("[MOCK TUX] LED_SET → {}", render(&segments));
            }
            LED_SET => log::warn!("[MOCK TUX] truncated LED_SET ({} bytes)", data.len()),
            BIOC_ON => log::info!("[MOCK TUX] BIOC_ON"),
            BIOC_OFF => log::info!("[MOCK TUX] BIOC_OFF"),
            LED_USR => log::info!("[MOCK TUX] LED_USR"),
            other => log::warn!("[MOCK TUX] unknown command {other:#04x}"),
        }
        if self.state.auto_ack.load(Ordering::SeqCst) {
            self.reply([ACK, IDLE_PAYLOAD, IDLE_PAYLOAD], data.len());
        }
    }
}

impl Default for MockTux {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTuxHandle {
    /// Every write the host has made, in order.
    pub fn frames_sent(&self) -> Vec<Vec<u8>> {
        self.state.sent.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Segment bytes currently lit, position 0 first.
    pub fn segments(&self) -> [u8; 4] {
        *self.state.segments.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Stop (or resume) answering commands, leaving the host's gate pending.
    pub fn set_auto_ack(&self, enabled: bool) {
        self.state.auto_ack.store(enabled, Ordering::SeqCst);
    }

    /// Send a raw `BIOC_EVENT` with the given status bytes.
    pub fn button_event(&self, b: u8, c: u8) {
        let _ = self
            .inbound_tx
            .send((Instant::now(), [BIOC_EVENT, 0x80 | b, 0x80 | c]));
    }

    /// Reboot the controller: display goes dark and a `RESET` packet is sent.
    pub fn reset(&self) {
        *self.state.segments.lock().unwrap_or_else(|p| p.into_inner()) = [0; 4];
        log::info!("[MOCK TUX] reset");
        let _ = self
            .inbound_tx
            .send((Instant::now(), [RESET, IDLE_PAYLOAD, IDLE_PAYLOAD]));
    }
}

impl SerialConnection for MockTux {
    fn write(&mut self, data: &[u8]) -> TuxResult<usize> {
        if !self.connected {
            return Err(TuxError::Serial("mock link closed".into()));
        }
        self.state
            .sent
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(data.to_vec());
        // The init handshake carries two one-byte commands
        if data.len() == 2 && data[0] == BIOC_ON {
            self.handle_command(&data[..1]);
            self.handle_command(&data[1..]);
        } else {
            self.handle_command(data);
        }
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> TuxResult<usize> {
        if self.leftover.is_empty() {
            match self.inbound_rx.recv_timeout(self.read_timeout) {
                Ok((ready_at, frame)) => {
                    let now = Instant::now();
                    if ready_at > now {
                        std::thread::sleep(ready_at - now);
                    }
                    self.leftover.extend_from_slice(&frame);
                }
                Err(RecvTimeoutError::Timeout) => return Ok(0),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TuxError::Serial("mock link closed".into()))
                }
            }
        }
        let n = self.leftover.len().min(buffer.len());
        buffer[..n].copy_from_slice(&self.leftover[..n]);
        self.leftover.drain(..n);
        Ok(n)
    }

    fn try_clone(&self) -> TuxResult<Box<dyn SerialConnection>> {
        Ok(Box::new(MockTux {
            state: Arc::clone(&self.state),
            inbound_tx: self.inbound_tx.clone(),
            inbound_rx: self.inbound_rx.clone(),
            leftover: Vec::new(),
            byte_time: self.byte_time,
            read_timeout: self.read_timeout,
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

/// Rough text rendering of four segment bytes, leftmost position first.
fn render(segments: &[u8; 4]) -> String {
    segments
        .iter()
        .rev()
        .map(|&seg| {
            let glyph = crate::mtcp::SEGMENTS
                .iter()
                .position(|&s| s == seg & !0x10)
                .map(|d| char::from_digit(d as u32, 16).unwrap_or('?').to_ascii_uppercase())
                .unwrap_or(if seg & !0x10 == 0 { ' ' } else { '?' });
            if seg & 0x10 != 0 {
                format!("{glyph}.")
            } else {
                glyph.to_string()
            }
        })
        .collect()
}
