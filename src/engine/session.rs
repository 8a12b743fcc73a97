//! Session: one attached controller link and the protocol state around it.
//!
//! The gate, the remembered display request and the write half of the link
//! share one mutex, so "is the gate open? then send and close it" is a
//! single critical section no matter which context gets there first. The
//! button snapshot sits in its own atomic.
//!
//! Every method returns without waiting for the controller. Writes of at
//! most six bytes go straight into the serial driver's buffer.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{Buttons, DisplayRequest, TuxError, TuxResult};
use crate::mtcp::{self, Event, Frame};
use crate::ports::SerialConnection;

use super::{AckGate, ButtonStore, GateState};

struct Link {
    gate: AckGate,
    serial: Box<dyn SerialConnection>,
}

impl Link {
    /// Write a whole frame, continuing after short writes. Link failures
    /// belong to the transport, so they are logged and otherwise ignored.
    fn transmit(&mut self, frame: &[u8]) {
        log::debug!("MTCP TX: {frame:02X?}");
        let mut written = 0;
        while written < frame.len() {
            match self.serial.write(&frame[written..]) {
                Ok(0) => {
                    log::warn!("MTCP TX {frame:02X?} stalled after {written} byte(s)");
                    return;
                }
                Ok(n) => written += n,
                Err(e) => {
                    log::warn!("MTCP TX {frame:02X?} failed after {written} byte(s): {e}");
                    return;
                }
            }
        }
    }

    fn send_display(&mut self, request: DisplayRequest) {
        self.transmit(&mtcp::led_set(&request));
    }

    fn send_init(&mut self) {
        self.transmit(&mtcp::init());
    }
}

/// Protocol state for one attached controller.
pub struct Session {
    link: Mutex<Link>,
    buttons: ButtonStore,
}

impl Session {
    /// Wrap the write half of a link. Nothing is sent until `initialize`.
    pub fn new(serial: Box<dyn SerialConnection>) -> Self {
        Self {
            link: Mutex::new(Link {
                gate: AckGate::new(),
                serial,
            }),
            buttons: ButtonStore::new(),
        }
    }

    // A panic while holding the lock cannot leave the gate half-updated
    // (every transition is a single field store), so keep going.
    fn lock(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset all state to power-on defaults and send the init handshake.
    pub fn initialize(&self) {
        let mut link = self.lock();
        self.buttons.reset();
        link.gate.clear();
        link.send_init();
    }

    /// Ask for `value` to be shown. Sent now if the link is free, otherwise
    /// remembered and sent after the next acknowledgment.
    pub fn request_display(&self, value: u32) {
        let request = DisplayRequest::from_raw(value);
        let mut link = self.lock();
        if let Some(request) = link.gate.request(request) {
            link.send_display(request);
        } else {
            log::trace!("display {:#010x} deferred, command in flight", request.to_raw());
        }
    }

    /// Current button snapshot.
    pub fn buttons(&self) -> Buttons {
        self.buttons.snapshot()
    }

    /// Store the button snapshot into `dest`. A missing destination is
    /// rejected before anything is read.
    pub fn read_buttons(&self, dest: Option<&mut u32>) -> TuxResult<()> {
        let dest = dest.ok_or_else(|| {
            TuxError::InvalidArgument("buttons destination is missing".to_string())
        })?;
        *dest = u32::from(self.buttons.snapshot().bits());
        Ok(())
    }

    /// Receive-path entry point for one decoded event.
    pub fn on_event(&self, event: Event) {
        match event {
            Event::Acknowledge => {
                let mut link = self.lock();
                if let Some(request) = link.gate.acknowledge() {
                    link.send_display(request);
                }
            }
            Event::ButtonChange { b, c } => {
                let buttons = mtcp::remap_buttons(b, c);
                log::debug!("buttons: {:#04x}", buttons.bits());
                self.buttons.update(buttons);
            }
            Event::Reset => {
                log::info!("controller reset, restoring link mode and display");
                let mut link = self.lock();
                self.buttons.reset();
                link.send_init();
                let request = link.gate.reset();
                link.send_display(request);
            }
        }
    }

    /// Decode a raw frame and act on it. Unknown opcodes are dropped.
    pub fn on_frame(&self, frame: &Frame) {
        log::debug!("MTCP RX: {frame:02X?}");
        if let Some(event) = mtcp::decode(frame) {
            self.on_event(event);
        }
    }

    /// Whether a display command is awaiting acknowledgment.
    pub fn ack_pending(&self) -> bool {
        self.lock().gate.state() == GateState::Pending
    }

    /// The newest display request, sent or not.
    pub fn pending_display(&self) -> DisplayRequest {
        self.lock().gate.latest()
    }

    /// Close the write half of the link.
    pub fn close(&self) -> TuxResult<()> {
        self.lock().serial.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mtcp::{ACK, BIOC_EVENT, RESET};
    use std::sync::Arc;

    // ---------------------------------------------------------------------------
    // MockSerial for Session tests
    // ---------------------------------------------------------------------------

    struct MockSerial {
        log: Arc<Mutex<Vec<Vec<u8>>>>,
        fail_writes: bool,
    }

    impl SerialConnection for MockSerial {
        fn write(&mut self, data: &[u8]) -> TuxResult<usize> {
            self.log.lock().unwrap().push(data.to_vec());
            if self.fail_writes {
                return Err(TuxError::Serial("unplugged".into()));
            }
            Ok(data.len())
        }
        fn read(&mut self, _buf: &mut [u8]) -> TuxResult<usize> {
            Ok(0)
        }
        fn try_clone(&self) -> TuxResult<Box<dyn SerialConnection>> {
            Ok(Box::new(MockSerial {
                log: Arc::clone(&self.log),
                fail_writes: self.fail_writes,
            }))
        }
        fn close(&mut self) -> TuxResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    /// Accepts at most `limit` bytes per call, like a nearly full driver buffer.
    struct ShortWriteSerial {
        wire: Arc<Mutex<Vec<u8>>>,
        limit: usize,
    }

    impl SerialConnection for ShortWriteSerial {
        fn write(&mut self, data: &[u8]) -> TuxResult<usize> {
            let n = data.len().min(self.limit);
            self.wire.lock().unwrap().extend_from_slice(&data[..n]);
            Ok(n)
        }
        fn read(&mut self, _buf: &mut [u8]) -> TuxResult<usize> {
            Ok(0)
        }
        fn try_clone(&self) -> TuxResult<Box<dyn SerialConnection>> {
            Ok(Box::new(ShortWriteSerial {
                wire: Arc::clone(&self.wire),
                limit: self.limit,
            }))
        }
        fn close(&mut self) -> TuxResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    fn make_session() -> (Session, Arc<Mutex<Vec<Vec<u8>>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mock = MockSerial {
            log: Arc::clone(&log),
            fail_writes: false,
        };
        (Session::new(Box::new(mock)), log)
    }

    fn led(value: u32) -> Vec<u8> {
        mtcp::led_set(&DisplayRequest::from_raw(value)).to_vec()
    }

    fn init_frame() -> Vec<u8> {
        mtcp::init().to_vec()
    }

    // --- initialize ---

    #[test]
    fn initialize_sends_handshake_only() {
        let (session, log) = make_session();
        session.initialize();
        assert_eq!(*log.lock().unwrap(), vec![init_frame()]);
        assert!(!session.ack_pending());
        assert_eq!(session.pending_display(), DisplayRequest::BLANK);
        assert_eq!(session.buttons(), Buttons::RELEASED);
    }

    #[test]
    fn initialize_clears_previous_state() {
        let (session, _) = make_session();
        session.request_display(0x000F_1234);
        session.on_event(Event::ButtonChange { b: 0x00, c: 0x00 });
        session.initialize();
        assert!(!session.ack_pending());
        assert_eq!(session.pending_display(), DisplayRequest::BLANK);
        assert_eq!(session.buttons(), Buttons::RELEASED);
    }

    // --- request_display / gate ---

    #[test]
    fn first_request_is_sent_immediately() {
        let (session, log) = make_session();
        session.request_display(0x000F_1234);
        assert_eq!(*log.lock().unwrap(), vec![led(0x000F_1234)]);
        assert!(session.ack_pending());
    }

    #[test]
    fn requests_while_pending_are_superseded_not_queued() {
        let (session, log) = make_session();
        session.request_display(0x000F_0000);
        session.request_display(0x000F_1111); // X
        session.request_display(0x000F_2222); // Y
        assert_eq!(log.lock().unwrap().len(), 1);

        session.on_event(Event::Acknowledge);
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1], led(0x000F_2222));
    }

    #[test]
    fn acknowledge_retransmits_latest_and_stays_pending() {
        let (session, log) = make_session();
        session.request_display(0x0001_0005);
        session.on_event(Event::Acknowledge);
        assert!(session.ack_pending());
        assert_eq!(log.lock().unwrap()[1], led(0x0001_0005));
    }

    #[test]
    fn write_failure_does_not_fail_request() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(Box::new(MockSerial {
            log: Arc::clone(&log),
            fail_writes: true,
        }));
        session.request_display(0x000F_4321);
        assert!(session.ack_pending());
        assert_eq!(session.pending_display().to_raw(), 0x000F_4321);
    }

    #[test]
    fn short_writes_still_put_whole_frame_on_wire() {
        let wire = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(Box::new(ShortWriteSerial {
            wire: Arc::clone(&wire),
            limit: 3,
        }));
        session.request_display(0x000F_1234);
        assert_eq!(*wire.lock().unwrap(), led(0x000F_1234));
        assert!(session.ack_pending());
    }

    #[test]
    fn stalled_write_gives_up_without_blocking() {
        let wire = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(Box::new(ShortWriteSerial {
            wire: Arc::clone(&wire),
            limit: 0,
        }));
        session.initialize();
        session.request_display(0x000F_1234);
        assert!(wire.lock().unwrap().is_empty());
        assert!(session.ack_pending());
    }

    // --- Reset ---

    #[test]
    fn reset_from_idle_reinitializes_and_resends() {
        let (session, log) = make_session();
        session.on_event(Event::Reset);
        assert_eq!(*log.lock().unwrap(), vec![init_frame(), led(0)]);
        assert!(session.ack_pending());
    }

    #[test]
    fn reset_from_pending_reinitializes_and_resends_latest() {
        let (session, log) = make_session();
        session.request_display(0x000F_00AA);
        session.request_display(0x0F0F_00BB);
        log.lock().unwrap().clear();

        session.on_event(Event::Reset);
        assert_eq!(*log.lock().unwrap(), vec![init_frame(), led(0x0F0F_00BB)]);
        assert!(session.ack_pending());
    }

    #[test]
    fn reset_releases_buttons() {
        let (session, _) = make_session();
        session.on_event(Event::ButtonChange { b: 0x80, c: 0x80 });
        session.on_event(Event::Reset);
        assert_eq!(session.buttons(), Buttons::RELEASED);
    }

    // --- Buttons ---

    #[test]
    fn button_change_updates_snapshot() {
        let (session, log) = make_session();
        session.on_event(Event::ButtonChange { b: 0x1, c: 0x0 });
        assert_eq!(session.buttons().bits(), 0x01);
        session.on_event(Event::ButtonChange { b: 0x0, c: 0x8 });
        assert_eq!(session.buttons().bits(), 0x80);
        assert!(log.lock().unwrap().is_empty(), "button events send nothing");
    }

    #[test]
    fn read_buttons_writes_destination() {
        let (session, _) = make_session();
        session.on_event(Event::ButtonChange { b: 0x8E, c: 0x8F });
        let mut out = 0u32;
        session.read_buttons(Some(&mut out)).unwrap();
        assert_eq!(out, 0xFE);
    }

    #[test]
    fn read_buttons_before_any_event_returns_released() {
        let (session, _) = make_session();
        let mut out = 0u32;
        session.read_buttons(Some(&mut out)).unwrap();
        assert_eq!(out, 0xFF);
    }

    #[test]
    fn read_buttons_rejects_missing_destination() {
        let (session, log) = make_session();
        let result = session.read_buttons(None);
        assert!(matches!(result, Err(TuxError::InvalidArgument(_))));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(session.buttons(), Buttons::RELEASED);
    }

    #[test]
    fn read_buttons_does_not_touch_gate() {
        let (session, _) = make_session();
        session.request_display(0x000F_0001);
        let mut out = 0u32;
        session.read_buttons(Some(&mut out)).unwrap();
        assert!(session.ack_pending());
        assert_eq!(session.pending_display().to_raw(), 0x000F_0001);
    }

    // --- on_frame ---

    #[test]
    fn on_frame_routes_decoded_events() {
        let (session, log) = make_session();
        session.on_frame(&[BIOC_EVENT, 0x81, 0x88]);
        assert_eq!(session.buttons().bits(), 0x81);

        session.on_frame(&[RESET, 0x80, 0x80]);
        session.on_frame(&[ACK, 0x80, 0x80]);
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn on_frame_ignores_unknown_opcodes() {
        let (session, log) = make_session();
        session.on_frame(&[0x42, 0x80, 0x80]);
        assert!(log.lock().unwrap().is_empty());
        assert!(!session.ack_pending());
    }

    // --- Non-blocking ---

    #[test]
    fn never_acknowledged_gate_does_not_block_requests() {
        let (session, log) = make_session();
        for value in 0..10_000u32 {
            session.request_display(value);
        }
        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(session.pending_display(), DisplayRequest::from_raw(9_999));
    }
}
