//! Acknowledgment gate: at most one display command in flight.
//!
//! The controller cannot buffer a second `LED_SET` while it is still
//! working on the first, and a round-trip at 9600 baud takes ~9ms. The gate
//! never queues: it remembers only the newest request and hands it out
//! the next time the link is free.
//!
//! The gate decides; it does not talk to the link. Every method that
//! returns `Some(request)` has moved the gate to `Pending`, and the caller
//! must transmit that request while still holding whatever lock guards
//! the gate.

use crate::domain::DisplayRequest;

/// Whether a display command is awaiting its acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Pending,
}

#[derive(Debug)]
pub struct AckGate {
    state: GateState,
    latest: DisplayRequest,
}

impl AckGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
            latest: DisplayRequest::BLANK,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// The request that will reach the controller next (or already has).
    pub fn latest(&self) -> DisplayRequest {
        self.latest
    }

    /// Back to power-on: idle, blank display remembered.
    pub fn clear(&mut self) {
        self.state = GateState::Idle;
        self.latest = DisplayRequest::BLANK;
    }

    /// Record `request` as the desired display and try to send it.
    ///
    /// Returns the request to transmit if the gate was idle. While pending
    /// the request only replaces the remembered one.
    pub fn request(&mut self, request: DisplayRequest) -> Option<DisplayRequest> {
        self.latest = request;
        self.try_send()
    }

    /// The in-flight command was acknowledged. The gate opens and the
    /// newest request goes straight back out.
    pub fn acknowledge(&mut self) -> Option<DisplayRequest> {
        self.state = GateState::Idle;
        self.try_send()
    }

    /// The controller rebooted; whatever was in flight is gone. The gate
    /// is forced open and the newest request is always handed back for
    /// retransmission, leaving the gate pending on that send.
    pub fn reset(&mut self) -> DisplayRequest {
        self.state = GateState::Pending;
        self.latest
    }

    fn try_send(&mut self) -> Option<DisplayRequest> {
        match self.state {
            GateState::Idle => {
                self.state = GateState::Pending;
                Some(self.latest)
            }
            GateState::Pending => None,
        }
    }
}

impl Default for AckGate {
    fn default() -> Self {
        Self::new()
    }
}
