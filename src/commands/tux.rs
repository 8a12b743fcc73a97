//! Control-request dispatch.
//!
//! Maps the external control operations onto the attached session. Only
//! init, set-display and read-buttons exist; the LED acknowledge, LED
//! request and LED readback operations are refused here and never reach
//! the engine.

use std::sync::Arc;

use crate::domain::{TuxError, TuxResult};
use crate::engine::Session;
use crate::state::AppState;

/// One control request from outside.
#[derive(Debug)]
pub enum TuxRequest<'a> {
    Init,
    /// Raw 32-bit display word
    SetLed(u32),
    /// Destination for the button mask; `None` models a null pointer
    Buttons(Option<&'a mut u32>),
    LedAck,
    LedRequest,
    ReadLed,
}

/// Clone the attached session out of `state` so the state lock is not
/// held while the session works.
fn attached_session(state: &AppState) -> TuxResult<Arc<Session>> {
    state
        .session
        .lock()
        .map_err(|_| TuxError::State("session".into()))?
        .clone()
        .ok_or(TuxError::NotAttached)
}

/// Run one control request. Returns as soon as the request has been
/// recorded; nothing here waits on the controller.
pub fn dispatch(state: &AppState, request: TuxRequest<'_>) -> TuxResult<()> {
    match request {
        TuxRequest::LedAck => Err(TuxError::Unsupported("LED_ACK".into())),
        TuxRequest::LedRequest => Err(TuxError::Unsupported("LED_REQUEST".into())),
        TuxRequest::ReadLed => Err(TuxError::Unsupported("READ_LED".into())),
        TuxRequest::Init => {
            attached_session(state)?.initialize();
            Ok(())
        }
        TuxRequest::SetLed(value) => {
            attached_session(state)?.request_display(value);
            Ok(())
        }
        TuxRequest::Buttons(dest) => attached_session(state)?.read_buttons(dest),
    }
}
