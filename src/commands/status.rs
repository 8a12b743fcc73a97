//! Status command — snapshot of the attached link for display/logging

use serde::Serialize;

use crate::domain::{TuxError, TuxResult};
use crate::state::AppState;

/// Snapshot of runtime connection state, returned by `get_connection_status`.
#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub attached: bool,
    pub port: Option<String>,
    pub receiving: bool,
    pub ack_pending: bool,
    pub buttons: Option<u8>,
    pub display: Option<u32>,
}

pub fn get_connection_status(state: &AppState) -> TuxResult<ConnectionStatus> {
    let session = state
        .session
        .lock()
        .map_err(|_| TuxError::State("session".into()))?
        .clone();
    let port = state
        .port_name
        .lock()
        .map_err(|_| TuxError::State("port name".into()))?
        .clone();
    let receiving = state
        .reader
        .lock()
        .map_err(|_| TuxError::State("reader".into()))?
        .as_ref()
        .is_some_and(|r| r.is_running());

    Ok(ConnectionStatus {
        attached: session.is_some(),
        port,
        receiving,
        ack_pending: session.as_ref().is_some_and(|s| s.ack_pending()),
        buttons: session.as_ref().map(|s| s.buttons().bits()),
        display: session.as_ref().map(|s| s.pending_display().to_raw()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockTux;
    use crate::commands::link;

    #[test]
    fn detached_status_is_empty() {
        let status = get_connection_status(&AppState::new()).unwrap();
        assert!(!status.attached);
        assert!(!status.receiving);
        assert!(status.port.is_none());
        assert!(status.buttons.is_none());
    }

    #[test]
    fn attached_status_reports_session_state() {
        let state = AppState::new();
        let tux = MockTux::new();
        tux.handle().set_auto_ack(false);
        let session = link::attach(&state, Box::new(tux), "mock").unwrap();
        session.request_display(0x0001_0007);

        let status = get_connection_status(&state).unwrap();
        assert!(status.attached);
        assert!(status.receiving);
        assert!(status.ack_pending);
        assert_eq!(status.port.as_deref(), Some("mock"));
        assert_eq!(status.buttons, Some(0xFF));
        assert_eq!(status.display, Some(0x0001_0007));

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"ack_pending\":true"));
        link::detach(&state).unwrap();
    }
}
