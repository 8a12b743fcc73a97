//! Attach/detach lifecycle for a controller link.
//!
//! Attaching splits the connection: the write half goes into a new
//! `Session`, the read half to a `LinkReader` thread feeding that session.
//! Detaching stops the thread before dropping the session, so no event can
//! arrive at a session that is going away.

use std::sync::Arc;

use crate::adapters::LinkReader;
use crate::domain::{TuxError, TuxResult};
use crate::engine::Session;
use crate::ports::SerialConnection;
use crate::state::AppState;

/// Attach `serial` as the active link, replacing any previous one.
pub fn attach(
    state: &AppState,
    serial: Box<dyn SerialConnection>,
    port_name: &str,
) -> TuxResult<Arc<Session>> {
    detach(state)?;

    let read_half = serial.try_clone()?;
    let session = Arc::new(Session::new(serial));
    let reader = LinkReader::spawn(read_half, Arc::clone(&session))?;

    *state
        .reader
        .lock()
        .map_err(|_| TuxError::State("reader".into()))? = Some(reader);
    *state
        .session
        .lock()
        .map_err(|_| TuxError::State("session".into()))? = Some(Arc::clone(&session));
    *state
        .port_name
        .lock()
        .map_err(|_| TuxError::State("port name".into()))? = Some(port_name.to_string());

    log::info!("attached controller on {port_name}");
    Ok(session)
}

/// Stop the receive thread and drop the session. A no-op when nothing is
/// attached.
///
/// The state slots are emptied and the session closed even when the
/// receive thread fails to join; that failure is reported afterwards.
pub fn detach(state: &AppState) -> TuxResult<()> {
    let reader = state
        .reader
        .lock()
        .map_err(|_| TuxError::State("reader".into()))?
        .take();
    let stopped = reader.map_or(Ok(()), LinkReader::stop);

    let session = state
        .session
        .lock()
        .map_err(|_| TuxError::State("session".into()))?
        .take();
    let port = state
        .port_name
        .lock()
        .map_err(|_| TuxError::State("port name".into()))?
        .take();

    if let Some(session) = session {
        session.close()?;
        log::info!("detached controller from {}", port.unwrap_or_default());
    }
    stopped
}
