//! Receive loop: serial bytes → frames → `Session::on_frame`.
//!
//! Runs on its own thread and owns the read half of the link. The session
//! never waits on this thread; the thread only ever calls into the session.
//! Shutdown is an `AtomicBool` checked after every read, so stopping takes
//! at most one read timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::domain::{TuxError, TuxResult};
use crate::engine::Session;
use crate::mtcp::PacketFramer;
use crate::ports::SerialConnection;

/// Chunk size for each serial read call
const READ_CHUNK_SIZE: usize = 64;

/// Handle to a running receive thread.
pub struct LinkReader {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LinkReader {
    /// Start feeding `session` from `serial`.
    pub fn spawn(serial: Box<dyn SerialConnection>, session: Arc<Session>) -> TuxResult<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("tux-rx".into())
            .spawn(move || run_reader(serial, session, flag))
            .map_err(|e| TuxError::Serial(format!("Failed to start receive thread: {e}")))?;
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// False once stopped or once the link failed.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) -> TuxResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> TuxResult<()> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| TuxError::Serial("Receive thread panicked".into()))?;
        }
        Ok(())
    }
}

impl Drop for LinkReader {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("{e}");
        }
    }
}

fn run_reader(
    mut serial: Box<dyn SerialConnection>,
    session: Arc<Session>,
    running: Arc<AtomicBool>,
) {
    log::debug!("receive thread started");
    let mut framer = PacketFramer::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    while running.load(Ordering::SeqCst) {
        match serial.read(&mut chunk) {
            Ok(0) => {} // Timed out, line is quiet
            Ok(n) => {
                for frame in framer.extend(&chunk[..n]) {
                    session.on_frame(&frame);
                }
            }
            Err(e) => {
                log::error!("receive thread stopping: {e}");
                running.store(false, Ordering::SeqCst);
                break;
            }
        }
    }

    if let Err(e) = serial.close() {
        log::warn!("closing read half failed: {e}");
    }
    if framer.buffered() > 0 {
        log::debug!("dropping {} byte(s) of a partial packet", framer.buffered());
    }
    log::debug!("receive thread exited");
}
