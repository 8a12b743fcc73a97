//! Application state

use std::sync::{Arc, Mutex};

use crate::adapters::LinkReader;
use crate::engine::Session;

/// Everything tied to the currently attached controller.
///
/// At most one link is attached at a time; `commands::link` keeps the
/// three slots in step.
pub struct AppState {
    pub session: Mutex<Option<Arc<Session>>>,
    pub reader: Mutex<Option<LinkReader>>,
    pub port_name: Mutex<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
            reader: Mutex::new(None),
            port_name: Mutex::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
