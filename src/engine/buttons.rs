//! Button state store

use std::sync::atomic::{AtomicU8, Ordering};

use crate::domain::Buttons;

/// Holds the last button mask decoded from the controller.
///
/// Written only by the receive path, read by anyone. Kept outside the
/// gate lock so a button read never contends with a display send.
#[derive(Debug)]
pub struct ButtonStore {
    bits: AtomicU8,
}

impl ButtonStore {
    pub fn new() -> Self {
        Self {
            bits: AtomicU8::new(Buttons::RELEASED.bits()),
        }
    }

    pub fn update(&self, buttons: Buttons) {
        self.bits.store(buttons.bits(), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Buttons {
        Buttons::from_bits(self.bits.load(Ordering::SeqCst))
    }

    pub fn reset(&self) {
        self.update(Buttons::RELEASED);
    }
}

impl Default for ButtonStore {
    fn default() -> Self {
        Self::new()
    }
}
