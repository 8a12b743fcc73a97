//! Pure encoding: DisplayRequest → outbound MTCP frames.
//!
//! No I/O, no side effects.

use crate::domain::{DisplayRequest, DISPLAY_POSITIONS};

use super::{BIOC_ON, DECIMAL_POINT_SHIFT, LED_SET, LED_SET_ALL_POSITIONS, LED_USR, SEGMENTS};

/// Length of an `LED_SET` frame: opcode, position mask, four segment bytes.
pub const LED_SET_FRAME_LEN: usize = 2 + DISPLAY_POSITIONS;

/// The handshake sent on init and after a controller reset:
/// button interrupt-on-change on, LED display in user mode.
pub fn init() -> [u8; 2] {
    [BIOC_ON, LED_USR]
}

/// Segment byte for one display position.
///
/// A disabled position drops the digit glyph but keeps its decimal point.
pub fn segment_byte(request: &DisplayRequest, position: usize) -> u8 {
    let glyph = if request.is_enabled(position) {
        SEGMENTS[request.digit(position) as usize]
    } else {
        0
    };
    glyph | (u8::from(request.has_decimal_point(position)) << DECIMAL_POINT_SHIFT)
}

/// Build the `LED_SET` frame for a display request.
pub fn led_set(request: &DisplayRequest) -> [u8; LED_SET_FRAME_LEN] {
    let mut frame = [0u8; LED_SET_FRAME_LEN];
    frame[0] = LED_SET;
    frame[1] = LED_SET_ALL_POSITIONS;
    for position in 0..DISPLAY_POSITIONS {
        frame[2 + position] = segment_byte(request, position);
    }
    frame
}
