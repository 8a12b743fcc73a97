//! Pure decoding: inbound MTCP frame → Event.
//!
//! No I/O, no side effects. Opcodes the engine has no use for (clock
//! events, poll replies, debug chatter) decode to `None`.

use crate::domain::Buttons;

use super::{Event, Frame, ACK, BIOC_EVENT, RESET};

/// Decode one 3-byte frame from the controller.
pub fn decode(frame: &Frame) -> Option<Event> {
    let [opcode, b, c] = *frame;
    match opcode {
        ACK => Some(Event::Acknowledge),
        BIOC_EVENT => Some(Event::ButtonChange { b, c }),
        RESET => Some(Event::Reset),
        _ => None,
    }
}

/// Fold the two `BIOC_EVENT` status bytes into one button mask.
///
/// ```text
/// b:  | 1 x x x | C     | B    | A    | start |
/// c:  | 1 x x x | right | down | left | up    |
/// out:| right | left | down | up | C | B | A | start |
/// ```
pub fn remap_buttons(b: u8, c: u8) -> Buttons {
    let left = (c >> 1) & 0x1;
    let down = (c >> 2) & 0x1;
    let high = (left << 2) | (down << 1) | (c & 0x9);
    Buttons::from_bits((b & 0xF) | (high << 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Button;

    #[test]
    fn decode_ack() {
        assert_eq!(decode(&[ACK, 0x80, 0x80]), Some(Event::Acknowledge));
    }

    #[test]
    fn decode_button_event_carries_raw_bytes() {
        assert_eq!(
            decode(&[BIOC_EVENT, 0x8E, 0x87]),
            Some(Event::ButtonChange { b: 0x8E, c: 0x87 })
        );
    }

    #[test]
    fn decode_reset() {
        assert_eq!(decode(&[RESET, 0x80, 0x80]), Some(Event::Reset));
    }

    #[test]
    fn decode_unknown_opcode_is_ignored() {
        // MTCP_CLK_EVENT and MTCP_POLL_OK are valid packets the engine skips
        assert_eq!(decode(&[0x42, 0x80, 0x80]), None);
        assert_eq!(decode(&[0x47, 0x80, 0x80]), None);
        assert_eq!(decode(&[0x00, 0x00, 0x00]), None);
    }

    #[test]
    fn remap_start_only() {
        assert_eq!(remap_buttons(0x1, 0x0).bits(), 0x01);
    }

    #[test]
    fn remap_right_only() {
        assert_eq!(remap_buttons(0x0, 0x8).bits(), 0x80);
    }

    #[test]
    fn remap_direction_bits_cross_over() {
        // c bit 0 = up, bit 1 = left, bit 2 = down, bit 3 = right
        assert_eq!(remap_buttons(0x0, 0x1).bits(), Button::Up.mask());
        assert_eq!(remap_buttons(0x0, 0x2).bits(), Button::Left.mask());
        assert_eq!(remap_buttons(0x0, 0x4).bits(), Button::Down.mask());
        assert_eq!(remap_buttons(0x0, 0x8).bits(), Button::Right.mask());
    }

    #[test]
    fn remap_ignores_high_nibbles() {
        assert_eq!(remap_buttons(0xF5, 0x8A), remap_buttons(0x05, 0x0A));
    }

    #[test]
    fn remap_all_high_is_released() {
        assert_eq!(remap_buttons(0x8F, 0x8F), Buttons::RELEASED);
    }

    #[test]
    fn remap_matches_reference_formula_for_all_pairs() {
        for b in 0u8..=0xFF {
            for c in 0u8..=0xFF {
                let expected = (b & 0xF)
                    | (((((c >> 1) & 1) << 2) | (((c >> 2) & 1) << 1) | (c & 0x9)) << 4);
                assert_eq!(remap_buttons(b, c).bits(), expected, "b={b:#04x} c={c:#04x}");
            }
        }
    }
}
