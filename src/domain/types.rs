//! Core domain types

use serde::{Deserialize, Serialize};

/// One of the four 7-segment positions, 0 = rightmost.
pub const DISPLAY_POSITIONS: usize = 4;

/// A display update, decomposed from the 32-bit request word.
///
/// Layout of the request word:
/// - bits 15:0:  four hex digits, position `i` in bits `4i+3..4i`
/// - bits 19:16: digit-enable mask, bit `i` for position `i`
/// - bits 27:24: decimal-point mask, bit `i` for position `i`
///
/// Everything else is ignored. A disabled position still lights its
/// decimal point when the matching bit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayRequest {
    digits: [u8; DISPLAY_POSITIONS],
    enabled: u8,
    decimal_points: u8,
}

impl DisplayRequest {
    /// Nothing lit.
    pub const BLANK: Self = Self {
        digits: [0; DISPLAY_POSITIONS],
        enabled: 0,
        decimal_points: 0,
    };

    pub fn new(digits: [u8; DISPLAY_POSITIONS], enabled: u8, decimal_points: u8) -> Self {
        Self {
            digits: digits.map(|d| d & 0xF),
            enabled: enabled & 0xF,
            decimal_points: decimal_points & 0xF,
        }
    }

    /// Decompose a raw request word.
    pub fn from_raw(value: u32) -> Self {
        let mut digits = [0u8; DISPLAY_POSITIONS];
        for (i, digit) in digits.iter_mut().enumerate() {
            *digit = ((value >> (4 * i)) & 0xF) as u8;
        }
        Self {
            digits,
            enabled: ((value >> 16) & 0xF) as u8,
            decimal_points: ((value >> 24) & 0xF) as u8,
        }
    }

    /// Re-pack into the canonical request word (ignored bits cleared).
    pub fn to_raw(&self) -> u32 {
        let digits = self
            .digits
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &d)| acc | (u32::from(d) << (4 * i)));
        digits | (u32::from(self.enabled) << 16) | (u32::from(self.decimal_points) << 24)
    }

    /// Hex digit stored for `position`, whether or not it is enabled.
    pub fn digit(&self, position: usize) -> u8 {
        self.digits[position]
    }

    pub fn is_enabled(&self, position: usize) -> bool {
        (self.enabled >> position) & 0x1 == 1
    }

    pub fn has_decimal_point(&self, position: usize) -> bool {
        (self.decimal_points >> position) & 0x1 == 1
    }
}

/// The eight pad buttons, by bit position in [`Buttons`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Start = 0,
    A = 1,
    B = 2,
    C = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Start,
        Button::A,
        Button::B,
        Button::C,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Button snapshot: `{right, left, down, up, C, B, A, start}`, bit 7 to bit 0.
///
/// The value is exactly what the controller reported after remapping; the
/// pad is active-low, so [`Buttons::RELEASED`] (all ones) means nothing is
/// held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(u8);

impl Buttons {
    pub const RELEASED: Self = Self(0xFF);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Whether the bit for `button` is set in the snapshot.
    pub fn is_set(&self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }
}

impl Default for Buttons {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// Information about a serial port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialPortInfo {
    pub name: String,
    pub port_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_splits_digits_and_masks() {
        let req = DisplayRequest::from_raw(0x0A0F_1234);
        assert_eq!(req.digit(0), 0x4);
        assert_eq!(req.digit(1), 0x3);
        assert_eq!(req.digit(2), 0x2);
        assert_eq!(req.digit(3), 0x1);
        assert!(req.is_enabled(0) && req.is_enabled(3));
        assert!(!req.has_decimal_point(0));
        assert!(req.has_decimal_point(1));
        assert!(!req.has_decimal_point(2));
        assert!(req.has_decimal_point(3));
    }

    #[test]
    fn from_raw_ignores_undefined_bits() {
        let noisy = DisplayRequest::from_raw(0xF5F3_ABCD);
        let clean = DisplayRequest::from_raw(0x0503_ABCD);
        assert_eq!(noisy, clean);
        assert_eq!(noisy.to_raw(), 0x0503_ABCD);
    }

    #[test]
    fn new_masks_out_of_range_fields() {
        let req = DisplayRequest::new([0x1F, 2, 3, 4], 0xF1, 0x32);
        assert_eq!(req.digit(0), 0xF);
        assert_eq!(req.to_raw(), 0x0201_432F);
    }

    #[test]
    fn blank_is_zero() {
        assert_eq!(DisplayRequest::BLANK.to_raw(), 0);
        assert_eq!(DisplayRequest::default(), DisplayRequest::BLANK);
    }

    #[test]
    fn button_masks_follow_pad_layout() {
        assert_eq!(Button::Start.mask(), 0x01);
        assert_eq!(Button::C.mask(), 0x08);
        assert_eq!(Button::Up.mask(), 0x10);
        assert_eq!(Button::Right.mask(), 0x80);
    }

    #[test]
    fn buttons_default_to_released() {
        let buttons = Buttons::default();
        assert_eq!(buttons.bits(), 0xFF);
        assert!(Button::ALL.iter().all(|&b| buttons.is_set(b)));
    }
}
