//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page).
//!
//! This is the representation the CH9329 bridge chip expects inside a
//! keyboard report.  Browser key codes are translated to these values in
//! [`crate::keymap::browser`].
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! # What is a HID Usage ID? (for beginners)
//!
//! The **USB Human Interface Device (HID)** standard assigns a number to every
//! key on a keyboard.  A boot-protocol keyboard report carries up to six of
//! these numbers at once, plus one byte of modifier flags:
//!
//! | Key          | HID Usage ID |
//! |--------------|-------------|
//! | Letter A     | 0x04        |
//! | Enter        | 0x28        |
//! | Left Ctrl    | 0xE0        |
//!
//! HID codes represent **physical key positions**, not characters.  Typing a
//! `!` is "Shift held + the `1` key", which is why the text encoders carry a
//! separate modifier key alongside the base key.
//!
//! # Modifiers
//!
//! The eight modifier keys (0xE0–0xE7) never occupy one of the six key slots.
//! Each one owns a single bit in the report's first byte instead; the bit
//! index is the usage ID minus 0xE0.

use serde::{Deserialize, Serialize};

/// USB HID Usage ID for keyboard keys (page 0x07).
///
/// The numeric value of each variant is its HID Usage ID.
/// [`HidKeyCode::Unknown`] (0x00) doubles as the "no key" filler in empty
/// report slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HidKeyCode {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control keys and punctuation (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x47–0x52)
    ScrollLock = 0x47,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    NumLock = 0x53,

    // Modifier keys (HID 0xE0–0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,

    /// No key.  Used for unmapped input and for empty report slots.
    Unknown = 0x00,
}

impl HidKeyCode {
    /// Returns the raw HID Usage ID as a byte, ready for a report slot.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for the eight modifier keys (0xE0–0xE7).
    pub fn is_modifier(self) -> bool {
        (0xE0..=0xE7).contains(&self.as_u8())
    }

    /// Returns the modifier-byte bit owned by this key, or `None` for
    /// ordinary keys.
    ///
    /// Left Ctrl is bit 0 (0x01), Left Shift bit 1 (0x02), and so on up to
    /// Right Meta at bit 7 (0x80).
    pub fn modifier_bit(self) -> Option<u8> {
        if self.is_modifier() {
            Some(1 << (self.as_u8() - 0xE0))
        } else {
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_u8_returns_usage_id() {
        assert_eq!(HidKeyCode::KeyA.as_u8(), 0x04);
        assert_eq!(HidKeyCode::Enter.as_u8(), 0x28);
        assert_eq!(HidKeyCode::F12.as_u8(), 0x45);
        assert_eq!(HidKeyCode::MetaRight.as_u8(), 0xE7);
    }

    #[test]
    fn test_unknown_is_the_empty_slot_value() {
        assert_eq!(HidKeyCode::Unknown.as_u8(), 0x00);
        assert!(!HidKeyCode::Unknown.is_modifier());
    }

    #[test]
    fn test_modifier_bits_follow_usage_order() {
        let expected = [
            (HidKeyCode::ControlLeft, 0x01),
            (HidKeyCode::ShiftLeft, 0x02),
            (HidKeyCode::AltLeft, 0x04),
            (HidKeyCode::MetaLeft, 0x08),
            (HidKeyCode::ControlRight, 0x10),
            (HidKeyCode::ShiftRight, 0x20),
            (HidKeyCode::AltRight, 0x40),
            (HidKeyCode::MetaRight, 0x80),
        ];
        for (key, bit) in expected {
            // Arrange / Act
            let result = key.modifier_bit();

            // Assert
            assert_eq!(result, Some(bit), "{key:?} should own bit 0x{bit:02X}");
        }
    }

    #[test]
    fn test_non_modifier_keys_have_no_modifier_bit() {
        for key in [
            HidKeyCode::KeyA,
            HidKeyCode::Enter,
            HidKeyCode::Space,
            HidKeyCode::Tab,
            HidKeyCode::Unknown,
        ] {
            assert_eq!(key.modifier_bit(), None, "{key:?} is not a modifier");
        }
    }

    #[test]
    fn test_all_letter_keys_are_contiguous() {
        let letters = [
            HidKeyCode::KeyA, HidKeyCode::KeyB, HidKeyCode::KeyC, HidKeyCode::KeyD,
            HidKeyCode::KeyE, HidKeyCode::KeyF, HidKeyCode::KeyG, HidKeyCode::KeyH,
            HidKeyCode::KeyI, HidKeyCode::KeyJ, HidKeyCode::KeyK, HidKeyCode::KeyL,
            HidKeyCode::KeyM, HidKeyCode::KeyN, HidKeyCode::KeyO, HidKeyCode::KeyP,
            HidKeyCode::KeyQ, HidKeyCode::KeyR, HidKeyCode::KeyS, HidKeyCode::KeyT,
            HidKeyCode::KeyU, HidKeyCode::KeyV, HidKeyCode::KeyW, HidKeyCode::KeyX,
            HidKeyCode::KeyY, HidKeyCode::KeyZ,
        ];
        for (i, &letter) in letters.iter().enumerate() {
            assert_eq!(letter.as_u8(), 0x04 + i as u8, "{letter:?} out of sequence");
        }
    }
}
