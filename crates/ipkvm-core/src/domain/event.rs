//! Inbound input events, as delivered by the browser front end.
//!
//! These are transport-neutral: the bridge's message layer parses JSON into
//! them and the drivers consume them.  Values are kept exactly as the browser
//! reported them (floating-point deltas, raw button ids) because each bridge
//! controller scales and validates them differently.

use serde::{Deserialize, Serialize};

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    /// The key was pressed.
    KeyDown,
    /// The key was released.
    KeyUp,
    /// Release everything (sent when the browser tab loses focus).
    Reset,
}

/// A single keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// `KeyboardEvent.key`, e.g. `"a"`, `"Shift"`, `"ArrowUp"`.
    pub key: String,
    /// `KeyboardEvent.keyCode`, e.g. 65 for `A`.
    pub key_code: u16,
    /// Press, release, or reset.
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, key_code: u16, action: KeyAction) -> Self {
        Self {
            key: key.into(),
            key_code,
            action,
        }
    }
}

/// Browser mouse button ids (`MouseEvent.button`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButtonId {
    /// Button 0, usually the left button.
    Primary,
    /// Button 1, usually the wheel / middle button.
    Auxiliary,
    /// Button 2, usually the right button.
    Secondary,
}

impl MouseButtonId {
    /// Converts a raw `MouseEvent.button` value.  Buttons 3+ (back/forward)
    /// have no HID boot-mouse equivalent and return `None`.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Primary),
            1 => Some(Self::Auxiliary),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }

    /// The bit this button owns in a HID boot-mouse report
    /// (left 0x01, right 0x02, middle 0x04).
    pub fn hid_bit(self) -> u8 {
        match self {
            Self::Primary => 0x01,
            Self::Secondary => 0x02,
            Self::Auxiliary => 0x04,
        }
    }
}

/// A single mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    /// Relative movement (`movementX`, `movementY`).
    Move { dx: f64, dy: f64 },
    /// A button was pressed.  Carries the raw browser button id.
    ButtonDown(u8),
    /// A button was released.  Carries the raw browser button id.
    ButtonUp(u8),
    /// Vertical wheel delta (`deltaY`).
    Wheel(f64),
    /// Release all buttons and zero all axes.
    Reset,
    /// Movement scaling hint for controllers that scale on their side.
    ConfigMoveFactor(f64),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_ids_map_to_boot_mouse_bits() {
        assert_eq!(MouseButtonId::from_id(0).map(MouseButtonId::hid_bit), Some(0x01));
        assert_eq!(MouseButtonId::from_id(1).map(MouseButtonId::hid_bit), Some(0x04));
        assert_eq!(MouseButtonId::from_id(2).map(MouseButtonId::hid_bit), Some(0x02));
    }

    #[test]
    fn test_extra_buttons_are_unmapped() {
        assert_eq!(MouseButtonId::from_id(3), None);
        assert_eq!(MouseButtonId::from_id(4), None);
    }
}
