//! Keyboard state tracker producing boot-protocol HID keyboard reports.
//!
//! # The 8-byte keyboard report (for beginners)
//!
//! A USB boot keyboard does not send "key pressed" / "key released" events.
//! It repeatedly sends a *snapshot* of everything held right now:
//!
//! ```text
//! [modifiers][reserved=0][k0][k1][k2][k3][k4][k5]
//! ```
//!
//! The host diffs consecutive snapshots to work out what changed.  That is
//! why [`KeyState`] must remember every key still held: a report that forgets
//! one would look like a release to the target.
//!
//! # Rollover
//!
//! Only six ordinary keys fit.  When a seventh is pressed the oldest one is
//! pushed out, the same FIFO behaviour most cheap keyboards show.

use std::collections::VecDeque;

use crate::keymap::browser::key_code_to_hid;
use crate::keymap::hid::HidKeyCode;

/// Maximum number of simultaneously reported non-modifier keys.
pub const ROLLOVER_LIMIT: usize = 6;

/// Size of a boot-protocol keyboard report in bytes.
pub const KEYBOARD_REPORT_LEN: usize = 8;

/// Currently held keys and modifiers.
///
/// Invariant: `pressed.len() <= ROLLOVER_LIMIT` and `pressed` holds no
/// duplicates and no modifier keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    modifiers: u8,
    pressed: VecDeque<HidKeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press by browser key code.
    ///
    /// Modifiers set their bit; other keys are appended, evicting the oldest
    /// held key when the rollover limit is reached.  A key that is already
    /// held moves to the back, so `pressed` stays ordered by last press.
    ///
    /// Returns `false` if the key code has no HID mapping and was ignored.
    pub fn on_key_down(&mut self, key_code: u16) -> bool {
        let Some(hid) = key_code_to_hid(key_code) else {
            return false;
        };
        if let Some(bit) = hid.modifier_bit() {
            self.modifiers |= bit;
            return true;
        }
        self.pressed.retain(|&held| held != hid);
        if self.pressed.len() >= ROLLOVER_LIMIT {
            self.pressed.pop_front();
        }
        self.pressed.push_back(hid);
        true
    }

    /// Records a key release by browser key code.
    ///
    /// Releasing a key that is not held is a no-op.  Returns `false` if the
    /// key code has no HID mapping and was ignored.
    pub fn on_key_up(&mut self, key_code: u16) -> bool {
        let Some(hid) = key_code_to_hid(key_code) else {
            return false;
        };
        if let Some(bit) = hid.modifier_bit() {
            self.modifiers &= !bit;
        } else {
            self.pressed.retain(|&held| held != hid);
        }
        true
    }

    /// Releases every key and modifier.
    pub fn reset(&mut self) {
        self.modifiers = 0;
        self.pressed.clear();
    }

    /// The current modifier bitmask.
    pub fn modifiers(&self) -> u8 {
        self.modifiers
    }

    /// Held non-modifier keys, oldest first.
    pub fn pressed(&self) -> impl Iterator<Item = HidKeyCode> + '_ {
        self.pressed.iter().copied()
    }

    /// Builds the 8-byte report `[modifiers, 0, k0..k5]`, zero-padded.
    pub fn report(&self) -> [u8; KEYBOARD_REPORT_LEN] {
        let mut report = [0u8; KEYBOARD_REPORT_LEN];
        report[0] = self.modifiers;
        for (slot, key) in report[2..].iter_mut().zip(&self.pressed) {
            *slot = key.as_u8();
        }
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const A: u16 = 65;
    const SHIFT: u16 = 16;
    const CONTROL: u16 = 17;

    #[test]
    fn test_new_state_reports_all_zero() {
        assert_eq!(KeyState::new().report(), [0; 8]);
    }

    #[test]
    fn test_key_down_places_hid_code_in_first_slot() {
        // Arrange
        let mut state = KeyState::new();

        // Act
        let mapped = state.on_key_down(A);

        // Assert
        assert!(mapped);
        assert_eq!(state.report(), [0, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_modifiers_set_bits_not_slots() {
        let mut state = KeyState::new();
        state.on_key_down(SHIFT);
        state.on_key_down(CONTROL);
        state.on_key_down(A);

        assert_eq!(state.report(), [0x03, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_key_up_clears_modifier_bit() {
        let mut state = KeyState::new();
        state.on_key_down(SHIFT);
        state.on_key_down(CONTROL);

        state.on_key_up(SHIFT);

        assert_eq!(state.modifiers(), 0x01);
    }

    #[test]
    fn test_key_up_removes_matching_hid_code() {
        // Arrange: A, B, C held
        let mut state = KeyState::new();
        for code in [65, 66, 67] {
            state.on_key_down(code);
        }

        // Act: release B
        state.on_key_up(66);

        // Assert: remaining keys close the gap
        assert_eq!(state.report(), [0, 0, 0x04, 0x06, 0, 0, 0, 0]);
    }

    #[test]
    fn test_key_up_of_unheld_key_is_noop() {
        let mut state = KeyState::new();
        state.on_key_down(A);

        assert!(state.on_key_up(66));
        assert_eq!(state.report(), [0, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rollover_keeps_six_most_recent_keys() {
        // Arrange: press A..H (8 distinct letters)
        let mut state = KeyState::new();

        // Act
        for code in 65..=72 {
            state.on_key_down(code);
        }

        // Assert: A and B were evicted, C..H remain in press order
        let held: Vec<u8> = state.pressed().map(HidKeyCode::as_u8).collect();
        assert_eq!(held, vec![0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B]);
        assert_eq!(state.report()[2..], [0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B]);
    }

    #[test]
    fn test_repressed_key_counts_as_most_recent() {
        // Arrange: A..F fill every slot
        let mut state = KeyState::new();
        for code in 65..=70 {
            state.on_key_down(code);
        }

        // Act: A again (its keyup was lost), then G
        state.on_key_down(65);
        state.on_key_down(71);

        // Assert: B is evicted, not the freshly pressed A
        let held: Vec<u8> = state.pressed().map(HidKeyCode::as_u8).collect();
        assert_eq!(held, vec![0x06, 0x07, 0x08, 0x09, 0x04, 0x0A]);
    }

    #[test]
    fn test_rollover_never_exceeds_limit() {
        let mut state = KeyState::new();
        for code in (65..=90).chain(48..=57) {
            state.on_key_down(code);
            assert!(state.pressed().count() <= ROLLOVER_LIMIT);
        }
    }

    #[test]
    fn test_modifiers_do_not_count_towards_rollover() {
        let mut state = KeyState::new();
        for code in 65..=70 {
            state.on_key_down(code);
        }
        state.on_key_down(SHIFT);

        assert_eq!(state.pressed().count(), 6);
        assert_eq!(state.report()[2], 0x04, "A must not be evicted by a modifier");
    }

    #[test]
    fn test_repeated_key_down_does_not_duplicate() {
        let mut state = KeyState::new();
        for _ in 0..10 {
            state.on_key_down(A);
        }
        state.on_key_up(A);

        assert_eq!(state.report(), [0; 8]);
    }

    #[test]
    fn test_unmapped_key_code_is_ignored() {
        let mut state = KeyState::new();

        assert!(!state.on_key_down(0));
        assert!(!state.on_key_up(999));
        assert_eq!(state.report(), [0; 8]);
    }

    #[test]
    fn test_reset_yields_all_zero_report() {
        let mut state = KeyState::new();
        state.on_key_down(SHIFT);
        for code in 65..=75 {
            state.on_key_down(code);
        }

        state.reset();

        assert_eq!(state.report(), [0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_report_is_deterministic() {
        let mut state = KeyState::new();
        state.on_key_down(A);
        assert_eq!(state.report(), state.report());
    }
}
