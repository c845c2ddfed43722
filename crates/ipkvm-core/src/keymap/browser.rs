//! Browser `KeyboardEvent.keyCode` to USB HID Usage ID translation table.
//!
//! The legacy DOM `keyCode` values are, for the keys we care about, the same
//! numbers as Windows Virtual Key codes: 65 for `A`, 13 for Enter, 186 for
//! `;` on a US layout.  Browsers report the *generic* modifier codes (16 for
//! either Shift, 17 for either Control) so the table maps those to the
//! left-hand HID modifiers.  The codes 228–231 are accepted as explicit
//! right-hand modifiers so a front end can still request them.
//!
//! # How this table works
//!
//! `KEY_CODE_TO_HID_TABLE` is a compile-time array of 256 [`HidKeyCode`]
//! values indexed by key code.  Unmapped positions hold
//! [`HidKeyCode::Unknown`].  Key codes above 255 are never mapped.

use super::hid::HidKeyCode;

/// Browser key code for the Shift key.
pub const KEY_CODE_SHIFT: u16 = 16;

/// Translates a browser key code to a HID Usage ID.
///
/// Returns `None` when the key has no HID equivalent; callers drop such keys.
pub fn key_code_to_hid(key_code: u16) -> Option<HidKeyCode> {
    let hid = KEY_CODE_TO_HID_TABLE
        .get(usize::from(key_code))
        .copied()
        .unwrap_or(HidKeyCode::Unknown);
    (hid != HidKeyCode::Unknown).then_some(hid)
}

/// Complete key code → HID mapping table indexed by key code (0x00–0xFF).
const KEY_CODE_TO_HID_TABLE: [HidKeyCode; 256] = {
    use HidKeyCode::*;
    let mut t = [Unknown; 256];

    // ── Letters (65 … 90) ────────────────────────────────────────────────────
    t[65] = KeyA;
    t[66] = KeyB;
    t[67] = KeyC;
    t[68] = KeyD;
    t[69] = KeyE;
    t[70] = KeyF;
    t[71] = KeyG;
    t[72] = KeyH;
    t[73] = KeyI;
    t[74] = KeyJ;
    t[75] = KeyK;
    t[76] = KeyL;
    t[77] = KeyM;
    t[78] = KeyN;
    t[79] = KeyO;
    t[80] = KeyP;
    t[81] = KeyQ;
    t[82] = KeyR;
    t[83] = KeyS;
    t[84] = KeyT;
    t[85] = KeyU;
    t[86] = KeyV;
    t[87] = KeyW;
    t[88] = KeyX;
    t[89] = KeyY;
    t[90] = KeyZ;

    // ── Digit row (48 … 57) ──────────────────────────────────────────────────
    t[48] = Digit0;
    t[49] = Digit1;
    t[50] = Digit2;
    t[51] = Digit3;
    t[52] = Digit4;
    t[53] = Digit5;
    t[54] = Digit6;
    t[55] = Digit7;
    t[56] = Digit8;
    t[57] = Digit9;

    // ── Punctuation (US layout) ──────────────────────────────────────────────
    t[186] = Semicolon;
    t[187] = Equal;
    t[188] = Comma;
    t[189] = Minus;
    t[190] = Period;
    t[191] = Slash;
    t[192] = Backquote;
    t[219] = BracketLeft;
    t[220] = Backslash;
    t[221] = BracketRight;
    t[222] = Quote;

    // ── Control and navigation keys ──────────────────────────────────────────
    t[8] = Backspace;
    t[9] = Tab;
    t[13] = Enter;
    t[20] = CapsLock;
    t[27] = Escape;
    t[32] = Space;
    t[33] = PageUp;
    t[34] = PageDown;
    t[35] = End;
    t[36] = Home;
    t[37] = ArrowLeft;
    t[38] = ArrowUp;
    t[39] = ArrowRight;
    t[40] = ArrowDown;
    t[45] = Insert;
    t[46] = Delete;
    t[144] = NumLock;
    t[145] = ScrollLock;

    // ── Function keys (112 … 123) ────────────────────────────────────────────
    t[112] = F1;
    t[113] = F2;
    t[114] = F3;
    t[115] = F4;
    t[116] = F5;
    t[117] = F6;
    t[118] = F7;
    t[119] = F8;
    t[120] = F9;
    t[121] = F10;
    t[122] = F11;
    t[123] = F12;

    // ── Modifiers ────────────────────────────────────────────────────────────
    t[17] = ControlLeft;
    t[16] = ShiftLeft;
    t[18] = AltLeft;
    t[91] = MetaLeft;
    t[228] = ControlRight;
    t[229] = ShiftRight;
    t[230] = AltRight;
    t[231] = MetaRight;

    t
};

// ── Tests ─────────────────────────────────────────────────────────────────────
