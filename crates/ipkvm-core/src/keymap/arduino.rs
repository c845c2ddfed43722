//! Browser `KeyboardEvent.key` names to Arduino keyboard library codes.
//!
//! The Arduino `Keyboard.press()` API takes a single byte.  Printable ASCII
//! characters are passed as themselves; everything else (modifiers, arrows,
//! function keys) uses the constants from `Keyboard.h`, all of which are
//! ≥ 0x80 so they can never collide with a character.
//!
//! Reference: <https://www.arduino.cc/reference/en/language/functions/usb/keyboard/keyboardmodifiers/>

/// Returns `true` if `key` is exactly one printable ASCII character
/// (codepoint 32–126).
pub fn is_printable_char(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => is_printable_ascii(c),
        _ => false,
    }
}

/// Returns `true` for characters in the printable ASCII range 32–126.
pub fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Resolves a `KeyboardEvent.key` value to the byte the Arduino sketch
/// should press.
///
/// Printable characters map to their own codepoint; named keys go through
/// [`named_key_code`].  Returns `None` for keys the sketch cannot type.
pub fn resolve_key(key: &str) -> Option<u8> {
    if is_printable_char(key) {
        // is_printable_char guarantees a single ASCII char.
        return key.bytes().next();
    }
    named_key_code(key)
}

/// Looks up a non-printable key name in the `Keyboard.h` constant table.
pub fn named_key_code(key: &str) -> Option<u8> {
    let code = match key {
        "Control" => 0x80,
        "Shift" => 0x81,
        "Alt" => 0x82,
        "Meta" => 0x83,
        "Tab" => 0xB3,
        "CapsLock" => 0xC1,
        "Backspace" => 0xB2,
        "Enter" => 0xB0,
        "ContextMenu" => 0xED,
        "Insert" => 0xD1,
        "Delete" => 0xD4,
        "Home" => 0xD2,
        "End" => 0xD5,
        "PageUp" => 0xD3,
        "PageDown" => 0xD6,
        "ArrowUp" => 0xDA,
        "ArrowDown" => 0xD9,
        "ArrowLeft" => 0xD8,
        "ArrowRight" => 0xD7,
        "PrintScreen" => 0xCE,
        "ScrollLock" => 0xCF,
        "Pause" => 0xD0,
        "Escape" => 0xB1,
        _ => return function_key_code(key),
    };
    Some(code)
}

/// F1 … F12 are consecutive in `Keyboard.h`, starting at 0xC2.
fn function_key_code(key: &str) -> Option<u8> {
    let n: u8 = key.strip_prefix('F')?.parse().ok()?;
    (1..=12).contains(&n).then(|| 0xC2 + n - 1)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
