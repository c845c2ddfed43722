//! Character to browser key code table for typing text on a US layout.
//!
//! Each character resolves to the key code of the physical key that produces
//! it plus, when needed, the key code of the modifier that must be held
//! (always Shift here).  The result feeds a [`crate::KeyState`] exactly like
//! a pair of live `keydown` events would.

use super::browser::KEY_CODE_SHIFT;

/// The keys needed to type one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharKeys {
    /// Browser key code of the base key.
    pub key_code: u16,
    /// Browser key code of the modifier to hold, if any.
    pub modifier: Option<u16>,
}

impl CharKeys {
    const fn plain(key_code: u16) -> Self {
        Self {
            key_code,
            modifier: None,
        }
    }

    const fn shifted(key_code: u16) -> Self {
        Self {
            key_code,
            modifier: Some(KEY_CODE_SHIFT),
        }
    }

    /// The key codes to press together, modifier last.
    pub fn key_codes(&self) -> impl Iterator<Item = u16> {
        std::iter::once(self.key_code).chain(self.modifier)
    }
}

/// Resolves a character to the keys that type it.
///
/// Returns `None` for characters with no key on a US keyboard (non-ASCII,
/// control characters other than newline and tab).
pub fn char_to_keys(c: char) -> Option<CharKeys> {
    let keys = match c {
        'a'..='z' => CharKeys::plain(c.to_ascii_uppercase() as u16),
        'A'..='Z' => CharKeys::shifted(c as u16),
        '0'..='9' => CharKeys::plain(c as u16),
        ' ' => CharKeys::plain(32),
        '\n' => CharKeys::plain(13),
        '\t' => CharKeys::plain(9),
        '!' => CharKeys::shifted(49),
        '"' => CharKeys::shifted(222),
        '#' => CharKeys::shifted(51),
        '$' => CharKeys::shifted(52),
        '%' => CharKeys::shifted(53),
        '&' => CharKeys::shifted(55),
        '\'' => CharKeys::plain(222),
        '(' => CharKeys::shifted(57),
        ')' => CharKeys::shifted(48),
        '*' => CharKeys::shifted(56),
        '+' => CharKeys::shifted(187),
        ',' => CharKeys::plain(188),
        '-' => CharKeys::plain(189),
        '.' => CharKeys::plain(190),
        '/' => CharKeys::plain(191),
        ':' => CharKeys::shifted(186),
        ';' => CharKeys::plain(186),
        '<' => CharKeys::shifted(188),
        '=' => CharKeys::plain(187),
        '>' => CharKeys::shifted(190),
        '?' => CharKeys::shifted(191),
        '@' => CharKeys::shifted(50),
        '[' => CharKeys::plain(219),
        '\\' => CharKeys::plain(220),
        ']' => CharKeys::plain(221),
        '^' => CharKeys::shifted(54),
        '_' => CharKeys::shifted(189),
        '`' => CharKeys::plain(192),
        '{' => CharKeys::shifted(219),
        '|' => CharKeys::shifted(220),
        '}' => CharKeys::shifted(221),
        '~' => CharKeys::shifted(192),
        _ => return None,
    };
    Some(keys)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
