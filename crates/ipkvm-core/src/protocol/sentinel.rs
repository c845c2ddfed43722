//! Sentinel frame protocol spoken by the Arduino Leonardo bridge sketch.
//!
//! Wire format (no checksum, no length field):
//! ```text
//! keyboard: [248][event_type][key_byte][251]
//! mouse:    [249][event_type][byte0][byte1][251]
//! text:     [250][codepoint × 1..=30][251]
//! ```
//!
//! The start byte selects the frame type and 251 ends every frame.  The
//! sketch calls the Arduino `Keyboard`/`Mouse` libraries directly, so key
//! bytes are `Keyboard.h` codes (see [`crate::keymap::arduino`]) and the
//! movement bytes are offset by 120 so they fit in an unsigned byte.

use std::time::Duration;

use tracing::debug;

use crate::domain::event::{KeyAction, KeyEvent, MouseEvent};
use crate::domain::mouse::{AxisEncoding, MouseState};
use crate::keymap::arduino::{is_printable_ascii, resolve_key};
use crate::protocol::sequence::{validate_sequence, SequenceError, TypingPlan};

/// First byte of a keyboard frame.
pub const KB_EVT_START: u8 = 248;
/// First byte of a mouse frame.
pub const MOUSE_EVT_START: u8 = 249;
/// First byte of a text sequence frame.
pub const SEQUENCE_EVT_START: u8 = 250;
/// Last byte of every frame.
pub const EVT_END: u8 = 251;

/// Maximum codepoints in one text sequence frame.
pub const SEQUENCE_CHUNK_LEN: usize = 30;
/// Pause between text sequence frames.
pub const SEQUENCE_CHUNK_PAUSE: Duration = Duration::from_millis(200);

/// Browser movement deltas are divided by this before encoding.
pub const MOVE_DIVISOR: f64 = 1.5;
/// Browser wheel deltas (pixels) are divided by this to get notches.
pub const WHEEL_DIVISOR: f64 = 40.0;

const AXIS: AxisEncoding = AxisEncoding::SaturatingOffset;

/// Keyboard frame event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyboardEventType {
    KeyDown = 1,
    KeyUp = 2,
    Reset = 3,
}

impl From<KeyAction> for KeyboardEventType {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::KeyDown => Self::KeyDown,
            KeyAction::KeyUp => Self::KeyUp,
            KeyAction::Reset => Self::Reset,
        }
    }
}

/// Mouse frame event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MouseEventType {
    Move = 1,
    LeftDown = 2,
    LeftUp = 3,
    MiddleDown = 4,
    MiddleUp = 5,
    RightDown = 6,
    RightUp = 7,
    Wheel = 8,
    Reset = 9,
    ConfigMoveFactor = 10,
}

impl MouseEventType {
    /// The event type for a browser button id, or `None` for buttons the
    /// sketch does not know.
    pub fn button(id: u8, pressed: bool) -> Option<Self> {
        let event = match (id, pressed) {
            (0, true) => Self::LeftDown,
            (0, false) => Self::LeftUp,
            (1, true) => Self::MiddleDown,
            (1, false) => Self::MiddleUp,
            (2, true) => Self::RightDown,
            (2, false) => Self::RightUp,
            _ => return None,
        };
        Some(event)
    }
}

/// Builds a 4-byte keyboard frame.
pub fn key_frame(event_type: KeyboardEventType, key: u8) -> [u8; 4] {
    [KB_EVT_START, event_type as u8, key, EVT_END]
}

/// Builds a 5-byte mouse frame.
pub fn mouse_frame(event_type: MouseEventType, byte0: u8, byte1: u8) -> [u8; 5] {
    [MOUSE_EVT_START, event_type as u8, byte0, byte1, EVT_END]
}

/// Rounds half-way values towards positive infinity.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Stateful encoder for the sentinel protocol.
///
/// Keyboard frames are stateless (the sketch tracks held keys itself); the
/// mouse tracker is kept so the movement vector goes through the same
/// saturating encoding as every other axis value.
#[derive(Debug, Default)]
pub struct SentinelEncoder {
    mouse: MouseState,
}

impl SentinelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes a keyboard event.
    ///
    /// Returns `None` when the key has neither a printable form nor a
    /// `Keyboard.h` constant.
    pub fn encode_key_event(&self, event: &KeyEvent) -> Option<[u8; 4]> {
        let key = match event.action {
            KeyAction::Reset => 0,
            KeyAction::KeyDown | KeyAction::KeyUp => match resolve_key(&event.key) {
                Some(byte) => byte,
                None => {
                    debug!("dropping key {:?}: no sketch mapping", event.key);
                    return None;
                }
            },
        };
        Some(key_frame(event.action.into(), key))
    }

    /// Encodes a mouse event, updating the tracked mouse state.
    ///
    /// Returns `None` for buttons the sketch does not know.
    pub fn encode_mouse_event(&mut self, event: &MouseEvent) -> Option<[u8; 5]> {
        let frame = match *event {
            MouseEvent::Move { dx, dy } => {
                self.mouse.on_move(
                    round_half_up(dx / MOVE_DIVISOR),
                    round_half_up(dy / MOVE_DIVISOR),
                );
                let (x, y) = self.mouse.movement(AXIS);
                mouse_frame(MouseEventType::Move, x, y)
            }
            MouseEvent::ButtonDown(id) => {
                let event_type = MouseEventType::button(id, true)?;
                self.mouse.on_button_down(id);
                mouse_frame(event_type, 0, 0)
            }
            MouseEvent::ButtonUp(id) => {
                let event_type = MouseEventType::button(id, false)?;
                self.mouse.on_button_up(id);
                mouse_frame(event_type, 0, 0)
            }
            MouseEvent::Wheel(delta) => {
                self.mouse.on_wheel(round_half_up(delta / WHEEL_DIVISOR));
                mouse_frame(MouseEventType::Wheel, self.mouse.wheel(AXIS), 0)
            }
            MouseEvent::Reset => {
                self.mouse.reset();
                mouse_frame(MouseEventType::Reset, 0, 0)
            }
            // Truncated, then reduced mod 256 like a byte buffer store.
            MouseEvent::ConfigMoveFactor(factor) => mouse_frame(
                MouseEventType::ConfigMoveFactor,
                (factor as i64).rem_euclid(256) as u8,
                0,
            ),
        };
        Some(frame)
    }

    /// Plans a text injection: printable ASCII and newlines only, at most
    /// [`SEQUENCE_CHUNK_LEN`] codepoints per frame.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::TooLong`] before any frame is built.
    pub fn encode_sequence(&self, text: &str) -> Result<TypingPlan, SequenceError> {
        validate_sequence(text)?;

        let codepoints: Vec<u8> = text
            .chars()
            .filter(|&c| is_printable_ascii(c) || c == '\n')
            .map(|c| c as u8)
            .collect();

        let mut plan = TypingPlan::new(SEQUENCE_CHUNK_PAUSE);
        for chunk in codepoints.chunks(SEQUENCE_CHUNK_LEN) {
            let mut frame = Vec::with_capacity(chunk.len() + 2);
            frame.push(SEQUENCE_EVT_START);
            frame.extend_from_slice(chunk);
            frame.push(EVT_END);
            plan.push(vec![frame]);
        }
        Ok(plan)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
