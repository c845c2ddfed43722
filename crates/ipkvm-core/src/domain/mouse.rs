//! Mouse state tracker producing relative HID mouse reports.
//!
//! The tracker keeps the *last observed* movement and wheel delta rather than
//! accumulating them.  Every mouse event re-sends the full report, so a
//! button press that follows a move repeats that move's delta; bridge
//! firmware relies on this behaviour and it is preserved here.

use super::event::MouseButtonId;

/// Report id of the relative mouse report.
pub const MOUSE_REPORT_ID: u8 = 0x01;

/// Size of a relative mouse report in bytes.
pub const MOUSE_REPORT_LEN: usize = 5;

/// Largest movement magnitude representable by [`AxisEncoding::SaturatingOffset`].
pub const SATURATION_LIMIT: i32 = 120;

/// How a signed axis value is squeezed into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisEncoding {
    /// `clamp(n, -120, 120) + 120`, giving 0–240.  Out-of-range values
    /// saturate.  Used by the Arduino sketch.
    SaturatingOffset,
    /// Two's-complement low byte, `(n + 256) mod 256`.  Out-of-range values
    /// wrap silently.  Used by the CH9329 chip.
    Wrapping,
}

impl AxisEncoding {
    /// Encodes one signed axis value.
    pub fn encode(self, n: i32) -> u8 {
        match self {
            // The clamped sum is always within 0..=240.
            Self::SaturatingOffset => {
                (n.clamp(-SATURATION_LIMIT, SATURATION_LIMIT) + SATURATION_LIMIT) as u8
            }
            Self::Wrapping => n.rem_euclid(256) as u8,
        }
    }
}

/// Button bitmask plus the last movement and wheel deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseState {
    buttons: u8,
    dx: i32,
    dy: i32,
    wheel: i32,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest movement vector, replacing the previous one.
    pub fn on_move(&mut self, dx: i32, dy: i32) {
        self.dx = dx;
        self.dy = dy;
    }

    /// Sets the bit for browser button `id`.  Unknown ids are ignored.
    pub fn on_button_down(&mut self, id: u8) {
        if let Some(button) = MouseButtonId::from_id(id) {
            self.buttons |= button.hid_bit();
        }
    }

    /// Clears the bit for browser button `id`.  Unknown ids are ignored.
    pub fn on_button_up(&mut self, id: u8) {
        if let Some(button) = MouseButtonId::from_id(id) {
            self.buttons &= !button.hid_bit();
        }
    }

    /// Records the latest wheel delta.
    pub fn on_wheel(&mut self, delta: i32) {
        self.wheel = delta;
    }

    /// Releases all buttons and zeroes every axis.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// The last movement vector, encoded.
    pub fn movement(&self, encoding: AxisEncoding) -> (u8, u8) {
        (encoding.encode(self.dx), encoding.encode(self.dy))
    }

    /// The last wheel delta, encoded.
    pub fn wheel(&self, encoding: AxisEncoding) -> u8 {
        encoding.encode(self.wheel)
    }

    /// Builds `[report_id, buttons, dx, dy, wheel]`.
    pub fn report(&self, encoding: AxisEncoding) -> [u8; MOUSE_REPORT_LEN] {
        let (dx, dy) = self.movement(encoding);
        [MOUSE_REPORT_ID, self.buttons, dx, dy, self.wheel(encoding)]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
