//! Frame codec for the WCH CH9329 serial-to-HID chip.
//!
//! # Frame layout (for beginners)
//!
//! ```text
//! ┌──────┬──────┬─────────┬─────────┬────────┬──────────────┬──────────┐
//! │ 0x57 │ 0xAB │ address │ command │ length │ data × length│ checksum │
//! └──────┴──────┴─────────┴─────────┴────────┴──────────────┴──────────┘
//! ```
//!
//! The chip accepts a standard boot keyboard report under command
//! `SEND_KB_GENERAL_DATA` and a relative mouse report under
//! `SEND_MS_REL_DATA`.  Everything else (configuration, USB strings, custom
//! HID data) shares the same envelope with a different command byte.
//!
//! # The checksum
//!
//! The datasheet checksum is the low byte of the sum of all preceding bytes.
//! Deployed bridges have always been sent `sum | 0xFF` instead, whose low
//! byte is 0xFF for every frame.  [`DataFrame::checksum`] keeps producing
//! exactly that byte.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::event::{KeyAction, KeyEvent, MouseButtonId, MouseEvent};
use crate::domain::keyboard::KeyState;
use crate::domain::mouse::{AxisEncoding, MouseState};
use crate::keymap::ascii::char_to_keys;
use crate::protocol::sequence::{validate_sequence, SequenceError, TypingPlan};

/// The two fixed leading bytes of every frame.
pub const HEADER: [u8; 2] = [0x57, 0xAB];

/// Default chip address.
pub const DEFAULT_ADDRESS: u8 = 0x00;

/// Largest data section the chip accepts.
pub const MAX_DATA_LEN: usize = 64;

/// Pause between typed characters.
pub const CHAR_PAUSE: Duration = Duration::from_millis(100);

const AXIS: AxisEncoding = AxisEncoding::Wrapping;

/// Errors raised while building a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame data is {len} bytes, maximum is {max}")]
    DataTooLong { len: usize, max: usize },
}

/// CH9329 command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    GetInfo = 0x01,
    SendKbGeneralData = 0x02,
    SendKbMediaData = 0x03,
    SendMsAbsData = 0x04,
    SendMsRelData = 0x05,
    SendMyHidData = 0x06,
    ReadMyHidData = 0x87,
    GetParaCfg = 0x08,
    SetParaCfg = 0x09,
    GetUsbString = 0x0A,
    SetUsbString = 0x0B,
    SetDefaultCfg = 0x0C,
    Reset = 0x0F,
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let command = match code {
            0x01 => Self::GetInfo,
            0x02 => Self::SendKbGeneralData,
            0x03 => Self::SendKbMediaData,
            0x04 => Self::SendMsAbsData,
            0x05 => Self::SendMsRelData,
            0x06 => Self::SendMyHidData,
            0x87 => Self::ReadMyHidData,
            0x08 => Self::GetParaCfg,
            0x09 => Self::SetParaCfg,
            0x0A => Self::GetUsbString,
            0x0B => Self::SetUsbString,
            0x0C => Self::SetDefaultCfg,
            0x0F => Self::Reset,
            other => return Err(other),
        };
        Ok(command)
    }
}

impl Command {
    /// Lenient lookup: unknown codes fall back to [`Command::GetInfo`].
    pub fn from_code(code: u8) -> Self {
        Self::try_from(code).unwrap_or_else(|unknown| {
            warn!("unknown CH9329 command 0x{unknown:02X}, using GET_INFO");
            Self::GetInfo
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// One CH9329 frame before serialization.
///
/// Invariant: `data.len() <= MAX_DATA_LEN`, so the length byte is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    address: u8,
    command: Command,
    data: Vec<u8>,
}

impl DataFrame {
    /// Creates a frame for the default address.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DataTooLong`] if `data` exceeds [`MAX_DATA_LEN`].
    pub fn new(command: Command, data: Vec<u8>) -> Result<Self, FrameError> {
        if data.len() > MAX_DATA_LEN {
            return Err(FrameError::DataTooLong {
                len: data.len(),
                max: MAX_DATA_LEN,
            });
        }
        Ok(Self {
            address: DEFAULT_ADDRESS,
            command,
            data,
        })
    }

    /// A `SEND_KB_GENERAL_DATA` frame carrying an 8-byte keyboard report.
    pub fn keyboard(report: [u8; 8]) -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            command: Command::SendKbGeneralData,
            data: report.to_vec(),
        }
    }

    /// A `SEND_MS_REL_DATA` frame carrying a 5-byte relative mouse report.
    pub fn mouse(report: [u8; 5]) -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            command: Command::SendMsRelData,
            data: report.to_vec(),
        }
    }

    /// Sets the address, reduced modulo 256.
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = (address % 256) as u8;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `sum | 0xFF` truncated to a byte.  Always 0xFF.
    pub fn checksum(&self) -> u8 {
        let sum: u32 = HEADER
            .iter()
            .chain([self.address, self.command.code(), self.data.len() as u8].iter())
            .chain(self.data.iter())
            .map(|&b| u32::from(b))
            .sum();
        ((sum | 0xFF) & 0xFF) as u8
    }

    /// Serializes the frame: header, address, command, length, data, checksum.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER.len() + 4 + self.data.len());
        buf.extend_from_slice(&HEADER);
        buf.push(self.address);
        buf.push(self.command.code());
        buf.push(self.data.len() as u8);
        buf.extend_from_slice(&self.data);
        buf.push(self.checksum());
        buf
    }
}

/// Stateful encoder for the CH9329 chip.
///
/// The chip is a dumb HID pipe, so the host keeps the full keyboard and
/// mouse state and sends a fresh report on every change.
#[derive(Debug, Default)]
pub struct Ch9329Encoder {
    keys: KeyState,
    mouse: MouseState,
}

impl Ch9329Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_state(&self) -> &KeyState {
        &self.keys
    }

    pub fn mouse_state(&self) -> &MouseState {
        &self.mouse
    }

    /// Applies a keyboard event and returns the resulting report frame.
    ///
    /// Returns `None` when the key code has no HID mapping.
    pub fn encode_key_event(&mut self, event: &KeyEvent) -> Option<DataFrame> {
        let mapped = match event.action {
            KeyAction::KeyDown => self.keys.on_key_down(event.key_code),
            KeyAction::KeyUp => self.keys.on_key_up(event.key_code),
            KeyAction::Reset => {
                self.keys.reset();
                true
            }
        };
        if !mapped {
            debug!("dropping key code {}: no HID mapping", event.key_code);
            return None;
        }
        Some(DataFrame::keyboard(self.keys.report()))
    }

    /// Applies a mouse event and returns the resulting report frame.
    ///
    /// Movement and wheel deltas are truncated toward zero.  Returns `None`
    /// for unknown button ids and for move-factor configuration, which the
    /// chip does not support.
    pub fn encode_mouse_event(&mut self, event: &MouseEvent) -> Option<DataFrame> {
        match *event {
            MouseEvent::Move { dx, dy } => self.mouse.on_move(dx as i32, dy as i32),
            MouseEvent::ButtonDown(id) | MouseEvent::ButtonUp(id)
                if MouseButtonId::from_id(id).is_none() =>
            {
                debug!("dropping unknown mouse button {id}");
                return None;
            }
            MouseEvent::ButtonDown(id) => self.mouse.on_button_down(id),
            MouseEvent::ButtonUp(id) => self.mouse.on_button_up(id),
            MouseEvent::Wheel(delta) => self.mouse.on_wheel(delta as i32),
            MouseEvent::Reset => self.mouse.reset(),
            MouseEvent::ConfigMoveFactor(_) => {
                debug!("move factor is not supported by CH9329, ignoring");
                return None;
            }
        }
        Some(DataFrame::mouse(self.mouse.report(AXIS)))
    }

    /// Builds the press and release frames for a key combination.
    ///
    /// Uses a fresh key state so held live keys do not leak into the combo.
    /// Returns `None` if none of the codes map to a HID key.
    pub fn key_combo_frames(key_codes: impl IntoIterator<Item = u16>) -> Option<[DataFrame; 2]> {
        let mut state = KeyState::new();
        let mut any = false;
        for code in key_codes {
            any |= state.on_key_down(code);
        }
        if !any {
            return None;
        }
        Some([
            DataFrame::keyboard(state.report()),
            DataFrame::keyboard([0; 8]),
        ])
    }

    /// Plans typing `text` one character at a time, [`CHAR_PAUSE`] apart.
    ///
    /// Characters with no key on a US layout are skipped without a pause.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::TooLong`] before any frame is built.
    pub fn encode_sequence(&self, text: &str) -> Result<TypingPlan, SequenceError> {
        validate_sequence(text)?;

        let mut plan = TypingPlan::new(CHAR_PAUSE);
        for c in text.chars() {
            let Some(keys) = char_to_keys(c) else {
                debug!("skipping untypeable character {c:?}");
                continue;
            };
            if let Some(frames) = Self::key_combo_frames(keys.key_codes()) {
                plan.push(frames.iter().map(DataFrame::to_bytes).collect());
            }
        }
        Ok(plan)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
