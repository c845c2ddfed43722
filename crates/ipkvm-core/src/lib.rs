//! # ipkvm-core
//!
//! Shared library for Open IP-KVM containing the keyboard/mouse report
//! trackers, the key translation tables, and the binary frame codecs spoken
//! by the supported USB HID bridge controllers.
//!
//! It has zero dependencies on OS APIs, sockets, serial ports, or async
//! runtimes: everything here turns input events into bytes and nothing more.
//!
//! # Architecture overview (for beginners)
//!
//! An IP-KVM lets you operate a computer (the *target*) from a web browser.
//! The browser captures keyboard and mouse events and sends them to a small
//! server.  The server cannot inject input into the target directly, so it
//! talks over a serial line to a *bridge controller*: a microcontroller or a
//! dedicated chip that shows up on the target as a plain USB keyboard and
//! mouse.
//!
//! This crate (`ipkvm-core`) is the part of that server that decides which
//! bytes go down the serial line:
//!
//! - **`domain`** – The inbound event types plus the two state trackers,
//!   [`KeyState`] and [`MouseState`], which fold individual press/release
//!   events into the fixed-size HID reports a USB host expects.
//!
//! - **`keymap`** – Translation tables from browser key identifiers
//!   (`KeyboardEvent.keyCode`, `KeyboardEvent.key`, plain characters) to
//!   USB HID Usage IDs and to the Arduino keyboard library codes.
//!
//! - **`protocol`** – The two wire formats.  The *sentinel* format is spoken
//!   by an Arduino Leonardo sketch; the *CH9329* format is spoken by the WCH
//!   CH9329 serial-to-HID chip.  Both also define how a block of text is
//!   typed out.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `ipkvm_core::KeyState` instead of `ipkvm_core::domain::keyboard::KeyState`.
pub use domain::event::{KeyAction, KeyEvent, MouseButtonId, MouseEvent};
pub use domain::keyboard::KeyState;
pub use domain::mouse::{AxisEncoding, MouseState};
pub use keymap::hid::HidKeyCode;
pub use protocol::ch9329::{Ch9329Encoder, Command, DataFrame, FrameError};
pub use protocol::sentinel::SentinelEncoder;
pub use protocol::sequence::{
    validate_sequence, Burst, SequenceError, TypingPlan, MAX_SEQUENCE_CHARS,
};
