//! Key translation tables for the two bridge controllers.
//!
//! The browser delivers three different key identities depending on context:
//!
//! - `KeyboardEvent.keyCode` (a number) for live key presses → [`browser`]
//!   translates it to a USB HID Usage ID for the CH9329 chip.
//! - `KeyboardEvent.key` (a name such as `"ArrowUp"`) → [`arduino`] maps it to
//!   the byte the Arduino keyboard library understands.
//! - Plain characters for pasted text → [`ascii`] resolves each one to the
//!   key codes that type it.

pub mod arduino;
pub mod ascii;
pub mod browser;
pub mod hid;

pub use ascii::CharKeys;
pub use hid::HidKeyCode;

