//! Domain entities: inbound events and the keyboard/mouse state trackers.
//!
//! Nothing in here knows about frames, serial ports or JSON.  The trackers
//! fold a stream of [`event::KeyEvent`]s and [`event::MouseEvent`]s into the
//! fixed-layout HID reports that the protocol layer wraps for transmission.

pub mod event;
pub mod keyboard;
pub mod mouse;
