//! Wire formats spoken by the supported HID bridge controllers.
//!
//! - [`sentinel`]: start/end-byte framed messages for the Arduino Leonardo
//!   sketch.  The sketch owns the keyboard state.
//! - [`ch9329`]: header/length/checksum framed commands for the WCH CH9329
//!   chip.  The host owns the keyboard and mouse state.
//! - [`sequence`]: the shared text length limit and the [`TypingPlan`]
//!   schedule both encoders produce when typing out a block of text.
//!
//! All encoders are pure: they return bytes and never touch a port.

pub mod ch9329;
pub mod sentinel;
pub mod sequence;

pub use ch9329::Ch9329Encoder;
pub use sentinel::SentinelEncoder;
pub use sequence::TypingPlan;
