//! Application layer for ipkvm-bridge.
//!
//! Turns decoded browser messages into frames on the serial line:
//!
//! ```text
//! InboundMessage ─► EventRouter ─► Driver ─► ipkvm-core encoder ─► SerialTransport
//! ```
//!
//! This layer depends on `domain` and `ipkvm-core` only.  The transport is
//! reached through the [`SerialTransport`] trait so every path here can be
//! tested without hardware.

pub mod driver;
pub mod router;
pub mod transport;

pub use driver::{Ch9329Driver, Driver, DriverError, SentinelDriver, SequenceJob};
pub use router::{EventRouter, SharedRouter};
pub use transport::{SerialTransport, TransportError};
