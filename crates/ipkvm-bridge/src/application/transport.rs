//! The serial transport contract the drivers write frames through.
//!
//! Infrastructure implements it with a real serial port
//! ([`crate::infrastructure::serial::SerialPortTransport`]); tests use the
//! recording [`crate::infrastructure::serial::MockTransport`] or the
//! `mockall`-generated `MockSerialTransport`.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a serial transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not open serial port {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("serial port is not open")]
    NotOpen,

    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A byte pipe to the bridge controller.
///
/// One instance is shared by the whole process, so implementations must make
/// each `write` atomic with respect to other writers: the bytes of one frame
/// are never interleaved with another.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SerialTransport: Send + Sync {
    /// Opens the underlying device.
    ///
    /// Idempotent: returns `Ok(false)` without touching the device when it
    /// is already open.
    async fn open(&self) -> Result<bool, TransportError>;

    /// Writes one complete frame and returns the number of bytes written.
    async fn write(&self, bytes: &[u8]) -> Result<usize, TransportError>;
}
