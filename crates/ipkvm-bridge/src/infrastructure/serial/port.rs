//! [`SerialTransport`] backed by a real serial device via `tokio-serial`.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info};

use crate::application::transport::{SerialTransport, TransportError};

/// The serial line to the bridge controller.
///
/// The stream sits behind an async mutex so that a whole frame is written
/// and flushed before any other writer gets the port.
pub struct SerialPortTransport {
    path: String,
    baud_rate: u32,
    stream: Mutex<Option<SerialStream>>,
}

impl SerialPortTransport {
    /// Creates a closed transport; call [`SerialTransport::open`] before writing.
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            stream: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SerialTransport for SerialPortTransport {
    async fn open(&self) -> Result<bool, TransportError> {
        let mut stream = self.stream.lock().await;
        if stream.is_some() {
            debug!("serial port {} already open", self.path);
            return Ok(false);
        }

        let opened = tokio_serial::new(self.path.as_str(), self.baud_rate)
            .open_native_async()
            .map_err(|e| TransportError::Open {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        *stream = Some(opened);

        info!("serial port ready: {} @ {} baud", self.path, self.baud_rate);
        Ok(true)
    }

    async fn write(&self, bytes: &[u8]) -> Result<usize, TransportError> {
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(TransportError::NotOpen)?;
        stream.write_all(bytes).await?;
        stream.flush().await?;
        Ok(bytes.len())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_before_open_is_not_open_error() {
        let transport = SerialPortTransport::new("/dev/ttyUSB0", 9600);

        let result = transport.write(&[0x57, 0xAB]).await;

        assert!(matches!(result, Err(TransportError::NotOpen)));
    }

    #[tokio::test]
    async fn test_open_missing_device_reports_path() {
        let transport = SerialPortTransport::new("/dev/ipkvm-does-not-exist", 9600);

        let err = transport.open().await.unwrap_err();

        assert!(matches!(&err, TransportError::Open { path, .. } if path == "/dev/ipkvm-does-not-exist"));
        assert!(err.to_string().contains("/dev/ipkvm-does-not-exist"));
    }
}
