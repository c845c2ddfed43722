//! Drivers: one per bridge controller, each pairing a core encoder with the
//! shared serial transport.
//!
//! The set of controllers is closed and chosen once at startup, so [`Driver`]
//! is an enum rather than a trait object.  Every operation follows the same
//! shape: update the encoder's state synchronously, then write the resulting
//! frame.  A frame is only written after the state change is complete, so a
//! failed write never leaves the tracker half-updated.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use ipkvm_core::{
    Ch9329Encoder, KeyEvent, MouseEvent, SentinelEncoder, SequenceError, TypingPlan,
};

use crate::application::transport::{SerialTransport, TransportError};
use crate::domain::config::DriverKind;

/// Error type for driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Text injection input was rejected before anything was sent.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// A frame could not be written.  The rest of the operation is abandoned.
    #[error("frame write failed: {0}")]
    Transport(#[from] TransportError),
}

/// Writes one frame and logs it.
async fn write_frame(transport: &dyn SerialTransport, frame: &[u8]) -> Result<(), TransportError> {
    let written = transport.write(frame).await?;
    debug!("serial write {frame:02X?} ({written} bytes)");
    Ok(())
}

// ── Text injection ────────────────────────────────────────────────────────────

/// A validated, fully encoded text injection ready to be played out.
///
/// Built synchronously by [`Driver::sequence_job`] so that validation errors
/// surface to the caller; [`SequenceJob::run`] then does the slow part and is
/// meant to be spawned as its own task.
pub struct SequenceJob {
    plan: TypingPlan,
    transport: Arc<dyn SerialTransport>,
}

impl SequenceJob {
    pub fn frame_count(&self) -> usize {
        self.plan.frame_count()
    }

    /// Writes every burst, pausing between bursts.
    ///
    /// Returns the number of frames written.  Dropping the future (or
    /// aborting its task) stops the injection at the next pause or write.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Transport`] on the first failed write; later
    /// frames are not attempted.
    pub async fn run(self) -> Result<usize, DriverError> {
        let pause = self.plan.pause();
        let mut written = 0;
        for (i, burst) in self.plan.into_bursts().into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(pause).await;
            }
            for frame in &burst {
                write_frame(self.transport.as_ref(), frame).await?;
                written += 1;
            }
        }
        Ok(written)
    }
}

// ── Variant drivers ───────────────────────────────────────────────────────────

/// Driver for the Arduino Leonardo sentinel-protocol sketch.
pub struct SentinelDriver {
    encoder: SentinelEncoder,
    transport: Arc<dyn SerialTransport>,
}

impl SentinelDriver {
    pub fn new(transport: Arc<dyn SerialTransport>) -> Self {
        Self {
            encoder: SentinelEncoder::new(),
            transport,
        }
    }

    pub async fn on_key_event(&mut self, event: &KeyEvent) -> Result<(), DriverError> {
        if let Some(frame) = self.encoder.encode_key_event(event) {
            write_frame(self.transport.as_ref(), &frame).await?;
        }
        Ok(())
    }

    pub async fn on_mouse_event(&mut self, event: &MouseEvent) -> Result<(), DriverError> {
        if let Some(frame) = self.encoder.encode_mouse_event(event) {
            write_frame(self.transport.as_ref(), &frame).await?;
        }
        Ok(())
    }

    pub fn sequence_job(&self, text: &str) -> Result<SequenceJob, DriverError> {
        Ok(SequenceJob {
            plan: self.encoder.encode_sequence(text)?,
            transport: Arc::clone(&self.transport),
        })
    }
}

/// Driver for the WCH CH9329 chip.
pub struct Ch9329Driver {
    encoder: Ch9329Encoder,
    transport: Arc<dyn SerialTransport>,
}

impl Ch9329Driver {
    pub fn new(transport: Arc<dyn SerialTransport>) -> Self {
        Self {
            encoder: Ch9329Encoder::new(),
            transport,
        }
    }

    pub async fn on_key_event(&mut self, event: &KeyEvent) -> Result<(), DriverError> {
        if let Some(frame) = self.encoder.encode_key_event(event) {
            write_frame(self.transport.as_ref(), &frame.to_bytes()).await?;
        }
        Ok(())
    }

    pub async fn on_mouse_event(&mut self, event: &MouseEvent) -> Result<(), DriverError> {
        if let Some(frame) = self.encoder.encode_mouse_event(event) {
            write_frame(self.transport.as_ref(), &frame.to_bytes()).await?;
        }
        Ok(())
    }

    /// Presses `key_codes` together in one report, then releases them all.
    ///
    /// The live keyboard state is not affected.  Codes with no HID mapping
    /// are ignored; if none map, nothing is sent.
    pub async fn send_keys(&self, key_codes: &[u16]) -> Result<(), DriverError> {
        let Some(frames) = Ch9329Encoder::key_combo_frames(key_codes.iter().copied()) else {
            debug!("no mappable key in combo {key_codes:?}");
            return Ok(());
        };
        for frame in &frames {
            write_frame(self.transport.as_ref(), &frame.to_bytes()).await?;
        }
        Ok(())
    }

    pub fn sequence_job(&self, text: &str) -> Result<SequenceJob, DriverError> {
        Ok(SequenceJob {
            plan: self.encoder.encode_sequence(text)?,
            transport: Arc::clone(&self.transport),
        })
    }
}

/// The active driver, selected by configuration.
pub enum Driver {
    Sentinel(SentinelDriver),
    Ch9329(Ch9329Driver),
}

impl Driver {
    pub fn new(kind: DriverKind, transport: Arc<dyn SerialTransport>) -> Self {
        match kind {
            DriverKind::ArduinoLeonardo => Self::Sentinel(SentinelDriver::new(transport)),
            DriverKind::Ch9329 => Self::Ch9329(Ch9329Driver::new(transport)),
        }
    }

    pub fn kind(&self) -> DriverKind {
        match self {
            Self::Sentinel(_) => DriverKind::ArduinoLeonardo,
            Self::Ch9329(_) => DriverKind::Ch9329,
        }
    }

    /// Applies a keyboard event and writes the resulting frame, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Transport`] if the write fails.
    pub async fn on_key_event(&mut self, event: &KeyEvent) -> Result<(), DriverError> {
        match self {
            Self::Sentinel(d) => d.on_key_event(event).await,
            Self::Ch9329(d) => d.on_key_event(event).await,
        }
    }

    /// Applies a mouse event and writes the resulting frame, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Transport`] if the write fails.
    pub async fn on_mouse_event(&mut self, event: &MouseEvent) -> Result<(), DriverError> {
        match self {
            Self::Sentinel(d) => d.on_mouse_event(event).await,
            Self::Ch9329(d) => d.on_mouse_event(event).await,
        }
    }

    /// Validates and encodes `text` for injection without sending anything.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Sequence`] if the text is too long.
    pub fn sequence_job(&self, text: &str) -> Result<SequenceJob, DriverError> {
        match self {
            Self::Sentinel(d) => d.sequence_job(text),
            Self::Ch9329(d) => d.sequence_job(text),
        }
    }

    /// Validates, encodes, and types out `text`, waiting until it is done.
    pub async fn send_sequence(&self, text: &str) -> Result<usize, DriverError> {
        self.sequence_job(text)?.run().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::transport::MockSerialTransport;
    use crate::infrastructure::serial::MockTransport;
    use ipkvm_core::KeyAction;

    fn recording() -> (Arc<MockTransport>, Arc<dyn SerialTransport>) {
        let mock = Arc::new(MockTransport::new());
        let transport: Arc<dyn SerialTransport> = mock.clone();
        (mock, transport)
    }

    #[tokio::test]
    async fn test_sentinel_key_event_writes_one_frame() {
        // Arrange
        let (mock, transport) = recording();
        let mut driver = Driver::new(DriverKind::ArduinoLeonardo, transport);

        // Act
        driver
            .on_key_event(&KeyEvent::new("a", 65, KeyAction::KeyDown))
            .await
            .unwrap();

        // Assert
        assert_eq!(mock.frames(), vec![vec![248, 1, b'a', 251]]);
    }

    #[tokio::test]
    async fn test_ch9329_key_event_writes_framed_report() {
        let (mock, transport) = recording();
        let mut driver = Driver::new(DriverKind::Ch9329, transport);

        driver
            .on_key_event(&KeyEvent::new("a", 65, KeyAction::KeyDown))
            .await
            .unwrap();

        assert_eq!(
            mock.frames(),
            vec![vec![0x57, 0xAB, 0, 0x02, 8, 0, 0, 0x04, 0, 0, 0, 0, 0, 0xFF]]
        );
    }

    #[tokio::test]
    async fn test_unmappable_input_writes_nothing() {
        let (mock, transport) = recording();
        let mut driver = Driver::new(DriverKind::Ch9329, transport);

        driver
            .on_key_event(&KeyEvent::new("Dead", 0, KeyAction::KeyDown))
            .await
            .unwrap();
        driver.on_mouse_event(&MouseEvent::ButtonDown(4)).await.unwrap();

        assert!(mock.frames().is_empty());
    }

    #[tokio::test]
    async fn test_send_keys_presses_then_releases() {
        let (mock, transport) = recording();
        let driver = Ch9329Driver::new(transport);

        // Ctrl + Alt + Delete
        driver.send_keys(&[17, 18, 46]).await.unwrap();

        let frames = mock.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0][5], 0x05, "Ctrl | Alt");
        assert_eq!(frames[0][7], 0x4C, "Delete");
        assert_eq!(&frames[1][5..13], &[0; 8]);
    }

    #[tokio::test]
    async fn test_too_long_sequence_fails_before_any_write() {
        let (mock, transport) = recording();
        let driver = Driver::new(DriverKind::ArduinoLeonardo, transport);

        let result = driver.sequence_job(&"a".repeat(9000));

        assert!(matches!(result, Err(DriverError::Sequence(_))));
        assert!(mock.frames().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sentinel_sequence_pauses_between_chunks() {
        // Arrange: 31 printable chars → 30 + 1
        let (mock, transport) = recording();
        let driver = Driver::new(DriverKind::ArduinoLeonardo, transport);

        // Act
        let written = driver
            .send_sequence("abcdefghijklmnopqrstuvwxyz01234")
            .await
            .unwrap();

        // Assert
        assert_eq!(written, 2);
        let stamps = mock.timestamps();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[1] - stamps[0] >= std::time::Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_as_transport_error() {
        // Arrange
        let mut mock = MockSerialTransport::new();
        mock.expect_write()
            .times(1)
            .returning(|_| Err(TransportError::NotOpen));
        let mut driver = Driver::new(DriverKind::Ch9329, Arc::new(mock));

        // Act
        let result = driver.on_mouse_event(&MouseEvent::Reset).await;

        // Assert
        assert!(matches!(result, Err(DriverError::Transport(TransportError::NotOpen))));
    }

    #[tokio::test]
    async fn test_sequence_aborts_on_first_write_failure() {
        // Arrange: every write fails; only the first may be attempted.
        let mut mock = MockSerialTransport::new();
        mock.expect_write()
            .times(1)
            .returning(|_| Err(TransportError::NotOpen));
        let driver = Driver::new(DriverKind::Ch9329, Arc::new(mock));

        // Act
        let result = driver.send_sequence("hello").await;

        // Assert: mockall verifies `times(1)` on drop
        assert!(matches!(result, Err(DriverError::Transport(_))));
    }

    #[test]
    fn test_driver_kind_reports_variant() {
        let (_, transport) = recording();
        assert_eq!(
            Driver::new(DriverKind::Ch9329, Arc::clone(&transport)).kind(),
            DriverKind::Ch9329
        );
        assert_eq!(
            Driver::new(DriverKind::ArduinoLeonardo, transport).kind(),
            DriverKind::ArduinoLeonardo
        );
    }
}
