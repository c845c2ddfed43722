//! Recording serial transport for tests.
//!
//! # Why a mock transport?
//!
//! The drivers' output is a byte stream on a serial line, which test code
//! cannot observe.  [`MockTransport`] stores every written frame together
//! with the (tokio) instant it was written, so tests can check both the
//! bytes and the pacing of text injection.  Under
//! `#[tokio::test(start_paused = true)]` those instants are virtual and the
//! pauses cost no wall-clock time.
//!
//! # Failure injection
//!
//! Call [`MockTransport::set_fail`] to make every later write fail with
//! [`TransportError::NotOpen`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::application::transport::{SerialTransport, TransportError};

/// A transport that records writes instead of performing them.
#[derive(Default)]
pub struct MockTransport {
    writes: Mutex<Vec<(Instant, Vec<u8>)>>,
    opens: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (`true`) or succeed (`false`).
    pub fn set_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Every frame written so far, in order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().iter().map(|(_, frame)| frame.clone()).collect()
    }

    /// The instant of every write, in order.
    pub fn timestamps(&self) -> Vec<Instant> {
        self.lock().iter().map(|(at, _)| *at).collect()
    }

    /// How many times `open` actually opened (first call only).
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Instant, Vec<u8>)>> {
        // A panicking test thread must not hide the frames from the others.
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SerialTransport for MockTransport {
    async fn open(&self) -> Result<bool, TransportError> {
        let first = self
            .opens
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        Ok(first)
    }

    async fn write(&self, bytes: &[u8]) -> Result<usize, TransportError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(TransportError::NotOpen);
        }
        self.lock().push((Instant::now(), bytes.to_vec()));
        Ok(bytes.len())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
