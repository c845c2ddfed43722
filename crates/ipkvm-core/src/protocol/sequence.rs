//! Text injection: length validation and the typing plan both encoders emit.
//!
//! Pasting text into the target is done by "typing" it.  The bridge
//! controllers have small receive buffers, so the text is cut into bursts of
//! frames with a pause after each burst.  A [`TypingPlan`] is that schedule,
//! computed up front so that validation happens before a single byte leaves
//! the host.

use std::time::Duration;

use thiserror::Error;

/// Longest text, in characters, accepted for injection.
pub const MAX_SEQUENCE_CHARS: usize = 8192;

/// Errors raised while preparing a text sequence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// The text exceeds [`MAX_SEQUENCE_CHARS`].
    #[error("sequence is too long: {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Rejects text longer than [`MAX_SEQUENCE_CHARS`] characters.
///
/// # Errors
///
/// Returns [`SequenceError::TooLong`] with the offending length.
pub fn validate_sequence(text: &str) -> Result<(), SequenceError> {
    let len = text.chars().count();
    if len > MAX_SEQUENCE_CHARS {
        return Err(SequenceError::TooLong {
            len,
            max: MAX_SEQUENCE_CHARS,
        });
    }
    Ok(())
}

/// Frames written back-to-back without any pause in between.
pub type Burst = Vec<Vec<u8>>;

/// An ordered list of bursts separated by a fixed pause.
///
/// The pause goes *between* bursts: a plan with one burst needs no waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingPlan {
    bursts: Vec<Burst>,
    pause: Duration,
}

impl TypingPlan {
    /// Creates an empty plan with the given inter-burst pause.
    pub fn new(pause: Duration) -> Self {
        Self {
            bursts: Vec::new(),
            pause,
        }
    }

    pub fn push(&mut self, burst: Burst) {
        self.bursts.push(burst);
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn into_bursts(self) -> Vec<Burst> {
        self.bursts
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Total number of frames across all bursts.
    pub fn frame_count(&self) -> usize {
        self.bursts.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
