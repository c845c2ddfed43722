//! Event router: dispatches decoded browser messages to the active driver
//! and owns the background text-injection task.
//!
//! # Ordering
//!
//! The router sits behind a single `tokio::sync::Mutex` shared by all
//! WebSocket sessions ([`SharedRouter`]).  Holding the lock across a whole
//! dispatch means events are applied one at a time in arrival order, and a
//! tracker update is always followed by its own frame before the next event
//! is looked at.
//!
//! # Text injection
//!
//! Typing out text takes seconds, so it runs as a spawned task that does not
//! hold the router lock.  At most one injection runs at a time: starting a
//! new one aborts the previous one, and closing the session that started an
//! injection aborts it too.  Aborting only drops the remaining frames.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::driver::{Driver, DriverError};
use crate::domain::messages::{InboundMessage, OutboundMessage};

/// The router as shared between WebSocket sessions.
pub type SharedRouter = Arc<Mutex<EventRouter>>;

/// An in-flight injection and the session that started it.
struct Injection {
    owner: Uuid,
    handle: JoinHandle<()>,
}

/// Routes inbound messages to the driver.
pub struct EventRouter {
    driver: Driver,
    injection: Option<Injection>,
}

impl EventRouter {
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            injection: None,
        }
    }

    /// Wraps the router for sharing across sessions.
    pub fn shared(self) -> SharedRouter {
        Arc::new(Mutex::new(self))
    }

    /// Handles one message from `session`.
    ///
    /// Returns the reply to send back, if any.  Only an unrecognised `cmd`
    /// produces a reply.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Transport`] when a frame write fails and
    /// [`DriverError::Sequence`] when injection text is rejected.  Neither is
    /// fatal to the session.
    pub async fn dispatch(
        &mut self,
        session: Uuid,
        message: InboundMessage,
    ) -> Result<Option<OutboundMessage>, DriverError> {
        match message {
            InboundMessage::Key(event) => self.driver.on_key_event(&event).await?,
            InboundMessage::Mouse(event) => self.driver.on_mouse_event(&event).await?,
            InboundMessage::Sequence(text) => self.start_injection(session, &text)?,
            InboundMessage::Unknown(cmd) => {
                debug!("session {session}: unknown cmd {cmd:?}");
                return Ok(Some(OutboundMessage::Unknown));
            }
        }
        Ok(None)
    }

    /// Validates `text` and starts typing it in the background, aborting any
    /// injection already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Sequence`] if the text is rejected.  A rejected
    /// request leaves a running injection untouched.
    pub fn start_injection(&mut self, session: Uuid, text: &str) -> Result<(), DriverError> {
        let job = self.driver.sequence_job(text)?;
        if self.abort_injection() {
            info!("session {session}: new text injection replaces the running one");
        }

        let frames = job.frame_count();
        info!("session {session}: injecting {} characters ({frames} frames)", text.chars().count());

        let handle = tokio::spawn(async move {
            match job.run().await {
                Ok(written) => info!("session {session}: text injection finished ({written} frames)"),
                Err(e) => warn!("session {session}: text injection aborted: {e}"),
            }
        });
        self.injection = Some(Injection {
            owner: session,
            handle,
        });
        Ok(())
    }

    /// Aborts the running injection if `session` started it.
    ///
    /// Returns `true` if an injection was aborted.
    pub fn cancel_injection(&mut self, session: Uuid) -> bool {
        match &self.injection {
            Some(injection) if injection.owner == session => self.abort_injection(),
            _ => false,
        }
    }

    /// `true` while an injection task is still running.
    pub fn is_injecting(&self) -> bool {
        self.injection
            .as_ref()
            .is_some_and(|injection| !injection.handle.is_finished())
    }

    fn abort_injection(&mut self) -> bool {
        let Some(injection) = self.injection.take() else {
            return false;
        };
        if injection.handle.is_finished() {
            return false;
        }
        injection.handle.abort();
        info!("text injection from session {} cancelled", injection.owner);
        true
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        if let Some(injection) = self.injection.take() {
            injection.handle.abort();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
