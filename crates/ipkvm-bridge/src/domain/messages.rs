//! JSON messages exchanged with the browser over the WebSocket.
//!
//! # Inbound format
//!
//! Every message is an object with a `cmd` string and a `payload` whose shape
//! depends on `cmd`:
//!
//! ```json
//! {"cmd":"keyevent",      "payload":["a", 65, "keydown"]}
//! {"cmd":"mouseEvent",    "payload":[[12, -3], "move"]}
//! {"cmd":"mouseEvent",    "payload":[0, "mousedown"]}
//! {"cmd":"mouseEvent",    "payload":["", "reset"]}
//! {"cmd":"inputSequence", "payload":"text to type"}
//! ```
//!
//! Parsing happens in two stages.  The envelope is decoded first so that an
//! unrecognised `cmd` can still be answered; the payload is then decoded
//! according to `cmd`.  Positional arrays do not map cleanly onto serde's
//! tagged enums, so the second stage works on a [`serde_json::Value`].
//!
//! # Outbound format
//!
//! ```json
//! {"cmd":"welcome","payload":"Open IP-KVM"}
//! {"cmd":"UNKNOWN"}
//! ```

use ipkvm_core::{KeyAction, KeyEvent, MouseEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding a browser message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed {cmd} payload: {reason}")]
    Payload { cmd: &'static str, reason: String },

    #[error("unknown key event type {0:?}")]
    UnknownKeyType(String),

    #[error("unknown mouse event type {0:?}")]
    UnknownMouseType(String),
}

/// First-stage decode target.
#[derive(Debug, Deserialize)]
struct Envelope {
    cmd: String,
    #[serde(default)]
    payload: Value,
}

/// A decoded browser message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Text to type out on the target.
    Sequence(String),
    /// Any `cmd` the bridge does not handle.  Carries the `cmd` for logging.
    Unknown(String),
}

impl InboundMessage {
    /// Decodes one WebSocket text frame.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError`] when the frame is not JSON, has no `cmd`, or
    /// carries a payload that does not fit its `cmd`.  An unknown `cmd` is not
    /// an error; it decodes to [`InboundMessage::Unknown`].
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.cmd.as_str() {
            "keyevent" => parse_key_event(envelope.payload).map(Self::Key),
            "mouseEvent" => parse_mouse_event(envelope.payload).map(Self::Mouse),
            "inputSequence" | "sendSequence" => match envelope.payload {
                Value::String(text) => Ok(Self::Sequence(text)),
                other => Err(payload_error("inputSequence", format!("expected string, got {other}"))),
            },
            _ => Ok(Self::Unknown(envelope.cmd)),
        }
    }

    /// Short name for log lines; never includes payload contents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Key(_) => "keyevent",
            Self::Mouse(_) => "mouseEvent",
            Self::Sequence(_) => "inputSequence",
            Self::Unknown(_) => "unknown",
        }
    }
}

fn payload_error(cmd: &'static str, reason: impl Into<String>) -> MessageError {
    MessageError::Payload {
        cmd,
        reason: reason.into(),
    }
}

fn parse_key_event(payload: Value) -> Result<KeyEvent, MessageError> {
    let (key, key_code, kind): (String, u16, String) =
        serde_json::from_value(payload).map_err(|e| payload_error("keyevent", e.to_string()))?;
    let action = match kind.as_str() {
        "keydown" => KeyAction::KeyDown,
        "keyup" => KeyAction::KeyUp,
        "reset" => KeyAction::Reset,
        _ => return Err(MessageError::UnknownKeyType(kind)),
    };
    Ok(KeyEvent::new(key, key_code, action))
}

fn parse_mouse_event(payload: Value) -> Result<MouseEvent, MessageError> {
    let (data, kind): (Value, String) =
        serde_json::from_value(payload).map_err(|e| payload_error("mouseEvent", e.to_string()))?;

    let number = |data: &Value| {
        data.as_f64()
            .ok_or_else(|| payload_error("mouseEvent", format!("{kind}: expected number, got {data}")))
    };
    let button = |data: &Value| {
        data.as_u64()
            .and_then(|id| u8::try_from(id).ok())
            .ok_or_else(|| payload_error("mouseEvent", format!("{kind}: invalid button id {data}")))
    };

    let event = match kind.as_str() {
        "move" => {
            let [dx, dy]: [f64; 2] = serde_json::from_value(data)
                .map_err(|e| payload_error("mouseEvent", format!("move: {e}")))?;
            MouseEvent::Move { dx, dy }
        }
        "mousedown" => MouseEvent::ButtonDown(button(&data)?),
        "mouseup" => MouseEvent::ButtonUp(button(&data)?),
        "wheel" => MouseEvent::Wheel(number(&data)?),
        "reset" => MouseEvent::Reset,
        "config-move-factor" => MouseEvent::ConfigMoveFactor(number(&data)?),
        _ => return Err(MessageError::UnknownMouseType(kind)),
    };
    Ok(event)
}

/// Messages the bridge sends to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "payload")]
pub enum OutboundMessage {
    /// Sent once right after the WebSocket handshake.
    #[serde(rename = "welcome")]
    Welcome(String),
    /// Reply to an unrecognised `cmd`.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
