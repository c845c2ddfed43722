//! Domain layer for ipkvm-bridge.
//!
//! Pure types with no I/O: the runtime configuration schema and the JSON
//! messages exchanged with the browser.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, serial port, or WebSocket types
//! - Reading files or environment variables (the binary does that and hands
//!   the text to [`BridgeConfig::from_toml_str`])

pub mod config;
pub mod messages;

pub use config::{BridgeConfig, ConfigError, DriverKind, SerialConfig, ServerConfig};
pub use messages::{InboundMessage, MessageError, OutboundMessage};
