//! Infrastructure layer for ipkvm-bridge.
//!
//! Everything that touches the outside world lives here:
//!
//! - `serial`: the serial-port implementation of
//!   [`crate::application::SerialTransport`] plus a recording mock
//! - `ws_server`: the WebSocket accept loop and per-session tasks
//!
//! Protocol logic stays in the application layer and `ipkvm-core`.

pub mod serial;
pub mod ws_server;

pub use ws_server::{run_server, serve};
