//! ipkvm-bridge library crate.
//!
//! Receives keyboard and mouse events from a browser over a WebSocket and
//! replays them on a target machine through a USB HID bridge controller
//! attached to a serial port.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over WebSocket)
//!         ↓
//! [ipkvm-bridge]
//!   ├── domain/           Config schema, JSON message types
//!   ├── application/      EventRouter, Driver, SerialTransport trait
//!   └── infrastructure/
//!         ├── ws_server/  WebSocket accept loop (tokio-tungstenite)
//!         └── serial/     tokio-serial transport + recording mock
//!         ↓
//! Bridge controller (Arduino Leonardo or CH9329) → target USB port
//! ```
//!
//! # Layer rules
//!
//! - `domain` does no I/O.
//! - `application` depends on `domain` and `ipkvm-core`; it reaches the
//!   serial port only through [`application::SerialTransport`].
//! - `infrastructure` depends on everything else plus `tokio-tungstenite`
//!   and `tokio-serial`.

/// Domain layer: configuration and message types (no I/O).
pub mod domain;

/// Application layer: event routing and drivers.
pub mod application;

/// Infrastructure layer: WebSocket server and serial transports.
pub mod infrastructure;
