//! Open IP-KVM bridge: entry point.
//!
//! Accepts WebSocket connections from the browser front end and turns the
//! keyboard/mouse events they carry into frames for a USB HID bridge
//! controller on a serial port.
//!
//! # Usage
//!
//! ```text
//! ipkvm-bridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>        TOML config file
//!   --listen-port <PORT>   WebSocket listener port [default: 8000]
//!   --bind <ADDR>          IP address to bind [default: 0.0.0.0]
//!   --serial-port <PATH>   Serial device [default: /dev/ttyUSB0]
//!   --baud-rate <BAUD>     Serial baud rate [default: 9600]
//!   --driver <NAME>        "ch9329" or "arduino-leonardo" [default: ch9329]
//! ```
//!
//! # Precedence
//!
//! Built-in defaults < config file < environment variables < flags.
//!
//! | Variable            | Flag            |
//! |---------------------|-----------------|
//! | `IPKVM_CONFIG`      | `--config`      |
//! | `IPKVM_LISTEN_PORT` | `--listen-port` |
//! | `IPKVM_BIND`        | `--bind`        |
//! | `IPKVM_SERIAL_PORT` | `--serial-port` |
//! | `IPKVM_BAUD_RATE`   | `--baud-rate`   |
//! | `IPKVM_DRIVER`      | `--driver`      |

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ipkvm_bridge::application::{Driver, EventRouter, SerialTransport};
use ipkvm_bridge::domain::{BridgeConfig, DriverKind};
use ipkvm_bridge::infrastructure::run_server;
use ipkvm_bridge::infrastructure::serial::SerialPortTransport;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Open IP-KVM bridge.
///
/// Every flag is optional; an absent flag leaves the config file value (or
/// the built-in default) in place.
#[derive(Debug, Parser)]
#[command(
    name = "ipkvm-bridge",
    about = "WebSocket-to-serial bridge for USB HID bridge controllers",
    version
)]
struct Cli {
    /// TOML config file.
    #[arg(long, env = "IPKVM_CONFIG")]
    config: Option<PathBuf>,

    /// TCP port for the WebSocket server.
    #[arg(long, env = "IPKVM_LISTEN_PORT")]
    listen_port: Option<u16>,

    /// IP address to bind the WebSocket server to.
    #[arg(long, env = "IPKVM_BIND")]
    bind: Option<String>,

    /// Serial device the bridge controller is attached to.
    #[arg(long, env = "IPKVM_SERIAL_PORT")]
    serial_port: Option<String>,

    /// Serial baud rate.
    #[arg(long, env = "IPKVM_BAUD_RATE")]
    baud_rate: Option<u32>,

    /// Bridge controller type: `ch9329` or `arduino-leonardo`.
    #[arg(long, env = "IPKVM_DRIVER")]
    driver: Option<DriverKind>,
}

impl Cli {
    /// Loads the config file (if any) and applies the flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => BridgeConfig::default(),
        };

        if let Some(port) = self.listen_port {
            config.server.listen_port = port;
        }
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(path) = self.serial_port {
            config.serial.port_path = path;
        }
        if let Some(baud) = self.baud_rate {
            config.serial.baud_rate = baud;
        }
        if let Some(driver) = self.driver {
            config.driver = driver;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse flags and load the config.
/// 2. Initialise `tracing`: `RUST_LOG` wins, else the configured `log_level`.
/// 3. Open the serial port.  Failure here is fatal.
/// 4. Build the driver and router, install the Ctrl+C handler, and serve
///    WebSocket sessions until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_bridge_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "{} bridge starting: driver={}, serial={} @ {} baud",
        config.app_title, config.driver, config.serial.port_path, config.serial.baud_rate
    );

    // ── Serial transport ──────────────────────────────────────────────────────
    let transport = Arc::new(SerialPortTransport::new(
        config.serial.port_path.clone(),
        config.serial.baud_rate,
    ));
    transport
        .open()
        .await
        .with_context(|| format!("cannot start without serial port {}", config.serial.port_path))?;

    let router = EventRouter::new(Driver::new(config.driver, transport)).shared();

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    run_server(&config, router, running).await?;

    info!("bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
