//! Bridge configuration: schema, defaults, and TOML loading.
//!
//! A config file is optional.  Every field has a default, so an empty file,
//! a partial file, and no file at all all produce a usable configuration:
//!
//! ```toml
//! app_title = "Open IP-KVM"
//! log_level = "info"
//! driver = "ch9329"            # or "arduino-leonardo"
//!
//! [server]
//! bind_address = "0.0.0.0"
//! listen_port = 8000
//!
//! [serial]
//! port_path = "/dev/ttyUSB0"
//! baud_rate = 9600
//! ```
//!
//! Command-line flags are applied on top by the binary.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown driver {0:?} (expected \"arduino-leonardo\" or \"ch9329\")")]
    UnknownDriver(String),

    #[error("invalid listen address '{0}'")]
    InvalidBindAddress(String),
}

/// Which bridge controller sits on the other end of the serial line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriverKind {
    /// Arduino Leonardo running the sentinel-protocol sketch.
    ArduinoLeonardo,
    /// WCH CH9329 serial-to-HID chip.
    #[default]
    Ch9329,
}

impl DriverKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArduinoLeonardo => "arduino-leonardo",
            Self::Ch9329 => "ch9329",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arduino-leonardo" => Ok(Self::ArduinoLeonardo),
            "ch9329" => Ok(Self::Ch9329),
            other => Err(ConfigError::UnknownDriver(other.to_string())),
        }
    }
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// Sent to every browser in the welcome message.
    #[serde(default = "default_app_title")]
    pub app_title: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub driver: DriverKind,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub serial: SerialConfig,
}

/// WebSocket listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

/// Serial line to the bridge controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    #[serde(default = "default_port_path")]
    pub port_path: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_app_title() -> String {
    "Open IP-KVM".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_listen_port() -> u16 {
    8000
}
fn default_port_path() -> String {
    "/dev/ttyUSB0".to_string()
}
fn default_baud_rate() -> u32 {
    9600
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            app_title: default_app_title(),
            log_level: default_log_level(),
            driver: DriverKind::default(),
            server: ServerConfig::default(),
            serial: SerialConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            listen_port: default_listen_port(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_path: default_port_path(),
            baud_rate: default_baud_rate(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl BridgeConfig {
    /// Parses a TOML document, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed or a field has
    /// the wrong type (including an unknown `driver` name).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The socket address the WebSocket server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not
    /// an IP address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let text = format!("{}:{}", self.server.bind_address, self.server.listen_port);
        text.parse()
            .map_err(|_| ConfigError::InvalidBindAddress(text))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let cfg = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.app_title, "Open IP-KVM");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.driver, DriverKind::Ch9329);
        assert_eq!(cfg.server.bind_address, "0.0.0.0");
        assert_eq!(cfg.server.listen_port, 8000);
        assert_eq!(cfg.serial.port_path, "/dev/ttyUSB0");
        assert_eq!(cfg.serial.baud_rate, 9600);
    }

    #[test]
    fn test_full_document_is_parsed() {
        // Arrange
        let toml = r#"
            app_title = "Rack 3"
            log_level = "debug"
            driver = "arduino-leonardo"

            [server]
            bind_address = "127.0.0.1"
            listen_port = 9090

            [serial]
            port_path = "/dev/ttyACM0"
            baud_rate = 115200
        "#;

        // Act
        let cfg = BridgeConfig::from_toml_str(toml).unwrap();

        // Assert
        assert_eq!(cfg.app_title, "Rack 3");
        assert_eq!(cfg.driver, DriverKind::ArduinoLeonardo);
        assert_eq!(cfg.server.listen_port, 9090);
        assert_eq!(cfg.serial.port_path, "/dev/ttyACM0");
        assert_eq!(cfg.serial.baud_rate, 115200);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg = BridgeConfig::from_toml_str("[serial]\nbaud_rate = 19200\n").unwrap();
        assert_eq!(cfg.serial.baud_rate, 19200);
        assert_eq!(cfg.serial.port_path, "/dev/ttyUSB0");
        assert_eq!(cfg.server, ServerConfig::default());
    }

    #[test]
    fn test_unknown_driver_in_toml_is_parse_error() {
        let result = BridgeConfig::from_toml_str("driver = \"teensy\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_driver_kind_from_str() {
        assert_eq!("ch9329".parse::<DriverKind>().unwrap(), DriverKind::Ch9329);
        assert_eq!(
            "arduino-leonardo".parse::<DriverKind>().unwrap(),
            DriverKind::ArduinoLeonardo
        );
        assert!(matches!(
            "CH9329".parse::<DriverKind>(),
            Err(ConfigError::UnknownDriver(_))
        ));
    }

    #[test]
    fn test_driver_kind_display_round_trips() {
        for kind in [DriverKind::ArduinoLeonardo, DriverKind::Ch9329] {
            assert_eq!(kind.to_string().parse::<DriverKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_listen_addr_combines_bind_and_port() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.listen_addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_listen_addr_rejects_hostname() {
        let mut cfg = BridgeConfig::default();
        cfg.server.bind_address = "not.an.ip".to_string();
        assert!(matches!(
            cfg.listen_addr(),
            Err(ConfigError::InvalidBindAddress(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = BridgeConfig::load(Path::new("/nonexistent/ipkvm/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
