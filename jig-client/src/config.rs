//! Client configuration file.
//!
//! The station reads a small comma-separated config whose first
//! meaningful line must be the `ODROID-JIG-CLIENT-CONFIG` signature,
//! followed by `KEY,VALUE` lines:
//!
//! ```text
//! ODROID-JIG-CLIENT-CONFIG
//! MODEL,ODROID-N2L
//! FB,/dev/fb0
//! UART,/dev/ttyS0
//! ```
//!
//! Unknown keys are ignored so config files can carry extra entries for
//! other station tools.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

/// Required first line of every JIG client config
pub const CONFIG_SIGNATURE: &str = "ODROID-JIG-CLIENT-CONFIG";

/// Station configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// JIG model name shown on the panel
    pub model: String,
    /// Serial device node for the controller link
    pub uart_dev: String,
    /// Framebuffer device node (unused by the terminal backend)
    pub fb_dev: String,
}

/// Errors raised while loading the config
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    /// File does not start with the JIG config signature
    MissingSignature,
    /// No UART device configured; the client cannot open the link
    MissingUart,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config read failed: {e}"),
            ConfigError::MissingSignature => {
                write!(f, "not a JIG client config (missing {CONFIG_SIGNATURE})")
            }
            ConfigError::MissingUart => write!(f, "config has no UART entry"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Load and parse a config file
pub fn load(path: &Path) -> Result<ClientConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parse config text
pub fn parse(text: &str) -> Result<ClientConfig, ConfigError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    if lines.next() != Some(CONFIG_SIGNATURE) {
        return Err(ConfigError::MissingSignature);
    }

    let mut config = ClientConfig::default();
    for line in lines {
        let mut fields = line.splitn(2, ',');
        let key = fields.next().unwrap_or("").trim();
        let value = fields.next().unwrap_or("").trim();

        match key {
            "MODEL" => config.model = value.into(),
            "UART" => config.uart_dev = value.into(),
            "FB" => config.fb_dev = value.into(),
            _ => debug!("unknown config key {key:?} ignored"),
        }
    }

    if config.uart_dev.is_empty() {
        return Err(ConfigError::MissingUart);
    }
    Ok(config)
}
