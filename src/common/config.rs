//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;
use crate::transport::client::{DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Default endpoint used when none is given on the command line
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Transport settings
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Transport settings
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    /// Timeout for establishing a TCP connection
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Deadline for writing and flushing one command
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,

    /// Deadline for reading one response line. No deadline when absent.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,

    /// Longest accepted response line, newline included
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    /// Keep the connection open between exchanges instead of dialing per command
    #[serde(default)]
    pub reuse_connection: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            write_timeout_secs: default_write_timeout(),
            read_timeout_secs: None,
            max_response_bytes: default_max_response_bytes(),
            reuse_connection: false,
        }
    }
}

fn default_connect_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_write_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.transport.connect_timeout_secs == 0 {
            return Err(super::Error::Config(
                "transport.connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.transport.write_timeout_secs == 0 {
            return Err(super::Error::Config(
                "transport.write_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.transport.max_response_bytes == 0 {
            return Err(super::Error::Config(
                "transport.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
