//! Error types for the socket driver
//!
//! Transport errors carry enough context (endpoint, timeout) to be reported
//! as-is by callers. Whether an error is worth retrying is left to them.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the socket driver
#[derive(Error, Debug)]
pub enum Error {
    // === Dial Errors ===
    #[error("Failed to connect to '{endpoint}': {source}")]
    Dial {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("Connecting to '{endpoint}' timed out after {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    // === Write Errors ===
    #[error("Failed to send command: {0}")]
    Write(#[source] io::Error),

    #[error("Sending command timed out after {0:?}")]
    WriteTimeout(Duration),

    // === Read Errors ===
    #[error("Failed to read response: {0}")]
    Read(#[source] io::Error),

    #[error("Connection closed by peer before a complete response line was received")]
    ConnectionClosed,

    #[error("Waiting for response timed out after {0:?}")]
    ReadTimeout(Duration),

    #[error("Response line exceeds the {0} byte limit")]
    ResponseTooLarge(usize),

    #[error("Client was closed before the response arrived")]
    Closed,

    // === Caller Errors ===
    #[error("Invalid command {0:?}: commands must be a single line")]
    InvalidCommand(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a dial error for an endpoint
    pub fn dial(endpoint: &str, source: io::Error) -> Self {
        Self::Dial {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// Create a connect timeout error for an endpoint
    pub fn connect_timeout(endpoint: &str, timeout: Duration) -> Self {
        Self::ConnectTimeout {
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    /// Whether the error came from the socket itself (dial, write or read).
    ///
    /// Any such error has already invalidated the client's connection.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Dial { .. }
                | Error::ConnectTimeout { .. }
                | Error::Write(_)
                | Error::WriteTimeout(_)
                | Error::Read(_)
                | Error::ConnectionClosed
                | Error::ReadTimeout(_)
                | Error::ResponseTooLarge(_)
                | Error::Closed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_error_names_endpoint() {
        let err = Error::dial(
            "127.0.0.1:9999",
            io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert!(err.to_string().contains("127.0.0.1:9999"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_timeout_message_shows_duration() {
        let err = Error::ReadTimeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Waiting for response timed out after 250ms");
    }

    #[test]
    fn test_is_transport() {
        assert!(Error::ConnectionClosed.is_transport());
        assert!(Error::Closed.is_transport());
        assert!(Error::WriteTimeout(Duration::from_secs(5)).is_transport());
        assert!(Error::connect_timeout("host:1", Duration::from_secs(5)).is_transport());
        assert!(!Error::InvalidCommand("a\nb".into()).is_transport());
        assert!(!Error::Config("missing endpoint".into()).is_transport());
    }
}
