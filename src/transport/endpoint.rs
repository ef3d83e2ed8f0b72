//! Endpoint classification
//!
//! An endpoint whose first character is a path separator names a local
//! domain socket; anything else is treated as `host:port`.

use std::fmt;
use std::path::{is_separator, Path, PathBuf};

/// Where the peer process listens
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Local domain socket at a filesystem path
    Local(PathBuf),
    /// Stream socket at `host:port`
    Network(String),
}

impl Endpoint {
    /// Classify an endpoint string
    pub fn parse(endpoint: &str) -> Self {
        if endpoint.starts_with(is_separator) {
            Endpoint::Local(PathBuf::from(endpoint))
        } else {
            Endpoint::Network(endpoint.to_string())
        }
    }

    /// Whether this endpoint dials a local domain socket
    pub fn is_local(&self) -> bool {
        matches!(self, Endpoint::Local(_))
    }

    /// Filesystem path of a local endpoint
    pub fn path(&self) -> Option<&Path> {
        match self {
            Endpoint::Local(path) => Some(path),
            Endpoint::Network(_) => None,
        }
    }
}

impl From<&str> for Endpoint {
    fn from(endpoint: &str) -> Self {
        Self::parse(endpoint)
    }
}

impl From<String> for Endpoint {
    fn from(endpoint: String) -> Self {
        Self::parse(&endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Local(path) => write!(f, "{}", path.display()),
            Endpoint::Network(addr) => f.write_str(addr),
        }
    }
}
