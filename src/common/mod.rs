//! Common utilities shared by the library, the CLI and the mock peer

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Marker printed by the mock peer once it accepts connections
pub const LISTEN_MARKER: &str = "listening at:";

/// Parse a "listening at:" address from peer output.
/// Handles IPv6 wildcard format [::]:PORT by converting to 127.0.0.1:PORT
pub fn parse_listen_address(line: &str) -> Option<String> {
    let addr_start = line.find(LISTEN_MARKER)?;
    let addr = line[addr_start + LISTEN_MARKER.len()..].trim();
    if addr.is_empty() {
        return None;
    }
    Some(match addr.strip_prefix("[::]:") {
        Some(port) => format!("127.0.0.1:{}", port),
        None => addr.to_string(),
    })
}
