//! Socket driver - line-oriented request/response client
//!
//! Delegates driver operations to a remote program: each command is one
//! line written to a TCP or local socket, each reply is one line read back.
//! The transport client reconnects on demand, serializes concurrent callers
//! and bounds dial and write operations with timeouts.

pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod transport;

pub use common::{Error, Result};
pub use driver::{Capability, Metadata, SocketDriver};
pub use transport::{ClientOptions, Endpoint, TransportClient};
