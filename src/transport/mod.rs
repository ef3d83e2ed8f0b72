//! Socket transport to the peer process
//!
//! Newline-delimited commands and responses over a Unix domain socket (or
//! named pipe on Windows) or a TCP connection, chosen by the endpoint.

pub mod client;
pub mod codec;
pub mod dial;
pub mod endpoint;

pub use client::{ClientOptions, TransportClient};
pub use dial::{BoxedTransport, Dialer, SystemDialer, Transport};
pub use endpoint::Endpoint;
