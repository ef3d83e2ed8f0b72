//! Dialing the peer
//!
//! Local endpoints go through the interprocess crate (Unix domain sockets on
//! Unix/macOS, named pipes on Windows); network endpoints use tokio TCP with a
//! bounded connect timeout.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use interprocess::local_socket::tokio::{prelude::*, Stream as LocalStream};
use interprocess::local_socket::GenericFilePath;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::common::{Error, Result};

use super::endpoint::Endpoint;

/// A connected byte stream to the peer
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Boxed transport as stored by the client
pub type BoxedTransport = Box<dyn Transport>;

/// Opens connections to an endpoint
#[async_trait]
pub trait Dialer: Send + Sync + fmt::Debug {
    /// Connect to `endpoint`. `connect_timeout` bounds network dials.
    async fn dial(&self, endpoint: &Endpoint, connect_timeout: Duration) -> Result<BoxedTransport>;
}

/// Dials real sockets
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDialer;

#[async_trait]
impl Dialer for SystemDialer {
    async fn dial(&self, endpoint: &Endpoint, connect_timeout: Duration) -> Result<BoxedTransport> {
        match endpoint {
            Endpoint::Local(path) => dial_local(path)
                .await
                .map_err(|e| Error::dial(&endpoint.to_string(), e)),
            Endpoint::Network(addr) => dial_network(addr, connect_timeout).await,
        }
    }
}

/// Connect to a local socket. No explicit timeout; the OS decides.
async fn dial_local(path: &Path) -> io::Result<BoxedTransport> {
    let name = path.to_fs_name::<GenericFilePath>()?;
    let stream = LocalStream::connect(name).await?;
    Ok(Box::new(stream))
}

async fn dial_network(addr: &str, connect_timeout: Duration) -> Result<BoxedTransport> {
    if addr.is_empty() {
        return Err(Error::InvalidEndpoint("endpoint is empty".to_string()));
    }

    let stream = connect_within(addr, connect_timeout, TcpStream::connect(addr)).await?;

    // Requests are single short lines; don't let Nagle hold them back
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("Could not set TCP_NODELAY on {}: {}", addr, e);
    }

    Ok(Box::new(stream))
}

async fn connect_within<F>(addr: &str, connect_timeout: Duration, connect: F) -> Result<TcpStream>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    tokio::time::timeout(connect_timeout, connect)
        .await
        .map_err(|_| Error::connect_timeout(addr, connect_timeout))?
        .map_err(|e| Error::dial(addr, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_dial_network() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let dialed = SystemDialer
            .dial(&Endpoint::parse(&addr), Duration::from_secs(5))
            .await;
        assert!(dialed.is_ok());
    }

    #[tokio::test]
    async fn test_dial_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = SystemDialer
            .dial(&Endpoint::parse(&addr), Duration::from_secs(5))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Dial { .. }));
    }

    #[tokio::test]
    async fn test_connect_timeout() {
        let started = std::time::Instant::now();
        let err = connect_within("192.0.2.1:9", Duration::from_millis(50), std::future::pending())
            .await
            .err()
            .unwrap();
        assert!(
            matches!(err, Error::ConnectTimeout { ref endpoint, timeout }
                if endpoint == "192.0.2.1:9" && timeout == Duration::from_millis(50)),
            "unexpected error: {err}"
        );
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_dial_empty_endpoint() {
        let err = SystemDialer
            .dial(&Endpoint::parse(""), Duration::from_secs(5))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dial_local() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peer.sock");
        let _listener = tokio::net::UnixListener::bind(&path).unwrap();

        let dialed = SystemDialer
            .dial(&Endpoint::parse(path.to_str().unwrap()), Duration::from_secs(5))
            .await;
        assert!(dialed.is_ok());
    }

    #[tokio::test]
    async fn test_dial_local_missing_socket() {
        let err = SystemDialer
            .dial(&Endpoint::parse("/nonexistent/socket-driver/peer.sock"), Duration::from_secs(5))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Dial { .. }));
    }
}
