//! Line-oriented request/response client
//!
//! One client owns at most one connection to its peer. Every exchange runs
//! under a lock that spans dial, write, flush and read, so concurrent callers
//! are queued and their bytes never interleave on the socket. Any transport
//! error drops the connection; the next exchange dials again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncWriteExt, BufStream};
use tokio::sync::{watch, Mutex};

use crate::common::config::TransportConfig;
use crate::common::{Error, Result};

use super::codec;
use super::dial::{BoxedTransport, Dialer, SystemDialer};
use super::endpoint::Endpoint;

/// Default connect and write deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default limit for one response line
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Transport tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Bound on dialing a network endpoint
    pub connect_timeout: Duration,
    /// Bound on writing and flushing one command
    pub write_timeout: Duration,
    /// Bound on reading one response line. `None` waits as long as the peer
    /// keeps the connection open.
    pub read_timeout: Option<Duration>,
    /// Longest accepted response line, newline included
    pub max_response_bytes: usize,
    /// Keep the connection between exchanges. When false, every exchange
    /// discards the previous connection and dials a fresh one.
    pub reuse_connection: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
            read_timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            reuse_connection: false,
        }
    }
}

impl From<&TransportConfig> for ClientOptions {
    fn from(config: &TransportConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            read_timeout: config.read_timeout_secs.map(Duration::from_secs),
            max_response_bytes: config.max_response_bytes,
            reuse_connection: config.reuse_connection,
        }
    }
}

type Connection = BufStream<BoxedTransport>;

/// Client for sending single-line commands to a peer process
pub struct TransportClient {
    endpoint: Endpoint,
    options: ClientOptions,
    dialer: Arc<dyn Dialer>,
    /// Holds a usable connection or nothing
    connection: Mutex<Option<Connection>>,
    /// Bumped by `close` so exchanges holding the lock give it up
    closed: watch::Sender<u64>,
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .field("dialer", &self.dialer)
            .finish_non_exhaustive()
    }
}

impl TransportClient {
    /// Create a client without connecting. The first exchange dials.
    pub fn new(endpoint: impl Into<Endpoint>, options: ClientOptions) -> Self {
        Self::with_dialer(endpoint, options, Arc::new(SystemDialer))
    }

    /// Create a client that opens connections through `dialer`
    pub fn with_dialer(
        endpoint: impl Into<Endpoint>,
        options: ClientOptions,
        dialer: Arc<dyn Dialer>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            options,
            dialer,
            connection: Mutex::new(None),
            closed: watch::channel(0).0,
        }
    }

    /// Create a client and try to connect right away
    ///
    /// The client is returned even when the attempt fails; the result only
    /// reports how the attempt went. Later exchanges dial again.
    pub async fn connect(endpoint: impl Into<Endpoint>, options: ClientOptions) -> (Self, Result<()>) {
        let client = Self::new(endpoint, options);
        let result = client.reconnect().await;
        (client, result)
    }

    /// The endpoint this client dials
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The options this client was built with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Whether a connection is currently held
    ///
    /// Waits for any in-flight exchange to finish.
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Drop the current connection, if any, and dial a new one
    pub async fn reconnect(&self) -> Result<()> {
        let mut slot = self.connection.lock().await;
        self.discard(&mut slot);
        *slot = Some(self.dial().await?);
        Ok(())
    }

    /// Send one command and wait for its one-line response
    ///
    /// The command must not contain a newline; it is rejected without
    /// touching the connection. The response comes back with surrounding
    /// whitespace removed. On any transport error the connection is dropped
    /// and the error returned; nothing is retried here.
    pub async fn exchange(&self, command: &str) -> Result<String> {
        if command.contains(['\n', '\r']) {
            return Err(Error::InvalidCommand(command.to_string()));
        }

        // Subscribed before queueing: a close issued while waiting aborts this too
        let mut closed = self.closed.subscribe();
        let mut slot = self.connection.lock().await;
        let started = Instant::now();

        // Out of the slot while in use: if this future is dropped mid-exchange
        // the connection goes with it instead of staying behind half-used.
        let attempt = async {
            let mut conn = self.take_connection(&mut slot).await?;
            let response = self.round_trip(&mut conn, command).await?;
            Ok::<_, Error>((conn, response))
        };
        let outcome = tokio::select! {
            biased;
            _ = closed.changed() => Err(Error::Closed),
            outcome = attempt => outcome,
        };

        match outcome {
            Ok((conn, response)) => {
                tracing::debug!(
                    endpoint = %self.endpoint,
                    elapsed_ms = started.elapsed().as_micros() as f64 / 1000.0,
                    "Exchange complete"
                );
                tracing::trace!("<<< {}", response);
                *slot = Some(conn);
                Ok(response)
            }
            Err(Error::Closed) => {
                tracing::debug!(endpoint = %self.endpoint, "Exchange aborted by close");
                Err(Error::Closed)
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, "Exchange failed, dropping connection: {}", e);
                Err(e)
            }
        }
    }

    /// Drop the connection, if any. Always succeeds and may be called again.
    ///
    /// An exchange in progress, or queued behind one, is aborted with
    /// [`Error::Closed`] and its connection dropped.
    pub async fn close(&self) -> Result<()> {
        self.closed.send_modify(|generation| *generation = generation.wrapping_add(1));

        let conn = self.connection.lock().await.take();
        if let Some(mut conn) = conn {
            tracing::debug!(endpoint = %self.endpoint, "Closing connection");
            match tokio::time::timeout(self.options.write_timeout, conn.shutdown()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::debug!("Shutdown of {} failed: {}", self.endpoint, e),
                Err(_) => tracing::debug!("Shutdown of {} timed out", self.endpoint),
            }
        }
        Ok(())
    }

    /// Connection to use for the next exchange
    async fn take_connection(&self, slot: &mut Option<Connection>) -> Result<Connection> {
        if self.options.reuse_connection {
            if let Some(conn) = slot.take() {
                return Ok(conn);
            }
        }
        self.discard(slot);
        self.dial().await
    }

    fn discard(&self, slot: &mut Option<Connection>) {
        if slot.take().is_some() {
            tracing::trace!(endpoint = %self.endpoint, "Discarded previous connection");
        }
    }

    async fn dial(&self) -> Result<Connection> {
        tracing::debug!(endpoint = %self.endpoint, local = self.endpoint.is_local(), "Dialing");
        let transport = self
            .dialer
            .dial(&self.endpoint, self.options.connect_timeout)
            .await?;
        Ok(BufStream::new(transport))
    }

    async fn round_trip(&self, conn: &mut Connection, command: &str) -> Result<String> {
        tracing::trace!(">>> {}", command);

        let write_timeout = self.options.write_timeout;
        tokio::time::timeout(write_timeout, codec::write_line(conn, command))
            .await
            .map_err(|_| Error::WriteTimeout(write_timeout))??;

        let read = codec::read_line(conn, self.options.max_response_bytes);
        match self.options.read_timeout {
            Some(read_timeout) => tokio::time::timeout(read_timeout, read)
                .await
                .map_err(|_| Error::ReadTimeout(read_timeout))?,
            None => read.await,
        }
    }
}
