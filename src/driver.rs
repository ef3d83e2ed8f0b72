//! Socket driver
//!
//! Describes itself with static metadata and forwards every operation, as a
//! fully formed command line, to a remote program over the transport client.
//! Interpreting responses is up to the caller.

use std::fmt;

use serde::Serialize;

use crate::common::Result;
use crate::transport::{ClientOptions, Endpoint, TransportClient};

/// Driver name reported in metadata
pub const DRIVER_NAME: &str = "socket_driver";

const DRIVER_DESCRIPTION: &str =
    "Connects to a socket and delegates all driver operations to a remote program";

/// Kind of I/O a driver can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    AnalogInput,
    DigitalInput,
    DigitalOutput,
    Pwm,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::AnalogInput => "analog-input",
            Capability::DigitalInput => "digital-input",
            Capability::DigitalOutput => "digital-output",
            Capability::Pwm => "pwm",
        };
        f.write_str(name)
    }
}

/// Static description of a driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<Capability>,
}

impl Metadata {
    /// Whether the driver lists `capability`
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Driver that delegates to a peer over a [`TransportClient`]
#[derive(Debug)]
pub struct SocketDriver {
    client: TransportClient,
    metadata: Metadata,
}

impl SocketDriver {
    /// Create the driver and try to reach the peer right away
    ///
    /// Like [`TransportClient::connect`], the driver is returned even if the
    /// peer is unreachable; the result says whether the first attempt worked.
    pub async fn connect(endpoint: impl Into<Endpoint>, options: ClientOptions) -> (Self, Result<()>) {
        let (client, result) = TransportClient::connect(endpoint, options).await;
        (Self::from_client(client), result)
    }

    /// Wrap an existing client
    pub fn from_client(client: TransportClient) -> Self {
        Self {
            client,
            metadata: Metadata {
                name: DRIVER_NAME.to_string(),
                description: DRIVER_DESCRIPTION.to_string(),
                capabilities: vec![
                    Capability::AnalogInput,
                    Capability::DigitalInput,
                    Capability::DigitalOutput,
                    Capability::Pwm,
                ],
            },
        }
    }

    /// Static metadata; never touches the network
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Send a command to the peer and return its trimmed reply
    pub async fn exchange(&self, command: &str) -> Result<String> {
        self.client.exchange(command).await
    }

    /// Release the connection. Always succeeds.
    pub async fn close(&self) -> Result<()> {
        self.client.close().await
    }

    /// The underlying transport client
    pub fn client(&self) -> &TransportClient {
        &self.client
    }
}
