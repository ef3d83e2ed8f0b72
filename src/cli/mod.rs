//! CLI command handling
//!
//! Runs exchanges against the peer and formats output. Responses go to
//! stdout, one per line; diagnostics go to stderr.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::driver::{Metadata, SocketDriver};
use crate::transport::{ClientOptions, TransportClient};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Send { endpoint, commands } => {
            let driver = open_driver(endpoint, config).await?;

            let result = send_all(&driver, &commands).await;
            driver.close().await?;
            result
        }

        Commands::Shell { endpoint } => {
            let driver = open_driver(endpoint, config).await?;

            let result = run_shell(&driver).await;
            driver.close().await?;
            result
        }

        Commands::Info { json } => {
            // Metadata is static; no connection needed
            let driver = SocketDriver::from_client(TransportClient::new(
                config.endpoint.as_deref().unwrap_or_default(),
                ClientOptions::from(&config.transport),
            ));

            if json {
                println!("{}", serde_json::to_string_pretty(driver.metadata())?);
            } else {
                print_metadata(driver.metadata());
            }
            Ok(())
        }
    }
}

/// Build the driver for the endpoint given on the command line or in config
///
/// A failed first connection is only logged: every exchange dials again.
async fn open_driver(endpoint: Option<String>, config: &Config) -> Result<SocketDriver> {
    let endpoint = resolve_endpoint(endpoint, config)?;
    let (driver, initial) =
        SocketDriver::connect(endpoint.as_str(), ClientOptions::from(&config.transport)).await;

    if let Err(e) = initial {
        tracing::warn!("Initial connection to {} failed: {}", endpoint, e);
    }
    Ok(driver)
}

fn resolve_endpoint(endpoint: Option<String>, config: &Config) -> Result<String> {
    endpoint
        .or_else(|| config.endpoint.clone())
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| {
            Error::Config(
                "No endpoint given. Pass --endpoint or set `endpoint` in the config file"
                    .to_string(),
            )
        })
}

async fn send_all(driver: &SocketDriver, commands: &[String]) -> Result<()> {
    for command in commands {
        let response = driver.exchange(command).await?;
        println!("{}", response);
    }
    Ok(())
}

/// Exchange each stdin line; errors are reported and the loop goes on
async fn run_shell(driver: &SocketDriver) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match driver.exchange(command).await {
            Ok(response) => println!("{}", response),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

fn print_metadata(metadata: &Metadata) {
    println!("Name:         {}", metadata.name);
    println!("Description:  {}", metadata.description);
    let capabilities: Vec<String> = metadata.capabilities.iter().map(|c| c.to_string()).collect();
    println!("Capabilities: {}", capabilities.join(", "));
}
