//! socket-driver - send line commands to a driver peer process
//!
//! Connects to a peer over a Unix domain socket or TCP and exchanges
//! newline-terminated commands and responses.

use std::path::PathBuf;

use clap::Parser;
use socket_driver::commands::Commands;
use socket_driver::common::{config::Config, logging};
use socket_driver::{cli, Result};

#[derive(Parser)]
#[command(name = "socket-driver", about = "Line-oriented socket driver client")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to the log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Held until exit so the file writer flushes
    let _log_guard = if cli.log_file {
        logging::init_with_file().map(|(path, guard)| {
            tracing::debug!("Logging to {}", path.display());
            guard
        })
    } else {
        logging::init_cli();
        None
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli::dispatch(cli.command, &config).await
}
