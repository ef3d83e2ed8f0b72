//! CLI command definitions
//!
//! Defines the clap commands for the socket-driver CLI.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send commands to the peer and print each response
    Send {
        /// Socket path or host:port (default: `endpoint` from the config file)
        #[arg(long, short)]
        endpoint: Option<String>,

        /// Commands to send, one exchange each, in order
        #[arg(required = true)]
        commands: Vec<String>,
    },

    /// Read commands from stdin, one per line, and print each response
    Shell {
        /// Socket path or host:port (default: `endpoint` from the config file)
        #[arg(long, short)]
        endpoint: Option<String>,
    },

    /// Print the driver's metadata
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
