//! Mock driver peer for integration testing
//!
//! Listens on a TCP address or local socket path and answers every
//! newline-terminated command with a fixed reply, or echoes it back.
//! Prints `listening at: <address>` once it accepts connections.

use clap::Parser;
use interprocess::local_socket::tokio::prelude::*;
use interprocess::local_socket::{GenericFilePath, ListenerOptions};
use socket_driver::common::LISTEN_MARKER;
use socket_driver::Endpoint;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

#[derive(Parser, Debug, Clone)]
#[command(name = "mock_peer", about = "Line-oriented mock driver peer")]
struct Args {
    /// Socket path or host:port to listen on (port 0 picks a free port)
    endpoint: String,

    /// Reply sent for every command
    #[arg(long, default_value = "OK")]
    reply: String,

    /// Reply with the received command instead
    #[arg(long)]
    echo: bool,

    /// Close each connection after one reply
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("mock_peer: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> std::io::Result<()> {
    match Endpoint::parse(&args.endpoint) {
        Endpoint::Local(path) => {
            // Stale socket from an earlier run
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            let name = path.as_path().to_fs_name::<GenericFilePath>()?;
            let listener = ListenerOptions::new().name(name).create_tokio()?;
            println!("{} {}", LISTEN_MARKER, path.display());

            loop {
                let stream = listener.accept().await?;
                tokio::spawn(serve(stream, args.clone()));
            }
        }
        Endpoint::Network(addr) => {
            let listener = TcpListener::bind(&addr).await?;
            println!("{} {}", LISTEN_MARKER, listener.local_addr()?);

            loop {
                let (stream, _) = listener.accept().await?;
                tokio::spawn(serve(stream, args.clone()));
            }
        }
    }
}

async fn serve<S>(stream: S, args: Args)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let reply = if args.echo { line } else { args.reply.clone() };
        if writer.write_all(format!("{}\n", reply).as_bytes()).await.is_err() {
            break;
        }
        if args.once {
            break;
        }
    }
}
