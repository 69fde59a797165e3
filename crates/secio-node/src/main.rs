//! Secio node binary.
//!
//! # Usage
//!
//! ```bash
//! # Echo server with an Ed25519 identity
//! secio-node listen --bind 127.0.0.1:4001
//!
//! # Send one message with an RSA identity
//! secio-node --key-type rsa dial --addr 127.0.0.1:4001 --message hello
//! ```

use std::{sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use secio_core::SecioConfig;
use secio_node::{IdentityKind, dial, serve};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Secio secure-channel echo node
#[derive(Parser, Debug)]
#[command(name = "secio-node")]
#[command(about = "Run the secio handshake over TCP and echo messages")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Identity key algorithm
    #[arg(long, value_enum, default_value = "ed25519")]
    key_type: IdentityKind,

    /// Handshake deadline in seconds (0 waits forever)
    #[arg(long, default_value = "30")]
    handshake_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Accept connections and echo every message
    Listen {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:4001")]
        bind: String,
    },
    /// Connect, send one message, and print the echo
    Dial {
        /// Address to connect to
        #[arg(short, long)]
        addr: String,

        /// Message to send
        #[arg(short, long, default_value = "hello over secio")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = SecioConfig {
        handshake_timeout: (args.handshake_timeout_secs > 0).then(|| Duration::from_secs(args.handshake_timeout_secs)),
        ..SecioConfig::default()
    };

    if args.key_type == IdentityKind::Rsa {
        tracing::info!("generating RSA identity, this can take a moment");
    }
    let identity = args.key_type.generate()?;

    match args.command {
        Command::Listen { bind } => {
            let listener = TcpListener::bind(&bind).await?;
            tracing::info!("secio node listening on {}", listener.local_addr()?);
            serve(listener, Arc::new(identity), Arc::new(config)).await?;
        },
        Command::Dial { addr, message } => {
            let reply = dial(&addr, &identity, &config, message.as_bytes()).await?;
            tracing::info!(reply = %String::from_utf8_lossy(&reply), "echo received");
        },
    }

    Ok(())
}
