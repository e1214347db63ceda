//! Trustshift Daemon - challenge-response authentication server

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use trustshift_auth::{Authenticator, MemoryRegistry, decode_public_key};
use trustshift_daemon::config::{DEFAULT_LISTEN_ADDR, DEFAULT_MAX_FRAME_SIZE};
use trustshift_daemon::{AuthService, ServerConfig, server};

/// Trustshift Daemon - public key authentication service
#[derive(Parser)]
#[command(name = "trustshift-daemon", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default if no command given)
    Serve,

    /// Print the algorithm, size and fingerprint of a PEM public key
    Fingerprint {
        /// Path to an SPKI or PKCS#1 PEM file
        path: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, global = true, env = "TRUSTSHIFT_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    listen: SocketAddr,

    /// Largest accepted request frame, in bytes
    #[arg(
        long,
        global = true,
        env = "TRUSTSHIFT_MAX_FRAME_BYTES",
        default_value_t = DEFAULT_MAX_FRAME_SIZE
    )]
    max_frame_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fingerprint { path }) => cmd_fingerprint(&path),
        Some(Commands::Serve) | None => cmd_serve(cli.serve).await,
    }
}

fn cmd_fingerprint(path: &Path) -> anyhow::Result<()> {
    let pem = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let key = decode_public_key(&pem)
        .with_context(|| format!("{} is not a usable public key", path.display()))?;

    println!(
        "{}-{} {}",
        key.algorithm(),
        key.modulus_bits(),
        key.fingerprint()
    );
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::new(args.listen, args.max_frame_bytes)?;

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        max_frame_bytes = config.max_frame_size,
        "Trustshift daemon listening"
    );

    let service = AuthService::new(Authenticator::new(MemoryRegistry::new()));
    server::serve(listener, service, config.max_frame_size, shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
