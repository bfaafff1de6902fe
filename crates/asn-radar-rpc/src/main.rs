//! ASN Radar RPC Server - JSON-RPC backend for the browser extension.
//!
//! This binary provides a JSON-RPC 2.0 server that wraps the asn-radar-core
//! library so the extension's page scripts can request ASN lookups.

mod handler;
mod server;

use anyhow::{Context, Result};
use asn_radar_core::{AsnLookupService, PathsConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "asn-radar-rpc")]
#[command(about = "JSON-RPC server for ASN Radar lookups")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Directory holding the settings and cache database
    /// (defaults to the platform data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!("Starting ASN Radar RPC Server");

    let data_dir = match args.data_dir {
        Some(path) => path,
        None => dirs::data_dir()
            .context("no platform data directory; pass --data-dir")?
            .join(PathsConfig::APP_DIR_NAME),
    };

    info!("Data directory: {}", data_dir.display());

    let service = AsnLookupService::open(&data_dir)?;

    // Start the server
    let addr = server::start_server(service, &args.host, args.port).await?;

    // Print port for the extension host to read (intentional stdout for IPC)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
