//! Dataset Gateway - HTTP backend for forwarding dataset uploads to
//! decentralized storage.
//!
//! Accepts multipart uploads, stages them to local disk, pushes them into a
//! storage bucket through the Akave Link client, and relays bucket/file
//! metadata back to the caller.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use dataset_gateway::{http_server, AppState, Config};

/// Environment variable holding the storage node bearer credential.
/// Credentials are never accepted on the command line.
const API_KEY_ENV: &str = "AKAVE_API_KEY";

/// Dataset Gateway - forwards dataset uploads to decentralized storage
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Base URL of the Akave Link node
    #[arg(long, default_value = "http://localhost:8000")]
    storage_url: String,

    /// Bucket datasets are uploaded into
    #[arg(long, default_value = "datasets")]
    bucket: String,

    /// Directory uploads are staged in before forwarding
    #[arg(long, default_value = "uploads")]
    staging_dir: PathBuf,

    /// Comma-separated list of file extensions accepted for upload
    #[arg(long, default_value = "txt,csv,json,xml", value_delimiter = ',')]
    allowed_extensions: Vec<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    tracing::info!("Starting Dataset Gateway");

    let config = Config {
        listen_addr: SocketAddr::from_str(&format!("0.0.0.0:{}", args.port))?,
        storage_url: args.storage_url,
        api_key: std::env::var(API_KEY_ENV).ok(),
        bucket: args.bucket,
        staging_dir: args.staging_dir,
        allowed_extensions: args.allowed_extensions,
        log_level,
    };

    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create gateway state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    http_server::run(state, &config, shutdown_rx).await?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}
