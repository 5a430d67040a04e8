//! Prefix router server.
//!
//! Loads a route table from TOML (or uses the built-in demo table), then
//! serves it over HTTP until SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use prefix_router::config::{load_config, RouterConfig};
use prefix_router::lifecycle::{build_router, signals, Shutdown};
use prefix_router::observability::{logging, metrics};
use prefix_router::HttpServer;

#[derive(Parser)]
#[command(name = "prefix-router")]
#[command(about = "HTTP server backed by a prefix-scoped segment router", long_about = None)]
struct Cli {
    /// Route table in TOML. Without it the built-in demo table is served.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and build the route table, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::demo(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!("prefix-router v{} starting", env!("CARGO_PKG_VERSION"));

    match &cli.config {
        Some(path) => tracing::info!(path = %path.display(), groups = config.groups.len(), "Configuration loaded"),
        None => tracing::info!("No configuration given, serving demo route table"),
    }

    let router = build_router(&config)?;
    for group in router.groups() {
        tracing::info!(
            prefix = %group.prefix(),
            methods = ?group.methods(),
            routes = group.route_count(),
            paused = group.is_paused(),
            "Route group ready"
        );
    }
    if cli.check {
        tracing::info!("Configuration OK");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(&config, Arc::new(router))
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
