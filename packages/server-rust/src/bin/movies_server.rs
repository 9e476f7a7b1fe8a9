//! `movies-server` binary: seeds the store, binds, serves until signalled.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use movies_server::cli::ServerArgs;
use movies_server::storage::{load_store, MovieStore};
use movies_server::telemetry::init_tracing;
use movies_server::NetworkModule;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.log_json);

    let seed = args.seed_json()?;
    let store = load_store(&seed).context("failed to load seed dataset")?;
    info!(movies = store.len(), "movie store seeded");

    let mut module = NetworkModule::new(args.network_config(), Arc::new(store));
    let port = module.start().await?;
    info!("Server running on port: http://localhost:{port}");

    module.serve(shutdown_signal()).await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
