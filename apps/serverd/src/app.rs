//! Daemon wiring: engine, handler, server, and the idle sweep.

use std::sync::Arc;
use std::time::Duration;

use filebay_server::{FileServer, FsHandler, ServerConfig};
use filebay_transfer::TransferEngine;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Runs the daemon until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = Arc::new(TransferEngine::new(&config.root_dir)?);
    tracing::info!(root = %engine.root().display(), "serving directory");

    let cancel = CancellationToken::new();
    let sweeper = FsHandler::spawn_sweeper(
        Arc::clone(&engine),
        Duration::from_secs(config.sweep_interval_secs),
        Duration::from_secs(config.idle_timeout_secs),
        cancel.clone(),
    );

    let server = FileServer::new(
        ServerConfig {
            port: config.listen_port,
        },
        FsHandler::new(Arc::clone(&engine)),
    );

    let server_task = {
        let server = Arc::clone(&server);
        tokio::spawn(async move { server.run().await })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    server.shutdown();
    cancel.cancel();
    server_task.await??;
    sweeper.await?;

    Ok(())
}
