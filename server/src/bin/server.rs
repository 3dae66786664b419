//! Headless server binary.
//!
//! Connects the cache, starts the axum web server and waits for a shutdown
//! signal before draining.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use streamers_info_lib::app::SharedState;
use streamers_info_lib::server;
use streamers_info_lib::services::upstream::TwitchUpstream;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Step 1: Tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting streamers info server");

    // Step 2: Config
    let config = streamers_info_lib::init_foundation()?;

    // Step 3: Cache (fatal if unreachable)
    let store = streamers_info_lib::connect_store(&config).await?;

    // Steps 4-5: Upstream client and state
    let upstream = Arc::new(TwitchUpstream::from_config(&config)?);
    let state = SharedState::new(config, store, upstream);

    // Step 6: Web server
    let shutdown = CancellationToken::new();
    let server_state = state.clone();
    let server_shutdown = shutdown.clone();
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state, server_shutdown).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );

    // Step 7: Wait for shutdown signal, or for the server to exit on its own
    tokio::select! {
        _ = shutdown_signal() => {}
        _ = &mut server_handle => {
            anyhow::bail!("server exited unexpectedly");
        }
    }
    tracing::info!("Shutting down...");
    shutdown.cancel();

    if tokio::time::timeout(SHUTDOWN_GRACE, &mut server_handle)
        .await
        .is_err()
    {
        tracing::warn!("Server did not drain within {:?}, aborting", SHUTDOWN_GRACE);
        server_handle.abort();
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
