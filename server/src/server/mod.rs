pub mod api;
pub mod router;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::app::SharedState;

/// Start the axum HTTP server, draining in-flight requests once `shutdown` fires.
pub async fn start_server(state: SharedState, shutdown: CancellationToken) -> Result<()> {
    let port = state.server_port();
    let app = router::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Streamers info server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
