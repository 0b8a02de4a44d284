use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::sinks::SnapshotReader;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and serve `/metrics` and `/snapshot`.
pub fn init(bind_addr: &str, snapshots: SnapshotReader) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid status bind address '{bind_addr}': {e}"))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus metrics recorder: {e}"))?;

    // Ignore error if the handle was already set; this should only be called once.
    let _ = PROM_HANDLE.set(handle);

    let app = router(snapshots);
    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                tracing::info!(%addr, "status server listening");
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    tracing::error!(error = %e, "status server error");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to bind status listener");
            }
        }
    });

    Ok(())
}

pub fn router(snapshots: SnapshotReader) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/snapshot", get(snapshot_handler))
        .with_state(snapshots)
}

async fn metrics_handler() -> String {
    PROM_HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}

async fn snapshot_handler(State(snapshots): State<SnapshotReader>) -> Response {
    match snapshots.latest() {
        Some(snapshot) => Json(snapshot.as_ref()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
