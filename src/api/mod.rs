//! HTTP layer exposing the prediction form and JSON API.

pub mod pages;
pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::pipeline::Runtime;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<Runtime>,
}

/// Routes over a runtime loaded once at startup.
pub fn router(runtime: Arc<Runtime>) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::submit))
        .route("/api/predict", post(routes::predict))
        .route("/api/status", get(routes::status))
        .route("/api/schema", get(routes::schema))
        .route("/healthz", get(routes::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { runtime })
}

pub async fn serve(runtime: Arc<Runtime>, host: String, port: u16) -> Result<()> {
    if !runtime.is_ready() {
        warn!("serving with prediction disabled; the form reports the load errors");
    }
    let router = router(runtime);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("parsing bind address {host}:{port}"))?;
    info!(%addr, "serving heart-risk form");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
