//! HTTP surface: health check and background kickoff

pub mod crew;
pub mod health;

use crate::error::Result;
use crate::pipeline::Pipeline;
use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared application state injected into route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_handler))
        .route("/crew/kickoff", post(crew::kickoff_handler))
        .with_state(state)
}

pub async fn serve(pipeline: Pipeline, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse().map_err(|e| {
        crate::error::AgentHelperError::Configuration(format!(
            "Invalid listen address {}:{}: {}",
            host, port, e
        ))
    })?;

    let app = build_router(AppState {
        pipeline: Arc::new(pipeline),
    });

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
