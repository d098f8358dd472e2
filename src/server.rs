//! HTTP endpoint for the skill.
//!
//! - `POST /`: a request envelope in, a response envelope out
//! - `GET /health`: liveness
//! - `GET /metrics`: dispatch counters as JSON

use crate::config::Config;
use crate::error::EnvelopeError;
use crate::skill::{EnvelopeVerifier, MetricsReport, RequestEnvelope, ResponseEnvelope, Skill};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub struct AppState {
    pub skill: Skill,
    pub verifier: EnvelopeVerifier,
}

impl AppState {
    pub fn new(skill: Skill, verifier: EnvelopeVerifier) -> Self {
        Self { skill, verifier }
    }

    /// Parse and verify a raw envelope, then dispatch it.
    pub fn handle_body(&self, body: &[u8]) -> Result<ResponseEnvelope, EnvelopeError> {
        let envelope: RequestEnvelope = serde_json::from_slice(body)?;
        self.verifier.verify(&envelope)?;
        Ok(self.skill.handle_envelope(&envelope))
    }
}

/// Build a verifier from the configuration.
pub fn verifier_from_config(config: &Config) -> EnvelopeVerifier {
    let verifier =
        EnvelopeVerifier::permissive().with_timestamp_tolerance(config.timestamp_tolerance_secs);
    match &config.skill_id {
        Some(skill_id) => verifier.with_skill_id(skill_id.clone()),
        None => {
            warn!("SKILL_ID not set, requests from any skill will be accepted");
            verifier
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(skill_endpoint))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured port and serve until Ctrl+C.
pub async fn serve(config: &Config, state: Arc<AppState>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn skill_endpoint(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ResponseEnvelope>, (StatusCode, String)> {
    match state.handle_body(&body) {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!("Rejected request: {}", e);
            state.skill.metrics().record_rejected();
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsReport> {
    Json(state.skill.metrics().report())
}
