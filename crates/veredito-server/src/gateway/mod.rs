//! HTTP gateway (Axum) for the audit service.
//!
//! This module is primarily used by the `veredito` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handler::audit_handler;
pub use state::HandlerState;

use veredito::constants::{VEREDITO_STATUS_HEADER, VEREDITO_STATUS_HEALTHY};

/// Request body cap: room for several images at the per-image limit plus
/// the submission JSON.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/audits", post(audit_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub timestamp: String,
}

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        VEREDITO_STATUS_HEADER,
        HeaderValue::from_static(VEREDITO_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok",
            provider: state.engine.provider_name(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
        .into_response()
}
