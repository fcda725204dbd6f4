//! # Health Check Handler
//!
//! برای بررسی سلامت سرویس

use axum::{extract::State, Json};

use crate::{models::HealthResponse, services::AppState};

/// بررسی سلامت سرویس
///
/// # Endpoint
/// `GET /health`
///
/// # Response
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "links": 12,
///   "activeLinks": 9
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let summary = state.link_service.summary().await;

    Json(HealthResponse::healthy(summary.total, summary.active))
}
