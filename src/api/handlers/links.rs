//! # Link Handlers
//!
//! Handler‌های چهار endpoint اصلی

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    api::extractors::{JsonBody, VisitorInfo},
    error::{AppError, Result},
    models::{CreateLinkRequest, CreateLinkResponse, LinkStatsResponse, LinkSummary},
    services::AppState,
    utils::encode_location,
};

// =====================================
// Create Short Link
// =====================================
/// ساخت لینک کوتاه جدید
///
/// # Endpoint
/// `POST /shorturls`
///
/// # Request Body
/// ```json
/// {
///   "url": "https://example.com/long-url",
///   "validity": 30,        // optional, دقیقه
///   "shortcode": "mylink"  // optional
/// }
/// ```
///
/// # Response (201)
/// ```json
/// {
///   "shortLink": "http://localhost:5000/mylink",
///   "expiresAt": "2024-01-01T00:30:00.000000Z",
///   "secondsRemaining": 1800
/// }
/// ```
pub async fn create_link(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateLinkRequest>,
) -> Result<impl IntoResponse> {
    let created = state.link_service.create_link(request).await?;

    let response = CreateLinkResponse {
        short_link: state.config.short_link(&created.code),
        expires_at: created.expires_at,
        seconds_remaining: created.seconds_remaining,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

// =====================================
// Redirect
// =====================================
/// Redirect به URL اصلی و ثبت بازدید
///
/// # Endpoint
/// `GET /:code`
///
/// # Response
/// - 302 با header `Location`
/// - 404 اگه کد وجود نداشته باشه
/// - 410 اگه لینک منقضی شده باشه
pub async fn redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
    VisitorInfo(visitor): VisitorInfo,
) -> Result<Response> {
    let original_url = state.link_service.resolve(&code, &visitor).await?;

    info!(code = %code, "Redirecting");

    let location = encode_location(&original_url)
        .ok()
        .and_then(|location| HeaderValue::from_str(&location).ok())
        .ok_or_else(|| AppError::Internal(format!("invalid redirect target: {}", original_url)))?;

    // 302 Found؛ `Redirect::temporary` در axum کد 307 میده
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

// =====================================
// Link Stats
// =====================================
/// آمار یک لینک، حتی بعد از انقضا
///
/// # Endpoint
/// `GET /shorturls/:code`
///
/// # Response
/// ```json
/// {
///   "original": "https://...",
///   "expires": "2024-...Z",
///   "visits": 2,
///   "visitorLog": [
///     { "timestamp": "...Z", "userAgent": "curl/8.0", "platform": "Linux", "ip": "127.0.0.1" }
///   ]
/// }
/// ```
pub async fn get_link_stats(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkStatsResponse>> {
    let stats = state.link_service.get_stats(&code).await?;

    Ok(Json(stats))
}

// =====================================
// List Links
// =====================================
/// لیست همه لینک‌ها (فعال و منقضی)
///
/// # Endpoint
/// `GET /shorturls`
pub async fn list_links(State(state): State<AppState>) -> Json<Vec<LinkSummary>> {
    Json(state.link_service.list_all().await)
}
