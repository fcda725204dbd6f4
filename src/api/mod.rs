//! # لایه API
//!
//! این ماژول HTTP handlers و routing رو مدیریت میکنه.
//!
//! ## ساختار URL‌ها:
//! - `POST /shorturls` - ساخت لینک کوتاه
//! - `GET /shorturls` - لیست همه لینک‌ها
//! - `GET /shorturls/:code` - آمار یک لینک
//! - `GET /:code` - Redirect به URL اصلی
//! - `GET /health` - Health check
//!
//! مسیرهای ثابت (`/shorturls`، `/health`) بر `/:code` اولویت دارن،
//! پس کدی با همین نام‌ها از طریق redirect قابل دسترسی نیست.

mod handlers;
mod middleware;
mod extractors;

pub use handlers::*;
pub use middleware::*;
pub use extractors::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use std::time::Duration;

use crate::services::AppState;

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// # مفاهیم:
/// - `.route()`: اضافه کردن route
/// - `.layer()`: اضافه کردن middleware؛ آخرین layer بیرونی‌ترینه
/// - `.with_state()`: تزریق state
///
/// ترتیب اجرا برای هر درخواست:
/// trace → request id → request log → handler
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route(
            "/shorturls",
            post(handlers::links::create_link).get(handlers::links::list_links),
        )
        .route("/shorturls/:code", get(handlers::links::get_link_stats))
        .route("/health", get(handlers::health::health_check))
        .route("/:code", get(handlers::links::redirect))
        // لاگ درخواست‌ها قبل از handler
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::log_request,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id))
        // Middleware‌های عمومی
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
