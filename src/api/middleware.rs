//! # Middleware
//!
//! Middleware‌های سفارشی برای پردازش request/response
//!
//! ## مفاهیم:
//! - **Middleware**: کد که قبل/بعد از handler اجرا میشه
//! - **from_fn / from_fn_with_state**: ساخت middleware از یک تابع async
//! - **Next**: ادامه زنجیره middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, header::HeaderValue, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::warn;

use crate::{
    api::extractors::client_ip,
    error::AppError,
    request_log::RequestLogRecord,
    services::AppState,
    utils::UNKNOWN,
};

/// نام header شناسه درخواست
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به هر request و response
///
/// اگه کلاینت خودش `X-Request-Id` فرستاده باشه همون استفاده میشه.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .or_else(|| HeaderValue::from_str(&nanoid::nanoid!(12)).ok());

    if let Some(value) = &request_id {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

// =====================================
// Request Log Middleware
// =====================================
/// نوشتن هر درخواست در لاگ append-only قبل از پردازش
///
/// # مفاهیم:
/// - بدنه یک بار بافر میشه و همون بایت‌ها دوباره به handler داده میشن
/// - خطای sink فقط لاگ میشه؛ درخواست رو خراب نمیکنه
/// - بدنه بزرگتر از `max_body_bytes` هم لاگ میشه (با body خالی) و بعد 400 برمیگرده
pub async fn log_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let read = axum::body::to_bytes(body, state.config.max_body_bytes).await;
    let logged_body = match &read {
        Ok(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Err(_) => String::new(),
    };

    let record = RequestLogRecord {
        time: Utc::now(),
        method: parts.method.to_string(),
        requested_url: full_url(&parts),
        from_ip: client_ip(&parts.extensions).unwrap_or_else(|| UNKNOWN.to_string()),
        body: logged_body,
        request_id: parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    };

    if let Err(err) = state.request_log.append(&record).await {
        warn!(error = %err, "Failed to append request log record");
    }

    match read {
        Ok(bytes) => next.run(Request::from_parts(parts, Body::from(bytes))).await,
        Err(err) => {
            AppError::InvalidRequest(format!("could not read request body: {}", err))
                .into_response()
        }
    }
}

/// بازسازی آدرس کامل درخواست از Host و path
fn full_url(parts: &Parts) -> String {
    if parts.uri.scheme().is_some() {
        return parts.uri.to_string();
    }

    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path = parts
        .uri
        .path_and_query()
        .map_or("/", |pq| pq.as_str());

    format!("http://{}{}", host, path)
}
