//! # Custom Extractors
//!
//! Extractor‌های سفارشی برای استخراج داده از request
//!
//! ## مفاهیم Rust + Axum:
//! - **FromRequest**: extractor که بدنه رو مصرف میکنه
//! - **FromRequestParts**: extractor که فقط header ها و extension ها رو میخونه
//! - **Rejection**: نوع خطا برای extractors

use std::{convert::Infallible, net::SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, Extensions},
    Json,
};
use serde::de::DeserializeOwned;

use crate::{error::AppError, models::Visitor};

// =====================================
// JSON Body Extractor
// =====================================
/// مثل `Json<T>` ولی هر خطای parse رو به `AppError::InvalidRequest` (400) تبدیل میکنه
///
/// # استفاده در handler:
/// ```rust,ignore
/// async fn handler(JsonBody(request): JsonBody<CreateLinkRequest>) -> ... {
///     // request حالا deserialize شده
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::InvalidRequest(rejection.body_text())),
        }
    }
}

// =====================================
// Visitor Extractor
// =====================================
/// اطلاعات بازدیدکننده برای ثبت در لاگ بازدید
///
/// هیچوقت reject نمیکنه؛ هر چیزی که نباشه `None` میشه.
#[derive(Debug, Clone)]
pub struct VisitorInfo(pub Visitor);

#[async_trait]
impl<S> FromRequestParts<S> for VisitorInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        Ok(VisitorInfo(Visitor {
            user_agent,
            source_ip: client_ip(&parts.extensions),
        }))
    }
}

/// IP مستقیم کلاینت از `ConnectInfo` (اگه سرور با connect info اجرا شده باشه)
#[must_use]
pub fn client_ip(extensions: &Extensions) -> Option<String> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}
