//! # ماژول مدیریت خطاها (Error Handling)
//!
//! این ماژول سیستم مدیریت خطای برنامه رو تعریف میکنه.
//!
//! ## مفاهیم Rust:
//! - **Custom Error Types**: تعریف نوع خطای سفارشی
//! - **thiserror**: derive macro برای Error trait
//! - **From Trait**: تبدیل خودکار نوع‌ها
//! - **Result Type Alias**: alias برای ساده‌تر شدن کد
//!
//! ## دسته‌بندی خطاها
//!
//! | خطا | وضعیت HTTP |
//! |-----|-----------|
//! | `InvalidRequest`, `InvalidUrl`, `InvalidCode` | 400 |
//! | `CodeTaken` | 409 |
//! | `NotFound` | 404 |
//! | `Expired` | 410 |
//! | بقیه | 500 |
//!
//! هیچ خطایی داخل سرویس retry نمیشه؛ همه مستقیم به کلاینت برمیگردن.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای نوشتن `Result<LinkRecord, AppError>` میتونیم بنویسیم `Result<LinkRecord>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
///
/// # مفاهیم:
/// - `#[derive(Error)]`: از thiserror برای پیاده‌سازی Error trait
/// - `#[error("...")]`: پیام خطا برای هر نوع
/// - `#[from]`: تبدیل خودکار از نوع‌های دیگه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// درخواست ناقص یا خراب - 400
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// URL شکل درستی نداره - 400
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// shortcode فرمت درستی نداره - 400
    #[error("Invalid shortcode: {0}")]
    InvalidCode(String),

    /// shortcode قبلا گرفته شده - 409
    #[error("Shortcode '{0}' is already taken")]
    CodeTaken(String),

    /// کد وجود نداره - 404
    #[error("No link found for code '{0}'")]
    NotFound(String),

    /// کد وجود داشته ولی منقضی شده - 410
    #[error("Link '{0}' has expired")]
    Expired(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// خطای داخلی سرور - 500
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای سرور
    #[error("Server error: {0}")]
    Server(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای IO (مثلا نوشتن در فایل لاگ)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// خطای JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::InvalidRequest(_) | Self::InvalidUrl(_) | Self::InvalidCode(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::CodeTaken(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Expired(_) => StatusCode::GONE,

            // 5xx Server Errors
            Self::Internal(_)
            | Self::Server(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// کد کوتاه ماشینی برای بدنه پاسخ (مثلا `CODE_TAKEN`)
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::InvalidCode(_) => "INVALID_CODE",
            Self::CodeTaken(_) => "CODE_TAKEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Expired(_) => "EXPIRED",
            _ => "INTERNAL",
        }
    }

    /// خطای "فیلد url ارسال نشده"
    #[must_use]
    pub fn missing_url() -> Self {
        Self::InvalidRequest("missing URL field".to_string())
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// کد خطا (مثلا "NOT_FOUND")
    pub error: String,

    /// پیام خطا
    pub message: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// این باعث میشه بتونیم AppError رو مستقیم از handler برگردونیم
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // لاگ کردن خطاهای سرور
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();
        let error_response = ErrorResponse::new(self.kind(), self.to_string()).with_status(status);

        (status, Json(error_response)).into_response()
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به `AppError::NotFound` برای یک کد
    fn ok_or_not_found(self, code: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, code: &str) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(code.to_string()))
    }
}
