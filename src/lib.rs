//! # Link Registry
//!
//! یک سرویس کوتاه‌کننده URL درون‌حافظه‌ای با لینک‌های تاریخ‌دار و آمار بازدید.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه - اینجا!
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── registry/       # نگاشت کد → لینک (هسته)
//! ├── request_log/    # لاگ append-only درخواست‌ها
//! ├── models/         # مدل‌های داده و DTO ها
//! ├── services/       # منطق کسب‌وکار
//! ├── api/            # لایه HTTP
//! └── utils/          # اعتبارسنجی، generator کد، ساعت
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust
//! use std::sync::Arc;
//! use link_registry::{config::Config, models::{CreateLinkRequest, Visitor}, services::LinkService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = LinkService::new(Arc::new(Config::default()));
//!     let created = service
//!         .create_link(CreateLinkRequest::new("https://example.com/a").shortcode("abc123"))
//!         .await
//!         .unwrap();
//!     assert_eq!(created.code, "abc123");
//!
//!     let url = service.resolve("abc123", &Visitor::default()).await.unwrap();
//!     assert_eq!(url, "https://example.com/a");
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول registry درون‌حافظه‌ای
pub mod registry;

/// ماژول لاگ درخواست‌ها
pub mod request_log;

/// ماژول مدل‌های داده (Domain Models)
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================

/// نتیجه عملیات با خطای سفارشی ما
pub use error::Result;

/// خطای اصلی برنامه
pub use error::AppError;

// =====================================
// Prelude Module
// =====================================
/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
///
/// ```rust
/// use link_registry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::registry::LinkRegistry;
    pub use crate::request_log::{RequestLogRecord, RequestLogSink};
    pub use crate::services::*;
}
