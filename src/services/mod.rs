//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- Business logic (اینجا!)
//! ├─────────────────┤
//! │  Link Registry  │  <-- نگاشت درون‌حافظه‌ای
//! └─────────────────┘
//! ```

mod link_service;

pub use link_service::*;

use std::sync::Arc;
use crate::{config::Config, request_log::RequestLogSink};

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// # مفاهیم:
/// - `Arc<T>`: Reference counting برای thread-safe sharing
/// - `Clone`: فقط Arc ها clone میشن، نه داده
/// - registry یک بار موقع startup ساخته میشه و از اینجا به handler ها میرسه
#[derive(Clone)]
pub struct AppState {
    /// تنظیمات برنامه
    pub config: Arc<Config>,

    /// سرویس لینک
    pub link_service: Arc<LinkService>,

    /// مقصد لاگ درخواست‌ها
    pub request_log: Arc<dyn RequestLogSink>,
}

impl AppState {
    /// ساخت AppState با registry خالی و وابستگی‌های production
    #[must_use]
    pub fn new(config: Config, request_log: Arc<dyn RequestLogSink>) -> Self {
        let config = Arc::new(config);
        let link_service = Arc::new(LinkService::new(config.clone()));

        Self {
            config,
            link_service,
            request_log,
        }
    }

    /// ساخت AppState با یک سرویس آماده (مثلا با ساعت دستی در تست)
    #[must_use]
    pub fn with_service(
        config: Arc<Config>,
        link_service: LinkService,
        request_log: Arc<dyn RequestLogSink>,
    ) -> Self {
        Self {
            config,
            link_service: Arc::new(link_service),
            request_log,
        }
    }
}
