//! # Link Registry
//!
//! نگاشت درون‌حافظه‌ای از کد کوتاه به `LinkRecord`.
//!
//! ## مفاهیم Rust:
//! - **Arc<RwLock<T>>**: اشتراک امن یک state قابل تغییر بین task ها
//! - **Closures**: `inspect` و `snapshot` بدون clone کردن کل رکورد داده برمیگردونن
//!
//! ## قواعد همزمانی
//! - ساخت لینک (چک تکراری + تولید کد + insert) زیر یک write lock انجام میشه
//! - redirect (lookup + چک انقضا + افزایش شمارنده + اضافه کردن به لاگ) هم زیر یک write lock
//! - آمار و لیست فقط read lock میگیرن
//!
//! ## انقضا
//! رکوردهای منقضی هیچوقت پاک نمیشن؛ فقط موقع redirect مخفی میشن.
//! یعنی حافظه با تعداد لینک‌ها بدون سقف رشد میکنه.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    error::{AppError, OptionExt, Result},
    models::{LinkRecord, RegistrySummary, VisitEvent, Visitor},
    utils::CodeGenerator,
};

/// حداکثر تعداد تلاش برای پیدا کردن کد تولیدی آزاد
pub const MAX_GENERATE_ATTEMPTS: usize = 16;

/// کد لینک جدید از کجا بیاد
pub enum CodeRequest<'a> {
    /// کد انتخابی کاربر (قبلا اعتبارسنجی شده)
    Explicit(String),

    /// کد تولیدی؛ تا پیدا شدن کد آزاد دوباره تولید میشه
    Generate(&'a dyn CodeGenerator),
}

#[derive(Debug, Default)]
struct RegistryInner {
    links: HashMap<String, LinkRecord>,
    /// ترتیب insert برای لیست کردن
    order: Vec<String>,
}

impl RegistryInner {
    fn next_free_code(&self, generator: &dyn CodeGenerator) -> Result<String> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let code = generator.generate();
            if !self.links.contains_key(&code) {
                return Ok(code);
            }
            debug!(code = %code, "Generated code collided, re-rolling");
        }

        Err(AppError::Internal(
            "Failed to generate unique short code".to_string(),
        ))
    }
}

/// Registry لینک‌ها
///
/// clone کردن فقط `Arc` رو clone میکنه؛ همه clone ها یک state مشترک دارن.
/// هر تست میتونه registry مستقل خودش رو بسازه.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl LinkRegistry {
    /// ساخت registry خالی
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// اضافه کردن لینک جدید
    ///
    /// # Errors
    /// - `CodeTaken`: کد انتخابی قبلا وجود داره (حتی اگه منقضی شده باشه)
    /// - `Internal`: بعد از `MAX_GENERATE_ATTEMPTS` بار هنوز کد آزاد پیدا نشد
    pub async fn insert(
        &self,
        code: CodeRequest<'_>,
        original_url: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String> {
        let mut inner = self.inner.write().await;

        let code = match code {
            CodeRequest::Explicit(code) => {
                if inner.links.contains_key(&code) {
                    return Err(AppError::CodeTaken(code));
                }
                code
            }
            CodeRequest::Generate(generator) => inner.next_free_code(generator)?,
        };

        let record = LinkRecord::new(code.clone(), original_url, created_at, expires_at);
        inner.links.insert(code.clone(), record);
        inner.order.push(code.clone());

        Ok(code)
    }

    /// پیدا کردن URL اصلی و ثبت بازدید
    ///
    /// # Errors
    /// - `NotFound`: کد وجود نداره
    /// - `Expired`: `now > expires_at`؛ در این حالت هیچ چیزی تغییر نمیکنه
    pub async fn resolve(
        &self,
        code: &str,
        now: DateTime<Utc>,
        visitor: &Visitor,
    ) -> Result<String> {
        let mut inner = self.inner.write().await;
        let record = inner.links.get_mut(code).ok_or_not_found(code)?;

        if record.is_expired_at(now) {
            return Err(AppError::Expired(code.to_string()));
        }

        record.record_visit(VisitEvent::new(now, visitor));
        Ok(record.original_url.clone())
    }

    /// خوندن یک رکورد بدون تغییر و بدون چک انقضا
    pub async fn inspect<T>(&self, code: &str, f: impl FnOnce(&LinkRecord) -> T) -> Option<T> {
        let inner = self.inner.read().await;
        inner.links.get(code).map(f)
    }

    /// نگاشت همه رکوردها (فعال و منقضی) به ترتیب insert
    pub async fn snapshot<T>(&self, mut f: impl FnMut(&LinkRecord) -> T) -> Vec<T> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|code| inner.links.get(code))
            .map(|record| f(record))
            .collect()
    }

    /// تعداد کل رکوردها
    pub async fn len(&self) -> usize {
        self.inner.read().await.links.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// شمارش رکوردها بر اساس وضعیت در لحظه `now`
    pub async fn summary(&self, now: DateTime<Utc>) -> RegistrySummary {
        let inner = self.inner.read().await;

        inner
            .links
            .values()
            .fold(RegistrySummary::default(), |mut acc, record| {
                acc.total += 1;
                if record.is_expired_at(now) {
                    acc.expired += 1;
                } else {
                    acc.active += 1;
                }
                acc.visits += record.visit_count;
                acc
            })
    }
}
