//! # سرویس لینک
//!
//! منطق کسب‌وکار: اعتبارسنجی ورودی به ترتیب مشخص، ساخت لینک، redirect و آمار
//!
//! ## ترتیب اعتبارسنجی ساخت لینک (اولین خطا برمیگرده)
//! 1. `url` نیست → `InvalidRequest`
//! 2. `url` شکل درستی نداره → `InvalidUrl`
//! 3. `validity` عدد صحیح نیست → `InvalidRequest`
//! 4. `shortcode` فرمت درستی نداره → `InvalidCode`
//! 5. `shortcode` تکراریه → `CodeTaken`

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    error::{AppError, OptionExt, Result},
    models::{
        validity_duration, CreateLinkRequest, CreatedLink, LinkStatsResponse, LinkSummary,
        RegistrySummary, Visitor,
    },
    registry::{CodeRequest, LinkRegistry},
    utils::{self, Clock, CodeGenerator, RandomCodeGenerator, SystemClock},
};

// =====================================
// Link Service
// =====================================
/// سرویس مدیریت لینک‌ها
///
/// # مسئولیت‌ها:
/// - ساخت لینک کوتاه (انتخابی یا تولیدی)
/// - Redirect و ثبت بازدید
/// - آمار یک لینک و لیست همه لینک‌ها
///
/// همه وابستگی‌ها (registry، generator، clock) تزریق میشن؛ هیچ state سراسری وجود نداره.
#[derive(Clone)]
pub struct LinkService {
    registry: LinkRegistry,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    config: Arc<Config>,
}

impl LinkService {
    /// ساخت سرویس با registry خالی، ساعت سیستم و generator تصادفی
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        let generator = RandomCodeGenerator::new(config.code_prefix.clone(), config.code_length);
        Self::with_parts(
            LinkRegistry::new(),
            Arc::new(generator),
            Arc::new(SystemClock),
            config,
        )
    }

    /// ساخت سرویس با وابستگی‌های دلخواه (برای تست)
    #[must_use]
    pub fn with_parts(
        registry: LinkRegistry,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            registry,
            generator,
            clock,
            config,
        }
    }

    /// دسترسی به registry
    #[must_use]
    pub fn registry(&self) -> &LinkRegistry {
        &self.registry
    }

    /// ساخت لینک کوتاه جدید
    ///
    /// # Errors
    /// - `InvalidRequest`: url یا validity نامعتبر
    /// - `InvalidUrl`: شکل URL
    /// - `InvalidCode`: فرمت shortcode
    /// - `CodeTaken`: shortcode تکراری
    #[instrument(skip(self, request))]
    pub async fn create_link(&self, request: CreateLinkRequest) -> Result<CreatedLink> {
        // Step 1 و 2: url
        let original_url = extract_url(request.url.as_ref())?;
        if !utils::is_valid_url(original_url) {
            return Err(AppError::InvalidUrl(format!(
                "'{}' doesn't look like a valid URL",
                original_url
            )));
        }

        // Step 3: مدت اعتبار
        let minutes = parse_validity(
            request.validity.as_ref(),
            self.config.default_validity_minutes,
        )?;

        // Step 4: shortcode
        let requested = extract_shortcode(request.shortcode.as_ref())?;

        let created_at = self.clock.now();
        let expires_at = validity_duration(minutes)
            .and_then(|validity| created_at.checked_add_signed(validity))
            .ok_or_else(|| AppError::InvalidRequest("validity is out of range".to_string()))?;

        // Step 5: insert (چک تکراری و تولید کد زیر یک lock)
        let code_request = match requested {
            Some(code) => CodeRequest::Explicit(code),
            None => CodeRequest::Generate(self.generator.as_ref()),
        };
        let code = self
            .registry
            .insert(code_request, original_url, created_at, expires_at)
            .await?;

        info!(code = %code, validity_minutes = minutes, "Created short link");

        // ثانیه‌های باقیمونده در لحظه پاسخ حساب میشه، نه لحظه ساخت
        let now = self.clock.now();
        let seconds_remaining = self
            .registry
            .inspect(&code, |record| record.seconds_remaining(now))
            .await
            .ok_or_not_found(&code)?;

        Ok(CreatedLink {
            code,
            expires_at,
            seconds_remaining,
        })
    }

    /// گرفتن URL اصلی برای redirect و ثبت بازدید
    ///
    /// # Errors
    /// - `NotFound`: کد وجود نداره
    /// - `Expired`: لینک منقضی شده
    #[instrument(skip(self, visitor))]
    pub async fn resolve(&self, code: &str, visitor: &Visitor) -> Result<String> {
        let now = self.clock.now();

        match self.registry.resolve(code, now, visitor).await {
            Ok(url) => {
                debug!(code = %code, "Recorded visit");
                Ok(url)
            }
            Err(err @ AppError::Expired(_)) => {
                warn!(code = %code, "Attempted to access expired link");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// آمار یک لینک (حتی اگه منقضی شده باشه)
    #[instrument(skip(self))]
    pub async fn get_stats(&self, code: &str) -> Result<LinkStatsResponse> {
        // `From<&LinkRecord>` برای همه lifetime ها نیست، پس closure لازمه
        self.registry
            .inspect(code, |record| LinkStatsResponse::from(record))
            .await
            .ok_or_not_found(code)
    }

    /// لیست همه لینک‌ها به ترتیب ساخت
    pub async fn list_all(&self) -> Vec<LinkSummary> {
        self.registry
            .snapshot(|record| LinkSummary::from(record))
            .await
    }

    /// خلاصه وضعیت registry در همین لحظه
    pub async fn summary(&self) -> RegistrySummary {
        self.registry.summary(self.clock.now()).await
    }
}

// =====================================
// Input parsing
// =====================================
/// `url` باید یه رشته غیرخالی باشه
fn extract_url(value: Option<&Value>) -> Result<&str> {
    match value {
        None | Some(Value::Null) => Err(AppError::missing_url()),
        Some(Value::String(url)) if url.is_empty() => Err(AppError::missing_url()),
        Some(Value::String(url)) => Ok(url.as_str()),
        Some(_) => Err(AppError::InvalidUrl("url must be a string".to_string())),
    }
}

/// تبدیل `validity` به دقیقه
///
/// - نبودن یا `null` → مقدار پیش‌فرض
/// - عدد صحیح → همون
/// - عدد اعشاری → بخش صحیح (به سمت صفر)
/// - رشته عددی (با فاصله اطراف) → عدد
fn parse_validity(value: Option<&Value>, default: i64) -> Result<i64> {
    let invalid = || {
        AppError::InvalidRequest("validity must be an integer number of minutes".to_string())
    };

    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => {
            if let Some(minutes) = n.as_i64() {
                return Ok(minutes);
            }
            let float = n.as_f64().filter(|f| f.is_finite()).ok_or_else(invalid)?;
            let truncated = float.trunc();
            if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(invalid());
            }
            Ok(truncated as i64)
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// shortcode خالی یا `null` یعنی "کد تولید کن"
fn extract_shortcode(value: Option<&Value>) -> Result<Option<String>> {
    let invalid = || {
        AppError::InvalidCode(format!(
            "shortcode must be alphanumeric and at most {} characters",
            utils::MAX_CUSTOM_CODE_LENGTH
        ))
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(code)) if code.is_empty() => Ok(None),
        Some(Value::String(code)) if utils::is_valid_short_code(code) => Ok(Some(code.clone())),
        Some(_) => Err(invalid()),
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ManualClock, SequenceCodeGenerator};
    use chrono::Duration;
    use serde_json::json;

    fn service_with(clock: ManualClock, generator: Arc<dyn CodeGenerator>) -> LinkService {
        LinkService::with_parts(
            LinkRegistry::new(),
            generator,
            Arc::new(clock),
            Arc::new(Config::default()),
        )
    }

    fn service(clock: ManualClock) -> LinkService {
        service_with(clock, Arc::new(RandomCodeGenerator::seeded("glam_", 6, 9)))
    }

    #[test]
    fn test_parse_validity() {
        assert_eq!(parse_validity(None, 30).unwrap(), 30);
        assert_eq!(parse_validity(Some(&json!(null)), 30).unwrap(), 30);
        assert_eq!(parse_validity(Some(&json!(5)), 30).unwrap(), 5);
        assert_eq!(parse_validity(Some(&json!(-5)), 30).unwrap(), -5);
        assert_eq!(parse_validity(Some(&json!(1.9)), 30).unwrap(), 1);
        assert_eq!(parse_validity(Some(&json!(-1.9)), 30).unwrap(), -1);
        assert_eq!(parse_validity(Some(&json!(" 15 ")), 30).unwrap(), 15);
        assert!(parse_validity(Some(&json!("abc")), 30).is_err());
        assert!(parse_validity(Some(&json!("1.5")), 30).is_err());
        assert!(parse_validity(Some(&json!(true)), 30).is_err());
        assert!(parse_validity(Some(&json!([1])), 30).is_err());
        assert!(parse_validity(Some(&json!(1e300)), 30).is_err());
    }

    #[test]
    fn test_extract_shortcode() {
        assert_eq!(extract_shortcode(None).unwrap(), None);
        assert_eq!(extract_shortcode(Some(&json!(""))).unwrap(), None);
        assert_eq!(
            extract_shortcode(Some(&json!("abc123"))).unwrap(),
            Some("abc123".to_string())
        );
        assert!(matches!(
            extract_shortcode(Some(&json!("abc-123"))),
            Err(AppError::InvalidCode(_))
        ));
        assert!(matches!(
            extract_shortcode(Some(&json!(123))),
            Err(AppError::InvalidCode(_))
        ));
    }

    #[tokio::test]
    async fn test_round_trip_with_expiry() {
        let clock = ManualClock::default();
        let service = service(clock.clone());

        let created = service
            .create_link(
                CreateLinkRequest::new("http://example.com/a")
                    .validity(1)
                    .shortcode("abc123"),
            )
            .await
            .unwrap();
        assert_eq!(created.code, "abc123");
        assert_eq!(created.seconds_remaining, 60);

        let url = service.resolve("abc123", &Visitor::default()).await.unwrap();
        assert_eq!(url, "http://example.com/a");
        assert_eq!(service.get_stats("abc123").await.unwrap().visits, 1);

        clock.advance(Duration::seconds(61));
        let err = service.resolve("abc123", &Visitor::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));

        let stats = service.get_stats("abc123").await.unwrap();
        assert_eq!(stats.visits, 1);
        assert_eq!(stats.visitor_log.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_order() {
        let service = service(ManualClock::default());

        // url نامعتبر قبل از shortcode نامعتبر گزارش میشه
        let request = CreateLinkRequest {
            url: Some(json!("nope")),
            validity: Some(json!("abc")),
            shortcode: Some(json!("bad code!")),
        };
        assert!(matches!(
            service.create_link(request).await,
            Err(AppError::InvalidUrl(_))
        ));

        // validity نامعتبر قبل از shortcode نامعتبر
        let request = CreateLinkRequest {
            url: Some(json!("http://example.com")),
            validity: Some(json!("abc")),
            shortcode: Some(json!("bad code!")),
        };
        assert!(matches!(
            service.create_link(request).await,
            Err(AppError::InvalidRequest(_))
        ));

        // url نیست
        assert!(matches!(
            service.create_link(CreateLinkRequest::default()).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.create_link(CreateLinkRequest::new("")).await,
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_default_validity_is_thirty_minutes() {
        let clock = ManualClock::default();
        let start = clock.now();
        let service = service(clock);

        let created = service
            .create_link(CreateLinkRequest::new("https://example.com"))
            .await
            .unwrap();

        assert_eq!(created.expires_at, start + Duration::minutes(30));
        assert_eq!(created.seconds_remaining, 1800);
        assert!(created.code.starts_with("glam_"));
    }

    #[tokio::test]
    async fn test_non_positive_validity_is_already_expired() {
        let clock = ManualClock::default();
        let service = service(clock.clone());

        service
            .create_link(
                CreateLinkRequest::new("https://example.com")
                    .validity(0)
                    .shortcode("zero"),
            )
            .await
            .unwrap();
        clock.advance(Duration::milliseconds(1));

        assert!(matches!(
            service.resolve("zero", &Visitor::default()).await,
            Err(AppError::Expired(_))
        ));
    }

    #[tokio::test]
    async fn test_seconds_remaining_matches_stored_record() {
        let clock = ManualClock::default();
        let service = service(clock.clone());

        let created = service
            .create_link(
                CreateLinkRequest::new("https://example.com")
                    .validity(-1)
                    .shortcode("past"),
            )
            .await
            .unwrap();
        assert_eq!(created.seconds_remaining, -60);

        let stored = service
            .registry()
            .inspect("past", |record| record.seconds_remaining(clock.now()))
            .await
            .unwrap();
        assert_eq!(created.seconds_remaining, stored);
    }

    #[tokio::test]
    async fn test_huge_validity_is_rejected() {
        let service = service(ManualClock::default());
        let err = service
            .create_link(CreateLinkRequest::new("https://example.com").validity(i64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(service.registry().is_empty().await);
    }

    #[tokio::test]
    async fn test_generated_code_avoids_existing_codes() {
        let generator = Arc::new(SequenceCodeGenerator::new(["taken", "taken", "free"]));
        let service = service_with(ManualClock::default(), generator);

        service
            .create_link(CreateLinkRequest::new("https://example.com").shortcode("taken"))
            .await
            .unwrap();
        let created = service
            .create_link(CreateLinkRequest::new("https://example.com/other"))
            .await
            .unwrap();

        assert_eq!(created.code, "free");
        assert_eq!(service.list_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_stats_unknown_code() {
        let service = service(ManualClock::default());
        assert!(matches!(
            service.get_stats("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
