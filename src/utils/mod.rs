//! # ماژول توابع کمکی (Utilities)
//!
//! این ماژول توابع و ثابت‌های کمکی رو ارائه میده.
//!
//! ## مفاهیم Rust:
//! - **once_cell::Lazy**: مقداردهی اولیه تنبل
//! - **Regex**: عبارات منظم
//! - **Traits**: تولید کد و ساعت به صورت قابل تعویض (برای تست)

mod clock;
mod generator;

pub use clock::*;
pub use generator::*;

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

// =====================================
// Constants
// =====================================
/// حداکثر طول shortcode که کاربر انتخاب میکنه
pub const MAX_CUSTOM_CODE_LENGTH: usize = 20;

/// مقداری که وقتی User-Agent نیست ذخیره میشه
pub const UNKNOWN: &str = "unknown";

// =====================================
// Lazy Statics (Regex patterns)
// =====================================
/// الگوی shortcode انتخابی کاربر: فقط حروف و اعداد، ۱ تا ۲۰ کاراکتر
pub static VALID_SHORT_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]{1,20}$").expect("Invalid regex pattern")
});

/// الگوی شکل URL
///
/// - scheme فقط `http` یا `https`
/// - دامنه با حداقل یک نقطه و بخش آخر حداقل ۲ کاراکتری
/// - مسیر اختیاری از کاراکترهای word، `-`، `.`، `/`، `~`، `%`
///
/// پورت و query string عمدا قبول نمیشن.
pub static VALID_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://([\w\-]+\.)+\w{2,}[\w\-./~%]*$").expect("Invalid regex pattern")
});

// =====================================
// Validation Functions
// =====================================
/// اعتبارسنجی shortcode انتخابی کاربر
///
/// # مثال
/// ```rust
/// use link_registry::utils::is_valid_short_code;
///
/// assert!(is_valid_short_code("abc123"));
/// assert!(!is_valid_short_code("abc-123"));
/// ```
#[must_use]
pub fn is_valid_short_code(code: &str) -> bool {
    VALID_SHORT_CODE.is_match(code)
}

/// بررسی شکل URL (بدون DNS و بدون نرمال‌سازی)
///
/// اول الگوی regex چک میشه، بعد `url::Url::parse` تا هر URL قبول شده
/// بعدا برای header `Location` هم قابل serialize باشه.
///
/// # مثال
/// ```rust
/// use link_registry::utils::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/a"));
/// assert!(!is_valid_url("ftp://example.com"));
/// ```
#[must_use]
pub fn is_valid_url(url_str: &str) -> bool {
    VALID_URL.is_match(url_str) && url::Url::parse(url_str).is_ok()
}

// =====================================
// Formatting
// =====================================
/// فرمت ISO-8601 با میکروثانیه و پسوند `Z`
///
/// # مثال
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use link_registry::utils::format_timestamp;
///
/// let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(format_timestamp(&t), "2024-01-02T03:04:05.000000Z");
/// ```
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// serializer برای فیلدهای زمانی با `#[serde(serialize_with = ...)]`
pub fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_timestamp(timestamp))
}

/// آماده کردن URL برای header `Location`
///
/// `\w` در الگوی URL یونیکد رو هم قبول میکنه ولی header فقط ASCII قابل‌مشاهده میگیره.
/// serializer کتابخونه `url` مسیر رو percent-encode و دامنه یونیکد رو به punycode تبدیل میکنه.
///
/// # Errors
/// `url::ParseError` اگه URL قابل parse نباشه
pub fn encode_location(url_str: &str) -> Result<String, url::ParseError> {
    url::Url::parse(url_str).map(String::from)
}
