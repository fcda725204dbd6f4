//! # ماژول تنظیمات (Configuration)
//!
//! این ماژول مسئول خوندن و مدیریت تنظیمات برنامه هست.
//!
//! ## مفاهیم Rust:
//! - **Default Trait**: مقادیر پیش‌فرض
//! - **Serde**: سریالایز/دسریالایز
//! - **Builder Pattern**: ساخت تدریجی آبجکت

use std::env;
use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use link_registry::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.default_validity_minutes, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس پایه برای لینک‌های کوتاه (`shortLink` در پاسخ ساخت)
    pub base_url: String,

    /// مدت اعتبار پیش‌فرض لینک (دقیقه)
    pub default_validity_minutes: i64,

    /// پیشوند ثابت کدهای تولید شده
    pub code_prefix: String,

    /// تعداد کاراکتر تصادفی بعد از پیشوند
    pub code_length: usize,

    /// مسیر فایل append-only لاگ درخواست‌ها
    pub request_log_path: String,

    /// حداکثر حجم بدنه درخواست که بافر میشه
    pub max_body_bytes: usize,

    /// حداکثر زمان پردازش هر درخواست (ثانیه)
    pub request_timeout_secs: u64,

    /// محیط اجرا (development, production)
    pub environment: Environment,
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// محیط توسعه - لاگ‌های خوانا
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید - لاگ JSON
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            default_validity_minutes: 30,
            code_prefix: "glam_".to_string(),
            code_length: 6,
            request_log_path: "requests.log".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout_secs: 30,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// ساخت تنظیمات از متغیرهای محیطی
    ///
    /// هر متغیری که نباشه یا parse نشه، مقدار پیش‌فرض رو میگیره.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه تنظیمات نهایی معتبر نباشن
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let get_env = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // helper generic برای parse کردن عدد
        fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
            env::var(key)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        }

        let config = Self {
            host: get_env("HOST", &defaults.host),
            port: parse_env("PORT", defaults.port),
            base_url: get_env("BASE_URL", &defaults.base_url),
            default_validity_minutes: parse_env(
                "DEFAULT_VALIDITY_MINUTES",
                defaults.default_validity_minutes,
            ),
            code_prefix: get_env("CODE_PREFIX", &defaults.code_prefix),
            code_length: parse_env("CODE_LENGTH", defaults.code_length),
            request_log_path: get_env("REQUEST_LOG_PATH", &defaults.request_log_path),
            max_body_bytes: parse_env("MAX_BODY_BYTES", defaults.max_body_bytes),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            environment: get_env("ENVIRONMENT", "development").into(),
        };

        config.validate()?;
        Ok(config)
    }

    /// اعتبارسنجی تنظیمات
    ///
    /// # Errors
    /// `AppError::Config` اگه یکی از مقادیر قابل استفاده نباشه
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.code_length == 0 {
            return Err(AppError::Config("CODE_LENGTH must be at least 1".to_string()));
        }

        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("BASE_URL cannot be empty".to_string()));
        }

        if self.max_body_bytes == 0 {
            return Err(AppError::Config("MAX_BODY_BYTES cannot be 0".to_string()));
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// لینک کوتاه کامل برای یک کد
    #[must_use]
    pub fn short_link(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use link_registry::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .host("0.0.0.0")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// تنظیم پورت
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// تنظیم هاست
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// تنظیم base_url
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// تنظیم اعتبار پیش‌فرض
    #[must_use]
    pub fn default_validity_minutes(mut self, minutes: i64) -> Self {
        self.config.default_validity_minutes = minutes;
        self
    }

    /// تنظیم پیشوند و طول کد تولیدی
    #[must_use]
    pub fn code_format(mut self, prefix: impl Into<String>, length: usize) -> Self {
        self.config.code_prefix = prefix.into();
        self.config.code_length = length;
        self
    }

    #[must_use]
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اعتبارسنجی fail بشه
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
