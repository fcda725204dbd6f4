//! # مدل لینک
//!
//! Entity اصلی registry و رویداد بازدید

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::utils::{serialize_timestamp, UNKNOWN};

// =====================================
// Link Entity
// =====================================
/// یک لینک ذخیره شده در registry
///
/// # مفاهیم:
/// - فیلدهای `code`، `original_url`، `created_at` و `expires_at` بعد از ساخت تغییر نمیکنن
/// - فقط `record_visit` شمارنده و لاگ بازدید رو تغییر میده
/// - وضعیت (فعال/منقضی) ذخیره نمیشه؛ هر بار از روی زمان حساب میشه
#[derive(Debug, Clone, Serialize)]
pub struct LinkRecord {
    /// کد کوتاه (کلید یکتا)
    pub code: String,

    /// آدرس اصلی، همونطور که کاربر فرستاده
    pub original_url: String,

    /// زمان ساخت
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,

    /// زمان انقضا = created_at + validity
    #[serde(serialize_with = "serialize_timestamp")]
    pub expires_at: DateTime<Utc>,

    /// تعداد redirect های موفق
    pub visit_count: u64,

    /// لاگ بازدیدها به ترتیب زمانی
    pub visit_log: Vec<VisitEvent>,
}

impl LinkRecord {
    /// ساخت لینک جدید بدون بازدید
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        original_url: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            created_at,
            expires_at,
            visit_count: 0,
            visit_log: Vec::new(),
        }
    }

    /// وضعیت لینک در لحظه `now`
    ///
    /// لینک دقیقا در لحظه `expires_at` هنوز فعاله.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> LinkStatus {
        if now > self.expires_at {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == LinkStatus::Expired
    }

    /// ثانیه‌های باقیمونده تا انقضا (برای لینک منقضی منفی میشه)
    #[must_use]
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }

    /// ثبت یک بازدید: افزایش شمارنده و اضافه کردن به لاگ
    pub fn record_visit(&mut self, visit: VisitEvent) {
        self.visit_count += 1;
        self.visit_log.push(visit);
    }
}

/// وضعیت محاسبه شده یک لینک
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Expired,
}

// =====================================
// Visit Event
// =====================================
/// یک redirect ثبت شده
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEvent {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    /// User-Agent کلاینت یا `"unknown"`
    pub user_agent: String,

    /// سیستم‌عامل خود سرور (نه کلاینت)
    pub platform: String,

    /// آدرس IP کلاینت
    #[serde(rename = "ip")]
    pub source_ip: String,
}

impl VisitEvent {
    /// ساخت رویداد از اطلاعات بازدیدکننده
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, visitor: &Visitor) -> Self {
        Self {
            timestamp,
            user_agent: visitor
                .user_agent
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            platform: host_platform().to_string(),
            source_ip: visitor
                .source_ip
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// اطلاعاتی که از درخواست بازدیدکننده استخراج میشه
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    pub user_agent: Option<String>,
    pub source_ip: Option<String>,
}

/// نام سیستم‌عامل میزبان، با همون نام‌گذاری رایج (`Linux`، `Darwin`، `Windows`)
#[must_use]
pub fn host_platform() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

// =====================================
// Domain results
// =====================================
/// نتیجه ساخت لینک
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub seconds_remaining: i64,
}

/// خلاصه کل registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub visits: u64,
}

/// مدت اعتبار به دقیقه رو به `Duration` تبدیل میکنه؛ برای مقادیر خیلی بزرگ `None`
#[must_use]
pub fn validity_duration(minutes: i64) -> Option<Duration> {
    Duration::try_minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, second).unwrap()
    }

    #[test]
    fn test_status_is_recomputed_from_time() {
        let record = LinkRecord::new("abc", "http://example.com", at(0, 0), at(1, 0));

        assert_eq!(record.status_at(at(0, 30)), LinkStatus::Active);
        assert_eq!(record.status_at(at(1, 0)), LinkStatus::Active);
        assert_eq!(record.status_at(at(1, 1)), LinkStatus::Expired);
    }

    #[test]
    fn test_zero_validity_expires_right_after_creation() {
        let record = LinkRecord::new("abc", "http://example.com", at(0, 0), at(0, 0));
        assert!(!record.is_expired_at(at(0, 0)));
        assert!(record.is_expired_at(at(0, 1)));
    }

    #[test]
    fn test_seconds_remaining() {
        let record = LinkRecord::new("abc", "http://example.com", at(0, 0), at(1, 0));
        assert_eq!(record.seconds_remaining(at(0, 0)), 60);
        assert_eq!(record.seconds_remaining(at(1, 30)), -30);
    }

    #[test]
    fn test_record_visit_keeps_count_and_log_in_sync() {
        let mut record = LinkRecord::new("abc", "http://example.com", at(0, 0), at(1, 0));
        let visitor = Visitor::default();

        record.record_visit(VisitEvent::new(at(0, 1), &visitor));
        record.record_visit(VisitEvent::new(at(0, 2), &visitor));

        assert_eq!(record.visit_count, 2);
        assert_eq!(record.visit_log.len(), 2);
        assert_eq!(record.visit_log[0].timestamp, at(0, 1));
        assert_eq!(record.visit_log[1].timestamp, at(0, 2));
    }

    #[test]
    fn test_visit_event_defaults_to_unknown() {
        let event = VisitEvent::new(at(0, 0), &Visitor::default());
        assert_eq!(event.user_agent, "unknown");
        assert_eq!(event.source_ip, "unknown");
        assert_eq!(event.platform, host_platform());
    }

    #[test]
    fn test_visit_event_json_shape() {
        let visitor = Visitor {
            user_agent: Some("curl/8.0".to_string()),
            source_ip: Some("10.0.0.1".to_string()),
        };
        let json = serde_json::to_value(VisitEvent::new(at(0, 0), &visitor)).unwrap();

        assert_eq!(json["timestamp"], "2024-01-01T12:00:00.000000Z");
        assert_eq!(json["userAgent"], "curl/8.0");
        assert_eq!(json["ip"], "10.0.0.1");
        assert!(json.get("platform").is_some());
    }

    #[test]
    fn test_validity_duration_overflow() {
        assert_eq!(validity_duration(30), Some(Duration::minutes(30)));
        assert!(validity_duration(i64::MAX).is_none());
    }
}
