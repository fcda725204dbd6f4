//! # Data Transfer Objects (DTOs)
//!
//! شکل JSON ورودی و خروجی API
//!
//! ## مفاهیم:
//! - `#[serde(rename_all = "camelCase")]`: نام فیلدها در JSON
//! - ورودی عمدا با `serde_json::Value` خونده میشه تا ترتیب خطاها دست سرویس باشه

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{LinkRecord, VisitEvent};
use crate::utils::serialize_timestamp;

// =====================================
// Create Link
// =====================================
/// بدنه `POST /shorturls`
///
/// ```json
/// { "url": "https://example.com/a", "validity": 30, "shortcode": "abc123" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub url: Option<Value>,

    /// دقیقه؛ عدد صحیح، اعشاری یا رشته عددی
    #[serde(default)]
    pub validity: Option<Value>,

    #[serde(default)]
    pub shortcode: Option<Value>,
}

impl CreateLinkRequest {
    /// ساخت درخواست با مقادیر تایپ‌دار (برای استفاده مستقیم از کتابخانه و تست)
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(Value::String(url.into())),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn validity(mut self, minutes: i64) -> Self {
        self.validity = Some(Value::from(minutes));
        self
    }

    #[must_use]
    pub fn shortcode(mut self, code: impl Into<String>) -> Self {
        self.shortcode = Some(Value::String(code.into()));
        self
    }
}

/// پاسخ 201 ساخت لینک
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub short_link: String,

    #[serde(serialize_with = "serialize_timestamp")]
    pub expires_at: DateTime<Utc>,

    pub seconds_remaining: i64,
}

// =====================================
// Stats
// =====================================
/// پاسخ `GET /shorturls/{code}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatsResponse {
    pub original: String,

    #[serde(serialize_with = "serialize_timestamp")]
    pub expires: DateTime<Utc>,

    pub visits: u64,

    pub visitor_log: Vec<VisitEvent>,
}

impl From<&LinkRecord> for LinkStatsResponse {
    fn from(record: &LinkRecord) -> Self {
        Self {
            original: record.original_url.clone(),
            expires: record.expires_at,
            visits: record.visit_count,
            visitor_log: record.visit_log.clone(),
        }
    }
}

/// یک آیتم از `GET /shorturls`
#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    pub code: String,

    pub link: String,

    #[serde(serialize_with = "serialize_timestamp")]
    pub expires: DateTime<Utc>,

    pub clicks: u64,
}

impl From<&LinkRecord> for LinkSummary {
    fn from(record: &LinkRecord) -> Self {
        Self {
            code: record.code.clone(),
            link: record.original_url.clone(),
            expires: record.expires_at,
            clicks: record.visit_count,
        }
    }
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub links: usize,
    pub active_links: usize,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy(links: usize, active_links: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            links,
            active_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_request_accepts_partial_body() {
        let request: CreateLinkRequest =
            serde_json::from_str(r#"{"url": "http://example.com"}"#).unwrap();
        assert_eq!(request.url, Some(Value::from("http://example.com")));
        assert!(request.validity.is_none());
        assert!(request.shortcode.is_none());
    }

    #[test]
    fn test_response_field_names() {
        let expires = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let mut record = LinkRecord::new("abc123", "http://example.com/a", expires, expires);
        record.visit_count = 3;

        let summary = serde_json::to_value(LinkSummary::from(&record)).unwrap();
        assert_eq!(summary["code"], "abc123");
        assert_eq!(summary["link"], "http://example.com/a");
        assert_eq!(summary["expires"], "2024-01-01T00:30:00.000000Z");
        assert_eq!(summary["clicks"], 3);

        let stats = serde_json::to_value(LinkStatsResponse::from(&record)).unwrap();
        assert_eq!(stats["original"], "http://example.com/a");
        assert_eq!(stats["visits"], 3);
        assert!(stats["visitorLog"].as_array().unwrap().is_empty());

        let created = serde_json::to_value(CreateLinkResponse {
            short_link: "http://localhost:5000/abc123".to_string(),
            expires_at: expires,
            seconds_remaining: 1800,
        })
        .unwrap();
        assert_eq!(created["shortLink"], "http://localhost:5000/abc123");
        assert_eq!(created["secondsRemaining"], 1800);
        assert!(created.get("expiresAt").is_some());
    }
}
