//! # لاگ درخواست‌ها (Request Log)
//!
//! قبل از پردازش هر درخواست، یک رکورد به یک sink فقط-اضافه‌شونده (append-only) نوشته میشه.
//! این لاگ هیچوقت توسط registry خونده نمیشه؛ فقط یک کانال جانبی برای مشاهده‌پذیریه.
//!
//! ## مفاهیم Rust:
//! - **async_trait**: متد async در trait
//! - **Trait Objects**: `Arc<dyn RequestLogSink>` برای تعویض sink در تست
//! - **tokio::fs**: IO فایل غیرهمزمان

use std::path::{Path, PathBuf};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

use crate::{error::Result, utils::serialize_timestamp};

// =====================================
// Log Record
// =====================================
/// یک خط از لاگ درخواست‌ها
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub time: DateTime<Utc>,

    pub method: String,

    /// آدرس کامل درخواست (`http://host/path?query`)
    pub requested_url: String,

    #[serde(rename = "fromIP")]
    pub from_ip: String,

    /// بدنه خام درخواست به صورت متن (UTF-8 نامعتبر با `�` جایگزین میشه)
    pub body: String,

    pub request_id: String,
}

// =====================================
// Sink Trait
// =====================================
/// مقصد لاگ درخواست‌ها
#[async_trait]
pub trait RequestLogSink: Send + Sync {
    /// اضافه کردن یک رکورد به انتهای لاگ
    async fn append(&self, record: &RequestLogRecord) -> Result<()>;
}

// =====================================
// File Sink
// =====================================
/// فایل JSON Lines که فقط به انتهاش اضافه میشه
///
/// # مفاهیم:
/// - `tokio::sync::Mutex`: چون قفل در طول `.await` نگه داشته میشه
/// - هر رکورد یک خط کامل با یک `write_all` هست، پس خطوط در هم نمیرن
#[derive(Debug)]
pub struct FileRequestLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileRequestLog {
    /// باز کردن (یا ساختن) فایل لاگ در حالت append
    ///
    /// # Errors
    /// خطای IO اگه پوشه یا فایل ساخته نشه
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RequestLogSink for FileRequestLog {
    async fn append(&self, record: &RequestLogRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

// =====================================
// In-memory Sink
// =====================================
/// نگه داشتن رکوردها در حافظه (برای تست)
#[derive(Debug, Default)]
pub struct MemoryRequestLog {
    records: StdMutex<Vec<RequestLogRecord>>,
}

impl MemoryRequestLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// کپی همه رکوردهای ثبت شده
    #[must_use]
    pub fn records(&self) -> Vec<RequestLogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl RequestLogSink for MemoryRequestLog {
    async fn append(&self, record: &RequestLogRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(())
    }
}

/// sink که هیچ کاری نمیکنه
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRequestLog;

#[async_trait]
impl RequestLogSink for NoopRequestLog {
    async fn append(&self, _record: &RequestLogRecord) -> Result<()> {
        Ok(())
    }
}
