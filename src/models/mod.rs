//! # ماژول مدل‌ها (Domain Models)
//!
//! این ماژول مدل‌های داده برنامه رو تعریف میکنه.
//!
//! ## تفاوت انواع مدل:
//! - **Entity** (`LinkRecord`, `VisitEvent`): داده‌ای که در registry نگه داشته میشه
//! - **DTO**: برای ارسال/دریافت از API

mod link;
mod dto;

// Re-export همه مدل‌ها
pub use link::*;
pub use dto::*;
