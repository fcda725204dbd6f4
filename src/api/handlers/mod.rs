//! # HTTP Handlers
//!
//! ## Handler چیه؟
//! تابعی که request میگیره و response برمیگردونه.
//! در axum، هر handler یک async function هست.

pub mod links;
pub mod health;
