//! # ساعت قابل تزریق
//!
//! انقضا همیشه با مقایسه `now` و `expires_at` حساب میشه. برای اینکه تست‌ها بتونن
//! زمان رو جلو ببرن، `now` از یک `Clock` گرفته میشه نه مستقیم از `Utc::now()`.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// منبع زمان فعلی
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// ساعت واقعی سیستم
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// ساعتی که فقط دستی جلو میره
///
/// clone ها حالت مشترک دارن؛ پس میشه یک نسخه رو به سرویس داد و با نسخه دیگه زمان رو جلو برد.
///
/// # مثال
/// ```rust
/// use chrono::Duration;
/// use link_registry::utils::{Clock, ManualClock};
///
/// let clock = ManualClock::default();
/// let start = clock.now();
/// clock.advance(Duration::minutes(2));
/// assert_eq!(clock.now() - start, Duration::minutes(2));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// جلو بردن ساعت
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// تنظیم زمان به یک مقدار مشخص
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_shares_state_between_clones() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::seconds(61));
        assert_eq!(clock.now(), start + Duration::seconds(61));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
