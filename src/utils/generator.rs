//! # تولید کد کوتاه
//!
//! کد تولیدی = پیشوند ثابت + N کاراکتر تصادفی حرف و عدد.
//! generator پشت یک trait هست تا تست‌ها بتونن نسخه seed شده یا ثابت تزریق کنن.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// کاراکترهای مجاز برای بخش تصادفی
pub const SHORT_CODE_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// طول پیش‌فرض بخش تصادفی
pub const DEFAULT_SHORT_CODE_LENGTH: usize = 6;

/// پیشوند پیش‌فرض کدهای تولیدی
pub const DEFAULT_CODE_PREFIX: &str = "glam_";

/// Trait تولید کد
///
/// # مفاهیم:
/// - `Send + Sync`: تا بشه پشت `Arc<dyn CodeGenerator>` بین handler‌ها share کرد
/// - generator هیچ اطلاعی از registry نداره؛ یکتا بودن رو registry چک میکنه
pub trait CodeGenerator: Send + Sync {
    /// تولید یک کد جدید
    fn generate(&self) -> String;
}

/// Generator تصادفی با پیشوند ثابت
///
/// # مثال
/// ```rust
/// use link_registry::utils::{CodeGenerator, RandomCodeGenerator};
///
/// let generator = RandomCodeGenerator::seeded("glam_", 6, 42);
/// let code = generator.generate();
/// assert!(code.starts_with("glam_"));
/// assert_eq!(code.len(), 11);
/// ```
#[derive(Debug)]
pub struct RandomCodeGenerator {
    prefix: String,
    length: usize,
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    /// ساخت generator با seed از entropy سیستم
    #[must_use]
    pub fn new(prefix: impl Into<String>, length: usize) -> Self {
        Self::with_rng(prefix, length, StdRng::from_entropy())
    }

    /// ساخت generator قطعی (برای تست)
    #[must_use]
    pub fn seeded(prefix: impl Into<String>, length: usize, seed: u64) -> Self {
        Self::with_rng(prefix, length, StdRng::seed_from_u64(seed))
    }

    fn with_rng(prefix: impl Into<String>, length: usize, rng: StdRng) -> Self {
        Self {
            prefix: prefix.into(),
            length,
            rng: Mutex::new(rng),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_PREFIX, DEFAULT_SHORT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        // قفل poison شده هم هنوز یه RNG سالم داره
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let suffix: String = (0..self.length)
            .map(|_| {
                let idx = rng.gen_range(0..SHORT_CODE_CHARS.len());
                SHORT_CODE_CHARS[idx] as char
            })
            .collect();

        format!("{}{}", self.prefix, suffix)
    }
}

/// Generator که یک لیست ثابت رو به ترتیب برمیگردونه و بعد آخری رو تکرار میکنه
///
/// برای تست سناریوی برخورد کد (collision) استفاده میشه.
#[derive(Debug)]
pub struct SequenceCodeGenerator {
    codes: Vec<String>,
    next: Mutex<usize>,
}

impl SequenceCodeGenerator {
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            next: Mutex::new(0),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let idx = (*next).min(self.codes.len().saturating_sub(1));
        *next += 1;
        self.codes.get(idx).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_code_shape() {
        let generator = RandomCodeGenerator::default();
        let code = generator.generate();

        let suffix = code.strip_prefix(DEFAULT_CODE_PREFIX).unwrap();
        assert_eq!(suffix.len(), DEFAULT_SHORT_CODE_LENGTH);
        assert!(suffix.bytes().all(|b| SHORT_CODE_CHARS.contains(&b)));
    }

    #[test]
    fn test_seeded_generators_are_deterministic() {
        let a = RandomCodeGenerator::seeded("p", 8, 7);
        let b = RandomCodeGenerator::seeded("p", 8, 7);

        for _ in 0..5 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_codes_are_mostly_unique() {
        let generator = RandomCodeGenerator::seeded("", 6, 1);
        let codes: HashSet<String> = (0..100).map(|_| generator.generate()).collect();
        assert!(codes.len() > 95);
    }

    #[test]
    fn test_sequence_generator_repeats_last() {
        let generator = SequenceCodeGenerator::new(["a", "b"]);
        assert_eq!(generator.generate(), "a");
        assert_eq!(generator.generate(), "b");
        assert_eq!(generator.generate(), "b");
    }
}
