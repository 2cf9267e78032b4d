//! Store-code generator.
//!
//! Draws one random number per code and encodes it twice: once with the
//! numeric charset and once with the alphabetic charset.
//!
//! ```text
//!   prefix   first section    second section
//!   COMP     012345678        aBcD
//!            └── same draw, two bases ──┘
//! ```

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::domain::{Charset, GeneratorConfig, StoreCode};
use crate::error::ConfigurationError;

/// Odd multiplier applied to the raw entropy before reduction.
pub const PRIME: u64 = 1_679_979_167;

/// Generates store codes from a per-instance random source.
///
/// The random source sits behind a mutex, so one generator can be shared
/// between threads and never hands out the same draw twice.
pub struct StoreCodeGen {
    first_charset: Charset,
    second_charset: Charset,
    first_length: usize,
    second_length: usize,
    /// Exclusive upper bound of a draw.
    span: u64,
    rng: Mutex<StdRng>,
}

impl StoreCodeGen {
    /// Create a generator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a section length is zero, a charset is empty or
    /// has duplicates, or the base is out of range.
    pub fn new(config: &GeneratorConfig) -> Result<Self, ConfigurationError> {
        let (first_charset, second_charset) = config.validate()?;
        let span = config.draw_span()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        debug!(
            seeded = config.seed.is_some(),
            first_length = config.first_length,
            second_length = config.second_length,
            first_base = first_charset.len(),
            second_base = second_charset.len(),
            span,
            "Store code generator initialized"
        );

        Ok(Self {
            first_charset,
            second_charset,
            first_length: config.first_length,
            second_length: config.second_length,
            span,
            rng: Mutex::new(rng),
        })
    }

    /// Length of every generated code, excluding the prefix.
    #[must_use]
    pub const fn code_length(&self) -> usize {
        self.first_length + self.second_length
    }

    /// Draw `floor((entropy * PRIME) mod span)` with entropy uniform in `[0, 1)`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn random_number(&self) -> u64 {
        let entropy: f64 = self.rng.lock().random();
        ((entropy * PRIME as f64) % self.span as f64).floor() as u64
    }

    /// Generate a code: `prefix + first section + second section`.
    #[must_use]
    pub fn generate(&self, prefix: &str) -> StoreCode {
        let num = self.random_number();

        let mut code = String::with_capacity(prefix.len() + self.code_length());
        code.push_str(prefix);
        code.push_str(&encode_section(
            num,
            self.first_charset.len() as u64,
            &self.first_charset,
            self.first_length,
        ));
        code.push_str(&encode_section(
            num,
            self.second_charset.len() as u64,
            &self.second_charset,
            self.second_length,
        ));

        trace!(prefix, code = %code, "Generated store code");
        metrics::counter!("storecode_generated_total").increment(1);

        StoreCode::new_unchecked(code)
    }
}

impl std::fmt::Debug for StoreCodeGen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCodeGen")
            .field("first_charset", &self.first_charset.to_string())
            .field("second_charset", &self.second_charset.to_string())
            .field("first_length", &self.first_length)
            .field("second_length", &self.second_length)
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}

/// Encode `value` in base `base` with `charset` as digits, most significant first.
///
/// Always produces exactly `length` symbols: short values are left-padded with
/// `charset[0]`, and values of `base^length` or more keep only their
/// `length` low-order digits.
///
/// `base` is clamped to `1..=charset.len()`, so every input encodes.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn encode_section(mut value: u64, base: u64, charset: &Charset, length: usize) -> String {
    let base = base.clamp(1, charset.len() as u64);
    let mut digits = Vec::with_capacity(length);
    for _ in 0..length {
        let remainder = value % base;
        value /= base;
        digits.push(charset[remainder as usize]);
    }
    digits.iter().rev().collect()
}
