//! Store-code generator configuration.

use serde::{Deserialize, Serialize};

use super::charset::{Charset, DIGITS, LETTERS};
use crate::error::ConfigurationError;

/// Number of base digits spanned by a single random draw.
pub const DRAW_DIGITS: u32 = 6;

/// Configuration for store-code generation.
///
/// A code is `prefix + first section + second section`, where both sections
/// encode the same random draw with different charsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed for reproducible output. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Length of the numeric section.
    #[serde(default = "default_first_length")]
    pub first_length: usize,

    /// Length of the alphabetic section.
    #[serde(default = "default_second_length")]
    pub second_length: usize,

    /// Radix of the random draw span; draws fall in `[0, base^6)`.
    #[serde(default = "default_base")]
    pub base: u64,

    /// Symbols of the numeric section.
    #[serde(default = "default_first_charset")]
    pub first_charset: String,

    /// Symbols of the alphabetic section.
    #[serde(default = "default_second_charset")]
    pub second_charset: String,
}

const fn default_first_length() -> usize {
    9
}

const fn default_second_length() -> usize {
    4
}

const fn default_base() -> u64 {
    36
}

fn default_first_charset() -> String {
    DIGITS.to_string()
}

fn default_second_charset() -> String {
    LETTERS.to_string()
}

impl GeneratorConfig {
    /// Default configuration with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Override both section lengths.
    #[must_use]
    pub fn with_lengths(mut self, first_length: usize, second_length: usize) -> Self {
        self.first_length = first_length;
        self.second_length = second_length;
        self
    }

    /// Exclusive upper bound of a random draw.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is below 2 or `base^6` overflows.
    pub fn draw_span(&self) -> Result<u64, ConfigurationError> {
        if self.base < 2 {
            return Err(ConfigurationError::new(format!(
                "base must be at least 2, got {}",
                self.base
            )));
        }
        self.base.checked_pow(DRAW_DIGITS).ok_or_else(|| {
            ConfigurationError::new(format!("base {} is too large", self.base))
        })
    }

    /// Validate the configuration and build both charsets.
    ///
    /// # Errors
    ///
    /// Returns an error if a section length is zero, a charset is invalid,
    /// or the base is out of range.
    pub fn validate(&self) -> Result<(Charset, Charset), ConfigurationError> {
        if self.first_length < 1 || self.second_length < 1 {
            return Err(ConfigurationError::new(format!(
                "section lengths must be at least 1, got first_length={} second_length={}",
                self.first_length, self.second_length
            )));
        }
        self.draw_span()?;

        let first = Charset::new(&self.first_charset)
            .map_err(|e| ConfigurationError::new(format!("first_charset: {}", e.0)))?;
        let second = Charset::new(&self.second_charset)
            .map_err(|e| ConfigurationError::new(format!("second_charset: {}", e.0)))?;

        Ok((first, second))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            first_length: default_first_length(),
            second_length: default_second_length(),
            base: default_base(),
            first_charset: default_first_charset(),
            second_charset: default_second_charset(),
        }
    }
}
