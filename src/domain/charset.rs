//! Digit alphabets used by the store-code sections.

use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

use crate::error::ConfigurationError;

/// Digits used by the numeric section.
pub const DIGITS: &str = "0123456789";

/// Letters used by the alphabetic section.
///
/// `O` and `o` are skipped so they are never mistaken for `0`.
pub const LETTERS: &str = "abcdefghijklmnpqrstuvwxyzABCDEFGHIJKLMNPQRSTUVWXYZ";

/// An ordered alphabet whose symbols act as the digits of a positional encoding.
///
/// The symbol at index 0 is the zero digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    symbols: Vec<char>,
}

impl Charset {
    /// Build a charset from a string of distinct symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or repeats a symbol.
    pub fn new(symbols: &str) -> Result<Self, ConfigurationError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(ConfigurationError::new("charset cannot be empty"));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(dup) = symbols.iter().find(|c| !seen.insert(**c)) {
            return Err(ConfigurationError::new(format!(
                "charset contains duplicate symbol '{dup}'"
            )));
        }

        Ok(Self { symbols })
    }

    /// Number of symbols, i.e. the natural base of this charset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; construction rejects empty charsets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol for digit `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Whether `c` belongs to this charset.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }
}

impl Index<usize> for Charset {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        &self.symbols[index]
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
