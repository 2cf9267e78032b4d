//! Store codes and their accepted format.
//!
//! A valid store code is `<prefix><5 or 9 digits><4 letters>`, where the
//! letters never include `O` or `o`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Field name reported by format validation failures.
pub const STORE_CODE_FIELD: &str = "store_code";

/// Body accepted after the prefix: 9 or 5 digits, then 4 letters without `O`/`o`.
static BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{9}|\d{5})[A-NP-Za-np-z]{4}$").expect("store code body pattern is valid")
});

/// A generated store code, including its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreCode(String);

impl StoreCode {
    /// Wrap a code without validating it.
    ///
    /// Generated codes go through here; use [`StoreCode::parse`] for
    /// codes coming from outside.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parse and validate a code carrying `prefix`.
    ///
    /// # Errors
    ///
    /// Returns a `store_code` validation error if the format does not match.
    pub fn parse(code: impl Into<String>, prefix: &str) -> Result<Self, ValidationError> {
        let code = Self(code.into());
        code.validate(prefix)?;
        Ok(code)
    }

    /// Check this code against the accepted format for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns a `store_code` validation error if the format does not match.
    pub fn validate(&self, prefix: &str) -> Result<(), ValidationError> {
        let matches = self
            .0
            .strip_prefix(prefix)
            .is_some_and(|body| BODY.is_match(body));

        if matches {
            Ok(())
        } else {
            Err(ValidationError::new(
                STORE_CODE_FIELD,
                format!("Enter a value with this format {prefix}<5 or 9 digits><4 letter>"),
            ))
        }
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the code, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StoreCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
