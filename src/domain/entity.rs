//! Store entities and the persisted record envelope.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::store_code::StoreCode;
use crate::error::ValidationError;

/// An entity type that owns a store code.
pub trait StoreEntity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Prefix prepended to every generated code of this entity.
    const STORE_CODE_PREFIX: &'static str;

    /// Storage table holding records of this entity.
    const TABLE: &'static str;

    /// Human-readable entity name.
    const NAME: &'static str;

    /// Validate entity fields before persistence.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Field values that must be unique within [`StoreEntity::TABLE`].
    ///
    /// Returned as `(field, value)`; the field name is the serialized one.
    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Records this entity points at, which must exist before it is saved.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A field holding the store code of a record in another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Field holding the code.
    pub field: &'static str,
    /// Table the code must exist in.
    pub table: &'static str,
    /// Referenced store code.
    pub code: StoreCode,
}

/// A persisted entity with its store code, timestamps and soft-delete flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "E: StoreEntity")]
pub struct StoreRecord<E: StoreEntity> {
    /// Record identifier.
    pub id: Uuid,

    /// Unique store code.
    pub store_code: StoreCode,

    /// Creation time.
    pub created: DateTime<Utc>,

    /// Last modification time.
    pub modified: DateTime<Utc>,

    /// Soft-delete flag.
    #[serde(default)]
    pub is_removed: bool,

    /// Entity fields.
    #[serde(flatten)]
    pub entity: E,
}

impl<E: StoreEntity> StoreRecord<E> {
    /// Create a fresh, live record.
    pub fn new(entity: E, store_code: StoreCode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            store_code,
            created: now,
            modified: now,
            is_removed: false,
            entity,
        }
    }

    /// Validate the store code format and the entity fields.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn clean(&self) -> Result<(), ValidationError> {
        self.store_code.validate(E::STORE_CODE_PREFIX)?;
        self.entity.validate()
    }

    /// Mark the record as removed.
    pub fn mark_removed(&mut self) {
        self.is_removed = true;
        self.modified = Utc::now();
    }
}

/// Check that a required text field is non-empty and within `max` characters.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "This field cannot be blank."));
    }
    limit_text(field, value, max)
}

/// Check that a text field is at most `max` characters.
pub(crate) fn limit_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Company;

    #[test]
    fn test_new_record_is_live() {
        let record = StoreRecord::new(
            Company::new("Acme"),
            StoreCode::new_unchecked("COMP123456789abcd"),
        );
        assert!(!record.is_removed);
        assert_eq!(record.created, record.modified);
        assert!(record.clean().is_ok());
    }

    #[test]
    fn test_clean_checks_code_then_fields() {
        let record = StoreRecord::new(Company::new("Acme"), StoreCode::new_unchecked("COMPbad"));
        assert_eq!(record.clean().unwrap_err().field, "store_code");

        let record = StoreRecord::new(
            Company::new(""),
            StoreCode::new_unchecked("COMP12345abcd"),
        );
        assert_eq!(record.clean().unwrap_err().field, "name");
    }

    #[test]
    fn test_mark_removed() {
        let mut record = StoreRecord::new(
            Company::new("Acme"),
            StoreCode::new_unchecked("COMP12345abcd"),
        );
        record.mark_removed();
        assert!(record.is_removed);
        assert!(record.modified >= record.created);
    }

    #[test]
    fn test_record_json_is_flat() {
        let record = StoreRecord::new(
            Company::new("Acme"),
            StoreCode::new_unchecked("COMP12345abcd"),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["store_code"], "COMP12345abcd");
        assert_eq!(value["name"], "Acme");

        let back: StoreRecord<Company> = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_text_limits() {
        assert!(require_text("name", "  ", 10).is_err());
        assert!(require_text("name", "abc", 3).is_ok());
        assert!(limit_text("city", "abcd", 3).is_err());
        assert!(limit_text("city", "", 3).is_ok());
    }
}
