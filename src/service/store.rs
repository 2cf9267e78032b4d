//! Store service.
//!
//! Assigns store codes to new records and persists them, retrying with a
//! fresh code whenever the storage reports a uniqueness conflict.
//!
//! Before the first attempt, referenced records must exist and the entity's
//! unique fields must not be taken in its table.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{StoreCode, StoreEntity, StoreRecord};
use crate::error::{AppError, Result, SaveFailedError, StorageError, ValidationError};
use crate::service::generator::StoreCodeGen;
use crate::storage::traits::Storage;

/// Default number of codes tried before a save is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Service creating and managing store records.
pub struct StoreService {
    /// Storage backend.
    storage: Arc<dyn Storage>,
    /// Code generator shared by every entity type.
    generator: Arc<StoreCodeGen>,
    /// Attempts used by [`StoreService::create`].
    max_attempts: u32,
    /// Serializes constraint checks with the inserts that rely on them.
    writes: Mutex<()>,
}

impl StoreService {
    /// Create a new store service.
    pub fn new(storage: Arc<dyn Storage>, generator: Arc<StoreCodeGen>) -> Self {
        Self {
            storage,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            writes: Mutex::new(()),
        }
    }

    /// Override the default retry bound.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// The code generator in use.
    #[must_use]
    pub fn generator(&self) -> &StoreCodeGen {
        &self.generator
    }

    /// Persist `entity` under a freshly generated store code.
    ///
    /// # Errors
    ///
    /// See [`StoreService::create_with_attempts`].
    pub async fn create<E: StoreEntity>(&self, entity: E) -> Result<StoreRecord<E>> {
        self.create_with_attempts(entity, self.max_attempts).await
    }

    /// Persist `entity`, trying at most `max_attempts` store codes.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if a field or the generated code is malformed,
    ///   a unique field is taken, or a referenced record does not exist
    /// - `AppError::SaveFailed` if every attempt collided with an existing code
    /// - `AppError::Storage` for any other storage failure
    pub async fn create_with_attempts<E: StoreEntity>(
        &self,
        entity: E,
        max_attempts: u32,
    ) -> Result<StoreRecord<E>> {
        entity.validate()?;

        let _guard = self.writes.lock().await;
        self.check_constraints(&entity).await?;

        for attempt in 1..=max_attempts {
            let code = self.generator.generate(E::STORE_CODE_PREFIX);
            let record = StoreRecord::new(entity.clone(), code);
            record.clean()?;

            match self
                .storage
                .insert(E::TABLE, &record.store_code, &to_value(&record)?)
                .await
            {
                Ok(()) => {
                    info!(
                        entity = E::NAME,
                        store_code = %record.store_code,
                        attempt,
                        "Record saved"
                    );
                    return Ok(record);
                }
                Err(StorageError::Conflict(e)) => {
                    metrics::counter!("storecode_collisions_total", "entity" => E::NAME)
                        .increment(1);
                    warn!(
                        entity = E::NAME,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Store code collision, trying again"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        metrics::counter!("storecode_save_failures_total", "entity" => E::NAME).increment(1);
        Err(SaveFailedError {
            entity: E::NAME,
            attempts: max_attempts,
        }
        .into())
    }

    /// Check references and unique fields against stored records.
    ///
    /// Removed records still hold their unique values.
    async fn check_constraints<E: StoreEntity>(&self, entity: &E) -> Result<()> {
        for reference in entity.references() {
            if !self.storage.exists(reference.table, &reference.code).await? {
                return Err(ValidationError::new(
                    reference.field,
                    format!(
                        "No record with store code {} exists in {}.",
                        reference.code, reference.table
                    ),
                )
                .into());
            }
        }

        let unique = entity.unique_fields();
        if unique.is_empty() {
            return Ok(());
        }

        for existing in self.storage.list(E::TABLE).await? {
            for (field, value) in &unique {
                if existing.get(*field).and_then(Value::as_str) == Some(value.as_str()) {
                    return Err(ValidationError::new(
                        *field,
                        format!("{} with this {field} already exists.", E::NAME),
                    )
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Persist a copy of `record` under a new id and store code.
    ///
    /// # Errors
    ///
    /// Same as [`StoreService::create`].
    pub async fn copy<E: StoreEntity>(&self, record: &StoreRecord<E>) -> Result<StoreRecord<E>> {
        debug!(entity = E::NAME, source = %record.store_code, "Copying record");
        self.create(record.entity.clone()).await
    }

    /// Get a live record by store code.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the stored record cannot be decoded.
    pub async fn get<E: StoreEntity>(&self, code: &StoreCode) -> Result<Option<StoreRecord<E>>> {
        Ok(self
            .get_including_removed::<E>(code)
            .await?
            .filter(|record| !record.is_removed))
    }

    /// Get a record by store code, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the stored record cannot be decoded.
    pub async fn get_including_removed<E: StoreEntity>(
        &self,
        code: &StoreCode,
    ) -> Result<Option<StoreRecord<E>>> {
        self.storage
            .get(E::TABLE, code)
            .await?
            .map(from_value)
            .transpose()
    }

    /// List records of an entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or a stored record cannot be decoded.
    pub async fn list<E: StoreEntity>(&self, include_removed: bool) -> Result<Vec<StoreRecord<E>>> {
        let mut records = Vec::new();
        for value in self.storage.list(E::TABLE).await? {
            let record: StoreRecord<E> = from_value(value)?;
            if include_removed || !record.is_removed {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Soft-delete a record.
    ///
    /// Returns `false` if no live record has this store code.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn soft_delete<E: StoreEntity>(&self, code: &StoreCode) -> Result<bool> {
        let Some(mut record) = self.get::<E>(code).await? else {
            return Ok(false);
        };

        record.mark_removed();
        self.storage
            .update(E::TABLE, code, &to_value(&record)?)
            .await?;

        info!(entity = E::NAME, store_code = %code, "Record soft-deleted");
        Ok(true)
    }
}

fn to_value<E: StoreEntity>(record: &StoreRecord<E>) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| AppError::Storage(e.into()))
}

fn from_value<E: StoreEntity>(value: Value) -> Result<StoreRecord<E>> {
    serde_json::from_value(value).map_err(|e| AppError::Storage(e.into()))
}
