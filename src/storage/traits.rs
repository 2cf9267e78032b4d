//! Storage trait definitions.
//!
//! Records are stored as JSON documents keyed by `(table, store code)`. The
//! store code is a unique key within its table.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::StoreCode;
use crate::error::StorageResult;

/// Record storage operations.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Insert a new record.
    ///
    /// Fails with `StorageError::Conflict` if `code` is already taken in `table`.
    async fn insert(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()>;

    /// Get a record by store code.
    async fn get(&self, table: &str, code: &StoreCode) -> StorageResult<Option<Value>>;

    /// Replace an existing record.
    ///
    /// Fails with `StorageError::NotFound` if the record does not exist.
    async fn update(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()>;

    /// List all records of a table, ordered by store code.
    async fn list(&self, table: &str) -> StorageResult<Vec<Value>>;

    /// Check if a store code is taken.
    async fn exists(&self, table: &str, code: &StoreCode) -> StorageResult<bool>;
}

/// Combined storage trait.
#[async_trait]
pub trait Storage: RecordStorage {
    /// Check if the storage backend is healthy and reachable.
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend name.
    fn backend_name(&self) -> &'static str;
}
