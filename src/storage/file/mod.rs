//! File-based storage backend.
//!
//! This backend stores records as JSON files with file locking.
//! Suitable for development and single-node deployments.
//!
//! Directory structure:
//! ```text
//! data/
//! └── records/
//!     ├── companies/
//!     │   └── {store_code}.json
//!     ├── users/
//!     │   └── {store_code}.json
//!     └── user_profiles/
//!         └── {store_code}.json
//! ```

mod record;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FileStorageConfig;
use crate::domain::StoreCode;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::{RecordStorage, Storage};

pub use record::FileRecordStorage;

/// File-based storage implementation.
pub struct FileStorage {
    /// Base data directory.
    base_dir: PathBuf,
    /// Record storage.
    record_storage: FileRecordStorage,
}

impl FileStorage {
    /// Create a new file storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directories cannot be created.
    pub fn new(config: &FileStorageConfig) -> StorageResult<Self> {
        let base_dir = config.data_dir.clone();

        Self::ensure_directories(&base_dir)?;

        Ok(Self {
            record_storage: FileRecordStorage::new(base_dir.join("records")),
            base_dir,
        })
    }

    fn ensure_directories(base_dir: &Path) -> StorageResult<()> {
        for dir in [base_dir.to_path_buf(), base_dir.join("records")] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                StorageError::FileIO(format!("Failed to create directory {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStorage for FileStorage {
    async fn insert(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        self.record_storage.insert(table, code, record).await
    }

    async fn get(&self, table: &str, code: &StoreCode) -> StorageResult<Option<Value>> {
        self.record_storage.get(table, code).await
    }

    async fn update(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        self.record_storage.update(table, code, record).await
    }

    async fn list(&self, table: &str) -> StorageResult<Vec<Value>> {
        self.record_storage.list(table).await
    }

    async fn exists(&self, table: &str, code: &StoreCode) -> StorageResult<bool> {
        self.record_storage.exists(table, code).await
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn health_check(&self) -> StorageResult<()> {
        if !self.base_dir.exists() {
            return Err(StorageError::Unavailable);
        }

        let test_file = self.base_dir.join(".health_check");
        tokio::fs::write(&test_file, b"ok")
            .await
            .map_err(|e| StorageError::FileIO(format!("Health check failed: {e}")))?;
        tokio::fs::remove_file(&test_file)
            .await
            .map_err(|e| StorageError::FileIO(format!("Health check cleanup failed: {e}")))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
