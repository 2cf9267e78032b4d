//! File-based record storage.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::StoreCode;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::RecordStorage;

/// Stores each record as `{records_dir}/{table}/{code}.json`.
pub struct FileRecordStorage {
    /// Base directory for record tables.
    records_dir: PathBuf,
    /// Mutex for coordinating file operations within this process.
    lock: Mutex<()>,
}

impl FileRecordStorage {
    /// Create a new file record storage.
    #[must_use]
    pub fn new(records_dir: PathBuf) -> Self {
        Self {
            records_dir,
            lock: Mutex::new(()),
        }
    }

    fn table_dir(&self, table: &str) -> PathBuf {
        self.records_dir.join(sanitize_name(table))
    }

    fn record_path(&self, table: &str, code: &StoreCode) -> PathBuf {
        self.table_dir(table)
            .join(format!("{}.json", sanitize_name(code.as_str())))
    }

    /// Create the record file; fails if it already exists.
    fn create_record(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        let path = self.record_path(table, code);
        std::fs::create_dir_all(self.table_dir(table))?;

        // `create_new` is atomic on the filesystem, which also covers other processes.
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::Conflict(format!("{table}.{code}")));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = write_locked(&file, record) {
            // never leave a half-written record claiming the code
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }
        Ok(())
    }

    fn replace_record(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        let path = self.record_path(table, code);
        if !path.exists() {
            return Err(StorageError::NotFound(format!("{table}.{code}")));
        }

        // truncated only once the exclusive lock is held
        let file = OpenOptions::new().write(true).open(&path)?;
        write_locked(&file, record)
    }

    fn load_record(&self, table: &str, code: &StoreCode) -> StorageResult<Option<Value>> {
        let path = self.record_path(table, code);
        if !path.exists() {
            return Ok(None);
        }

        read_locked(&path).map(Some)
    }

    fn list_records(&self, table: &str) -> StorageResult<Vec<Value>> {
        let dir = self.table_dir(table);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            match read_locked(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Failed to parse record file");
                }
            }
        }

        Ok(records)
    }
}

fn write_locked(file: &std::fs::File, record: &Value) -> StorageResult<()> {
    FileExt::lock_exclusive(file).map_err(|e| StorageError::LockFailed(e.to_string()))?;
    file.set_len(0)?;
    serde_json::to_writer_pretty(file, record)?;
    file.sync_all()?;
    FileExt::unlock(file).map_err(|e| StorageError::LockFailed(e.to_string()))?;
    Ok(())
}

fn read_locked(path: &Path) -> StorageResult<Value> {
    let file = std::fs::File::open(path)?;
    FileExt::lock_shared(&file).map_err(|e| StorageError::LockFailed(e.to_string()))?;
    let record = serde_json::from_reader(&file)?;
    FileExt::unlock(&file).map_err(|e| StorageError::LockFailed(e.to_string()))?;
    Ok(record)
}

#[async_trait]
impl RecordStorage for FileRecordStorage {
    async fn insert(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.create_record(table, code, record)
    }

    async fn get(&self, table: &str, code: &StoreCode) -> StorageResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        self.load_record(table, code)
    }

    async fn update(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.replace_record(table, code, record)
    }

    async fn list(&self, table: &str) -> StorageResult<Vec<Value>> {
        let _guard = self.lock.lock().await;
        self.list_records(table)
    }

    async fn exists(&self, table: &str, code: &StoreCode) -> StorageResult<bool> {
        Ok(self.record_path(table, code).exists())
    }
}

/// Replace anything but alphanumerics, `-` and `_` so names are safe file names.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
