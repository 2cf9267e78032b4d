//! In-memory storage backend.
//!
//! Suitable for tests and one-shot runs; nothing survives the process.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use crate::domain::StoreCode;
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::{RecordStorage, Storage};

type Key = (String, StoreCode);

/// In-memory storage backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: DashMap<Key, Value>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(table: &str, code: &StoreCode) -> Key {
        (table.to_string(), code.clone())
    }
}

#[async_trait]
impl RecordStorage for MemoryStorage {
    async fn insert(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        // The entry API holds the shard lock, so check-and-insert is atomic.
        match self.records.entry(Self::key(table, code)) {
            Entry::Occupied(_) => Err(StorageError::Conflict(format!("{table}.{code}"))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, table: &str, code: &StoreCode) -> StorageResult<Option<Value>> {
        Ok(self
            .records
            .get(&Self::key(table, code))
            .map(|entry| entry.value().clone()))
    }

    async fn update(&self, table: &str, code: &StoreCode, record: &Value) -> StorageResult<()> {
        match self.records.get_mut(&Self::key(table, code)) {
            Some(mut entry) => {
                *entry = record.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("{table}.{code}"))),
        }
    }

    async fn list(&self, table: &str) -> StorageResult<Vec<Value>> {
        let mut rows: Vec<(StoreCode, Value)> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == table)
            .map(|entry| (entry.key().1.clone(), entry.value().clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows.into_iter().map(|(_, value)| value).collect())
    }

    async fn exists(&self, table: &str, code: &StoreCode) -> StorageResult<bool> {
        Ok(self.records.contains_key(&Self::key(table, code)))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code(s: &str) -> StoreCode {
        StoreCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let storage = MemoryStorage::new();
        storage
            .insert("companies", &code("COMP1"), &json!({"n": 1}))
            .await
            .unwrap();

        let err = storage
            .insert("companies", &code("COMP1"), &json!({"n": 2}))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        // the original record is kept
        let stored = storage.get("companies", &code("COMP1")).await.unwrap();
        assert_eq!(stored, Some(json!({"n": 1})));
    }

    #[tokio::test]
    async fn test_tables_are_separate() {
        let storage = MemoryStorage::new();
        storage.insert("a", &code("X"), &json!(1)).await.unwrap();
        storage.insert("b", &code("X"), &json!(2)).await.unwrap();

        assert!(storage.exists("a", &code("X")).await.unwrap());
        assert!(!storage.exists("c", &code("X")).await.unwrap());
        assert_eq!(storage.list("b").await.unwrap(), vec![json!(2)]);
    }

    #[tokio::test]
    async fn test_update_and_list_order() {
        let storage = MemoryStorage::new();
        for c in ["C", "A", "B"] {
            storage.insert("t", &code(c), &json!(c)).await.unwrap();
        }
        storage.update("t", &code("A"), &json!("a")).await.unwrap();

        assert_eq!(
            storage.list("t").await.unwrap(),
            vec![json!("a"), json!("B"), json!("C")]
        );

        let err = storage.update("t", &code("Z"), &json!(0)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let storage = MemoryStorage::new();
        assert!(storage.health_check().await.is_ok());
        assert_eq!(storage.backend_name(), "memory");
    }
}
