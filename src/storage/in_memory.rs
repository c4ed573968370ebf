//! In-memory implementation of RecordStore for testing and development

use crate::core::entity::Record;
use crate::core::error::StorageError;
use crate::core::query::RecordQuery;
use crate::core::store::RecordStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory record store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// records are keyed by id so iteration is already in ascending id order.
pub struct InMemoryRecordStore<R: Record> {
    records: Arc<RwLock<BTreeMap<u64, R>>>,
}

fn lock_error(mode: &str, e: impl std::fmt::Display) -> StorageError {
    StorageError::Unavailable {
        backend: "in_memory".to_string(),
        reason: format!("failed to acquire {mode} lock: {e}"),
    }
}

impl<R: Record> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Insert or replace a record
    pub fn insert(&self, record: R) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| lock_error("write", e))?;

        records.insert(record.id(), record);

        Ok(())
    }

    /// Get a record by id
    pub fn get(&self, id: u64) -> Result<Option<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| lock_error("read", e))?;

        Ok(records.get(&id).cloned())
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| lock_error("read", e))?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn find(&self, query: &RecordQuery) -> Result<Vec<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| lock_error("read", e))?;

        Ok(records
            .values()
            .filter(|record| query.matches(*record))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| lock_error("write", e))?;

        records.remove(&id).ok_or_else(|| StorageError::NotFound {
            kind: R::kind().to_string(),
            id,
        })?;

        Ok(())
    }
}
