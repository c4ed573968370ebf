//! Bulk deletion with a protect-list and per-record fault tolerance

use crate::core::entity::Record;
use crate::core::filter::DateFilter;
use crate::core::store::RecordStore;
use crate::engine::fetcher::RecordFetcher;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a delete batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteTally {
    /// Non-protected records handed to the delete operation
    pub attempted: usize,
    pub succeeded: usize,
}

impl DeleteTally {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Record ids exempt from deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectList {
    ids: BTreeSet<u64>,
}

impl ProtectList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect-list holding the acting principal, if known
    pub fn for_principal(principal_id: Option<u64>) -> Self {
        principal_id.into_iter().collect()
    }

    pub fn with(mut self, id: u64) -> Self {
        self.ids.insert(id);
        self
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }
}

impl FromIterator<u64> for ProtectList {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Which records a delete request targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteScope {
    /// Every record of the subtype; any submitted filter is ignored
    All,
    /// Records matching the filter; an empty filter deletes nothing
    Filtered(DateFilter),
}

impl DeleteScope {
    /// Only an explicit delete-all flag widens the scope to everything
    pub fn from_request(delete_all: bool, filter: DateFilter) -> Self {
        if delete_all {
            DeleteScope::All
        } else {
            DeleteScope::Filtered(filter)
        }
    }
}

/// Run `delete_fn` over `ids` in order, skipping protected ids.
///
/// Failures are logged and counted as attempted-but-not-succeeded; the batch
/// never stops early.
pub async fn delete_batch<I, F, Fut>(ids: I, protect: &ProtectList, mut delete_fn: F) -> DeleteTally
where
    I: IntoIterator<Item = u64>,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut tally = DeleteTally::default();

    for id in ids {
        if protect.contains(id) {
            tracing::debug!(id, "skipping protected record");
            continue;
        }

        tally.attempted += 1;
        match delete_fn(id).await {
            Ok(()) => tally.succeeded += 1,
            Err(e) => tracing::warn!(id, error = %e, "failed to delete record"),
        }
    }

    tally
}

/// Applies delete policies on top of a record store
pub struct BulkDeleter<R: Record> {
    fetcher: RecordFetcher<R>,
    store: Arc<dyn RecordStore<R>>,
}

impl<R: Record> Clone for BulkDeleter<R> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            store: self.store.clone(),
        }
    }
}

impl<R: Record> BulkDeleter<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self {
            fetcher: RecordFetcher::new(store.clone()),
            store,
        }
    }

    /// Delete the records of `subtype` selected by `scope`
    ///
    /// Only fetch failures are returned as errors; individual delete
    /// failures show up in the tally.
    pub async fn run(
        &self,
        subtype: &str,
        scope: &DeleteScope,
        protect: &ProtectList,
    ) -> Result<DeleteTally> {
        let filter = match scope {
            DeleteScope::All => DateFilter::empty(R::kind().date_column()),
            DeleteScope::Filtered(filter) if filter.is_empty() => {
                tracing::info!(
                    kind = %R::kind(),
                    subtype,
                    "no date filter and delete-all not set; nothing deleted"
                );
                return Ok(DeleteTally::default());
            }
            DeleteScope::Filtered(filter) => filter.clone(),
        };

        let records = self.fetcher.fetch(subtype, &filter).await?;
        let mut ids = Vec::with_capacity(records.len());
        for record in &records {
            tracing::debug!(kind = %R::kind(), id = record.id(), label = record.label(), "selected for deletion");
            ids.push(record.id());
        }

        let store = &self.store;
        let tally = delete_batch(ids, protect, move |id| store.delete(id)).await;

        tracing::info!(
            kind = %R::kind(),
            subtype,
            attempted = tally.attempted,
            succeeded = tally.succeeded,
            "bulk delete finished"
        );
        Ok(tally)
    }
}
