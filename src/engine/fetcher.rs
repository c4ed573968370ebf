//! Record fetching over an injected store

use crate::core::entity::Record;
use crate::core::filter::DateFilter;
use crate::core::query::{RecordQuery, StatusFilter};
use crate::core::store::RecordStore;
use anyhow::Result;
use std::sync::Arc;

/// Turns (subtype, filter) into a store query and returns records by ascending id
pub struct RecordFetcher<R: Record> {
    store: Arc<dyn RecordStore<R>>,
}

impl<R: Record> Clone for RecordFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Record> RecordFetcher<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self { store }
    }

    /// Fetch every record of the subtype matching the filter, in any status
    pub async fn fetch(&self, subtype: &str, filter: &DateFilter) -> Result<Vec<R>> {
        self.fetch_with_status(subtype, filter, StatusFilter::Any)
            .await
    }

    /// Fetch with an explicit status narrowing
    pub async fn fetch_with_status(
        &self,
        subtype: &str,
        filter: &DateFilter,
        statuses: StatusFilter,
    ) -> Result<Vec<R>> {
        let query = RecordQuery::new(R::kind(), subtype, filter.clone()).with_statuses(statuses);
        let mut records = self.store.find(&query).await?;

        // Stores may return any order; exports and deletes must be deterministic
        records.sort_by_key(|r| r.id());

        tracing::debug!(
            kind = %R::kind(),
            subtype,
            matched = records.len(),
            "fetched records"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::DateColumn;
    use crate::core::filter::DateFilterParams;
    use crate::entities::{Account, ContentItem, ContentStatus};
    use crate::storage::InMemoryRecordStore;
    use chrono::{TimeZone, Utc};

    fn post(id: u64, ty: &str, month: u32) -> ContentItem {
        ContentItem::new(id, ty, format!("p{id}"), Utc.with_ymd_and_hms(2024, month, 10, 9, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_fetch_orders_by_ascending_id() {
        let store = InMemoryRecordStore::new();
        for id in [9, 2, 5] {
            store.insert(post(id, "post", 1)).unwrap();
        }
        let fetcher = RecordFetcher::new(Arc::new(store));

        let records = fetcher
            .fetch("post", &DateFilter::empty(DateColumn::CreationDate))
            .await
            .unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn test_fetch_includes_every_status() {
        let store = InMemoryRecordStore::new();
        for (id, status) in ContentStatus::ALL.iter().enumerate() {
            store.insert(post(id as u64 + 1, "post", 1).with_status(*status)).unwrap();
        }
        let fetcher = RecordFetcher::new(Arc::new(store));

        let all = fetcher
            .fetch("post", &DateFilter::empty(DateColumn::CreationDate))
            .await
            .unwrap();
        assert_eq!(all.len(), ContentStatus::ALL.len());

        let published = fetcher
            .fetch_with_status(
                "post",
                &DateFilter::empty(DateColumn::CreationDate),
                StatusFilter::Only(vec!["publish".to_string()]),
            )
            .await
            .unwrap();
        assert_eq!(published.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_applies_subtype_and_filter() {
        let store = InMemoryRecordStore::new();
        store.insert(post(1, "post", 1)).unwrap();
        store.insert(post(2, "post", 3)).unwrap();
        store.insert(post(3, "page", 3)).unwrap();
        let fetcher = RecordFetcher::new(Arc::new(store));

        let filter = DateFilter::build(&DateFilterParams::single(
            DateColumn::CreationDate,
            "2024-02-01",
            "after",
        ));
        let records = fetcher.fetch("post", &filter).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
    }

    #[tokio::test]
    async fn test_fetch_accounts_by_role() {
        let store = InMemoryRecordStore::new();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert(Account::new(1, "admin", "administrator", at)).unwrap();
        store.insert(Account::new(2, "sub", "subscriber", at)).unwrap();
        let fetcher = RecordFetcher::new(Arc::new(store));

        let records = fetcher
            .fetch("subscriber", &DateFilter::empty(DateColumn::RegistrationDate))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "sub");
    }
}
