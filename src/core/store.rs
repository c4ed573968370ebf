//! Record store trait: the external persistence layer the engine consumes

use crate::core::entity::Record;
use crate::core::query::RecordQuery;
use anyhow::Result;
use async_trait::async_trait;

/// Store trait for one record type
///
/// Implementations wrap the host platform's persistence. The engine never
/// holds locks across calls; a record may vanish between `find` and
/// `delete`, in which case `delete` returns an error for that id.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Find every record matching the query
    ///
    /// Ordering is not required; callers sort by id.
    async fn find(&self, query: &RecordQuery) -> Result<Vec<R>>;

    /// Permanently delete one record
    async fn delete(&self, id: u64) -> Result<()>;
}
