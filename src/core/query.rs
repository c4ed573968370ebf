//! Fetch queries handed to record stores

use crate::core::entity::{EntityKind, Record};
use crate::core::filter::DateFilter;
use serde::Serialize;

/// Which lifecycle statuses a query selects
///
/// Defaults to every status, trashed records included: bulk operations act
/// on everything matching the filter, not only what is publicly visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(Vec<String>),
}

impl StatusFilter {
    pub fn allows(&self, status: &str) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Only(statuses) => statuses.iter().any(|s| s == status),
        }
    }
}

/// A fully resolved fetch query
///
/// # Example
/// ```rust,ignore
/// let query = RecordQuery::new(EntityKind::ContentItem, "post", filter);
/// let records = store.find(&query).await?;
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct RecordQuery {
    pub kind: EntityKind,
    /// Content-type slug or role name; matched by equality
    pub subtype: String,
    pub filter: DateFilter,
    pub statuses: StatusFilter,
}

impl RecordQuery {
    pub fn new(kind: EntityKind, subtype: impl Into<String>, filter: DateFilter) -> Self {
        Self {
            kind,
            subtype: subtype.into(),
            filter,
            statuses: StatusFilter::Any,
        }
    }

    /// Narrow the query to explicit statuses
    pub fn with_statuses(mut self, statuses: StatusFilter) -> Self {
        self.statuses = statuses;
        self
    }

    /// Evaluate every predicate of the query against one record
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        R::kind() == self.kind
            && record.matches_subtype(&self.subtype)
            && self.statuses.allows(record.status())
            && self.filter.matches(record.timestamp(self.filter.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::DateColumn;

    #[test]
    fn test_status_filter_any_allows_trash() {
        assert!(StatusFilter::Any.allows("trash"));
        assert!(StatusFilter::Any.allows("auto-draft"));
    }

    #[test]
    fn test_status_filter_only() {
        let filter = StatusFilter::Only(vec!["publish".to_string()]);
        assert!(filter.allows("publish"));
        assert!(!filter.allows("draft"));
    }

    #[test]
    fn test_query_defaults_to_any_status() {
        let query = RecordQuery::new(
            EntityKind::ContentItem,
            "post",
            DateFilter::empty(DateColumn::CreationDate),
        );
        assert_eq!(query.statuses, StatusFilter::Any);
        assert_eq!(query.subtype, "post");
    }
}
