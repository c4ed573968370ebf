//! Entity kinds and the record abstraction shared by every store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two record categories the admin surface operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Posts, pages and custom content types, subtyped by content-type slug
    ContentItem,
    /// User accounts, subtyped by role
    Account,
}

impl EntityKind {
    /// Plural label used in file names and status messages ("posts", "users")
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::ContentItem => "posts",
            EntityKind::Account => "users",
        }
    }

    /// Singular label ("post", "user")
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::ContentItem => "post",
            EntityKind::Account => "user",
        }
    }

    /// Timestamp column date filters apply to for this kind
    pub fn date_column(&self) -> DateColumn {
        match self {
            EntityKind::ContentItem => DateColumn::CreationDate,
            EntityKind::Account => DateColumn::RegistrationDate,
        }
    }

    /// What the subtype means for this kind, as shown to users
    pub fn subtype_label(&self) -> &'static str {
        match self {
            EntityKind::ContentItem => "type",
            EntityKind::Account => "role",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::ContentItem => f.write_str("content_item"),
            EntityKind::Account => f.write_str("account"),
        }
    }
}

/// Timestamp column a date filter is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateColumn {
    CreationDate,
    RegistrationDate,
}

/// A record handle projected out of the record store.
///
/// Carries just enough to filter, order, export and delete a record:
/// - id: stable, ascending identifier (insertion order)
/// - label: title or username
/// - status: lifecycle status
/// - timestamp: value of a filterable date column
pub trait Record: Clone + Send + Sync + 'static {
    /// The kind every instance of this type belongs to
    fn kind() -> EntityKind;

    /// Get the record identifier
    fn id(&self) -> u64;

    /// Human-readable label (title or username)
    fn label(&self) -> &str;

    /// Lifecycle status (e.g. "publish", "trash")
    fn status(&self) -> &str;

    /// Value of the given date column, if the record carries it
    fn timestamp(&self, column: DateColumn) -> Option<DateTime<Utc>>;

    /// Whether the record belongs to the given subtype (content type or role)
    fn matches_subtype(&self, subtype: &str) -> bool;
}
