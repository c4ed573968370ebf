//! Content items: posts, pages and custom content types

use crate::core::entity::{DateColumn, EntityKind, Record};
use crate::core::field::{FieldValue, strip_tags};
use crate::engine::export::CsvRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lifecycle status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentStatus {
    Publish,
    Pending,
    Draft,
    AutoDraft,
    Future,
    Private,
    Inherit,
    Trash,
}

impl ContentStatus {
    /// Every status, in the order the admin screens list them
    pub const ALL: [ContentStatus; 8] = [
        ContentStatus::Publish,
        ContentStatus::Pending,
        ContentStatus::Draft,
        ContentStatus::AutoDraft,
        ContentStatus::Future,
        ContentStatus::Private,
        ContentStatus::Inherit,
        ContentStatus::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Publish => "publish",
            ContentStatus::Pending => "pending",
            ContentStatus::Draft => "draft",
            ContentStatus::AutoDraft => "auto-draft",
            ContentStatus::Future => "future",
            ContentStatus::Private => "private",
            ContentStatus::Inherit => "inherit",
            ContentStatus::Trash => "trash",
        }
    }
}

/// Owning author as projected by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: u64,
    pub display_name: String,
}

/// A content item projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    /// Content-type slug ("post", "page", ...)
    pub content_type: String,
    pub title: String,
    /// Raw body, may contain markup
    pub content: String,
    pub excerpt: String,
    pub status: ContentStatus,
    pub published_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub permalink: String,
    pub featured_image_url: Option<String>,
    /// Custom fields; keys starting with `_` are internal
    #[serde(default)]
    pub meta: BTreeMap<String, FieldValue>,
}

impl ContentItem {
    /// Create a minimal item; remaining fields default to empty
    pub fn new(
        id: u64,
        content_type: impl Into<String>,
        title: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            title: title.into(),
            content: String::new(),
            excerpt: String::new(),
            status: ContentStatus::Publish,
            published_at,
            modified_at: published_at,
            author: None,
            categories: Vec::new(),
            tags: Vec::new(),
            permalink: String::new(),
            featured_image_url: None,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_author(mut self, id: u64, display_name: impl Into<String>) -> Self {
        self.author = Some(AuthorRef {
            id,
            display_name: display_name.into(),
        });
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

impl Record for ContentItem {
    fn kind() -> EntityKind {
        EntityKind::ContentItem
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn timestamp(&self, column: DateColumn) -> Option<DateTime<Utc>> {
        match column {
            DateColumn::CreationDate => Some(self.published_at),
            DateColumn::RegistrationDate => None,
        }
    }

    fn matches_subtype(&self, subtype: &str) -> bool {
        self.content_type == subtype
    }
}

const CONTENT_HEADER: &[&str] = &[
    "ID",
    "Title",
    "Content",
    "Excerpt",
    "Status",
    "Date Published",
    "Last Modified",
    "Author ID",
    "Author Name",
    "Categories",
    "Tags",
    "Permalink",
    "Featured Image URL",
];

impl CsvRecord for ContentItem {
    fn base_header() -> &'static [&'static str] {
        CONTENT_HEADER
    }

    /// Union of public meta keys across the batch, sorted alphabetically
    fn extra_columns(records: &[Self]) -> Vec<String> {
        records
            .iter()
            .flat_map(|item| item.meta.iter())
            .filter(|(key, value)| {
                !key.starts_with('_') && !value.is_null() && !CONTENT_HEADER.contains(&key.as_str())
            })
            .map(|(key, _)| key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn csv_row(&self, extra_columns: &[String]) -> Vec<FieldValue> {
        let mut row = vec![
            FieldValue::from(self.id),
            FieldValue::from(self.title.as_str()),
            FieldValue::from(strip_tags(&self.content)),
            FieldValue::from(strip_tags(&self.excerpt)),
            FieldValue::from(self.status.as_str()),
            FieldValue::from(self.published_at),
            FieldValue::from(self.modified_at),
            FieldValue::from(self.author.as_ref().map(|a| a.id)),
            FieldValue::from(self.author.as_ref().map(|a| a.display_name.clone())),
            FieldValue::from(self.categories.join(", ")),
            FieldValue::from(self.tags.join(", ")),
            FieldValue::from(self.permalink.as_str()),
            FieldValue::from(self.featured_image_url.clone()),
        ];
        row.extend(
            extra_columns
                .iter()
                .map(|key| self.meta.get(key).cloned().unwrap_or(FieldValue::Null)),
        );
        row
    }
}
