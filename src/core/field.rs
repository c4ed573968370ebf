//! Field value types and cell coercion

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Format used for every timestamp written to a cell
pub const CELL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A polymorphic field value that can hold different types
///
/// Structured variants (`List`, `Map`) always collapse into a single
/// JSON-encoded cell on export; they never spread across columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if the value holds nested data
    pub fn is_structured(&self) -> bool {
        matches!(self, FieldValue::List(_) | FieldValue::Map(_))
    }

    /// Coerce the value into the text of one CSV cell
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
            FieldValue::DateTime(dt) => dt.format(CELL_DATETIME_FORMAT).to_string(),
            FieldValue::List(_) | FieldValue::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
            FieldValue::Null => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::String(value.to_string()))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Remove markup from rich text, dropping `<script>`/`<style>` bodies entirely
pub fn strip_tags(html: &str) -> String {
    static BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

    let blocks = BLOCK_REGEX.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*?>.*?</script>|<style[^>]*?>.*?</style>").unwrap()
    });
    let tags = TAG_REGEX.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap());

    let without_blocks = blocks.replace_all(html, "");
    tags.replace_all(&without_blocks, "").trim().to_string()
}
