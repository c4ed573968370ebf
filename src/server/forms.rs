//! Inbound form payloads and the typed requests they validate into

use crate::core::entity::EntityKind;
use crate::core::error::ValidationError;
use crate::core::field::strip_tags;
use crate::core::filter::{DateFilter, DateFilterParams};
use crate::engine::DeleteScope;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every action the dispatcher accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ExportPosts,
    DeletePosts,
    ExportUsers,
    DeleteUsers,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::ExportPosts => "export_posts",
            AdminAction::DeletePosts => "delete_posts",
            AdminAction::ExportUsers => "export_users",
            AdminAction::DeleteUsers => "delete_users",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "export_posts" => Some(AdminAction::ExportPosts),
            "delete_posts" => Some(AdminAction::DeletePosts),
            "export_users" => Some(AdminAction::ExportUsers),
            "delete_users" => Some(AdminAction::DeleteUsers),
            _ => None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            AdminAction::ExportPosts | AdminAction::DeletePosts => EntityKind::ContentItem,
            AdminAction::ExportUsers | AdminAction::DeleteUsers => EntityKind::Account,
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export form as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportForm {
    /// Content-type slug or role
    pub subtype: String,
    pub date_option: String,
    pub date_single: String,
    pub date_condition: String,
    pub date_start: String,
    pub date_end: String,
    pub nonce: String,
}

/// Delete form as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub subtype: String,
    /// Checkbox: present means checked, whatever its value
    pub delete_all: Option<String>,
    pub date_option: String,
    pub date_single: String,
    pub date_condition: String,
    pub date_start: String,
    pub date_end: String,
    pub nonce: String,
}

/// Validated export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub subtype: String,
    pub filter: DateFilter,
}

/// Validated delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub subtype: String,
    pub scope: DeleteScope,
}

impl ExportForm {
    pub fn into_request(self, kind: EntityKind) -> Result<ExportRequest, ValidationError> {
        let subtype = required_subtype(&self.subtype)?;
        let filter = DateFilter::try_build(&date_params(
            kind,
            &self.date_option,
            &self.date_single,
            &self.date_condition,
            &self.date_start,
            &self.date_end,
        ))?;
        Ok(ExportRequest { subtype, filter })
    }
}

impl DeleteForm {
    /// Delete-all skips filter validation entirely: it ignores the filter
    pub fn into_request(self, kind: EntityKind) -> Result<DeleteRequest, ValidationError> {
        let subtype = required_subtype(&self.subtype)?;
        if self.delete_all.is_some() {
            return Ok(DeleteRequest {
                subtype,
                scope: DeleteScope::All,
            });
        }

        let filter = DateFilter::try_build(&date_params(
            kind,
            &self.date_option,
            &self.date_single,
            &self.date_condition,
            &self.date_start,
            &self.date_end,
        ))?;
        Ok(DeleteRequest {
            subtype,
            scope: DeleteScope::from_request(false, filter),
        })
    }
}

fn required_subtype(raw: &str) -> Result<String, ValidationError> {
    let subtype = sanitize_text(raw);
    if subtype.is_empty() {
        return Err(ValidationError::MissingArgument {
            argument: "subtype".to_string(),
        });
    }
    Ok(subtype)
}

fn date_params(
    kind: EntityKind,
    option: &str,
    single: &str,
    condition: &str,
    start: &str,
    end: &str,
) -> DateFilterParams {
    DateFilterParams {
        mode: sanitize_text(option),
        single: sanitize_text(single),
        condition: sanitize_text(condition),
        start: sanitize_text(start),
        end: sanitize_text(end),
        column: kind.date_column(),
    }
}

/// Reduce free-form input to a single clean line: no markup, no control
/// characters, whitespace collapsed and trimmed
pub fn sanitize_text(raw: &str) -> String {
    strip_tags(raw)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
