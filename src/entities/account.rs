//! User accounts

use crate::core::entity::{DateColumn, EntityKind, Record};
use crate::core::field::FieldValue;
use crate::engine::export::CsvRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl Account {
    /// Create an account with a single role
    pub fn new(
        id: u64,
        username: impl Into<String>,
        role: impl Into<String>,
        registered_at: DateTime<Utc>,
    ) -> Self {
        let username = username.into();
        Self {
            id,
            email: format!("{username}@example.invalid"),
            display_name: username.clone(),
            username,
            first_name: String::new(),
            last_name: String::new(),
            roles: vec![role.into()],
            registered_at,
            url: String::new(),
            description: String::new(),
        }
    }
}

impl Record for Account {
    fn kind() -> EntityKind {
        EntityKind::Account
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.username
    }

    fn status(&self) -> &str {
        "active"
    }

    fn timestamp(&self, column: DateColumn) -> Option<DateTime<Utc>> {
        match column {
            DateColumn::RegistrationDate => Some(self.registered_at),
            DateColumn::CreationDate => None,
        }
    }

    /// Accounts may hold several roles; any of them matches
    fn matches_subtype(&self, subtype: &str) -> bool {
        self.roles.iter().any(|role| role == subtype)
    }
}

impl CsvRecord for Account {
    fn base_header() -> &'static [&'static str] {
        &[
            "ID",
            "Username",
            "Email",
            "First Name",
            "Last Name",
            "Display Name",
            "Roles",
            "Registered Date",
            "User URL",
            "Description",
        ]
    }

    fn csv_row(&self, _extra_columns: &[String]) -> Vec<FieldValue> {
        vec![
            FieldValue::from(self.id),
            FieldValue::from(self.username.as_str()),
            FieldValue::from(self.email.as_str()),
            FieldValue::from(self.first_name.as_str()),
            FieldValue::from(self.last_name.as_str()),
            FieldValue::from(self.display_name.as_str()),
            FieldValue::from(self.roles.join(", ")),
            FieldValue::from(self.registered_at),
            FieldValue::from(self.url.as_str()),
            FieldValue::from(self.description.as_str()),
        ]
    }
}
