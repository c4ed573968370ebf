//! Core module containing fundamental traits and types

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod nonce;
pub mod query;
pub mod store;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, TokenAuthProvider};
pub use entity::{DateColumn, EntityKind, Record};
pub use error::{BulkError, BulkResult, ValidationError};
pub use field::FieldValue;
pub use filter::{DateFilter, DateFilterParams};
pub use nonce::{InMemoryNonceStore, NonceStore};
pub use query::{RecordQuery, StatusFilter};
pub use store::RecordStore;
