//! HTTP boundary for the bulk export/delete engine
//!
//! This module provides an `AdminServerBuilder` that wires record stores,
//! authentication and nonces into an axum router exposing:
//! - CSV export and bulk delete actions for content items and accounts
//! - Nonce issuance for those actions
//! - Health check routes

pub mod builder;
pub mod forms;
pub mod handlers;
pub mod router;

pub use builder::AdminServerBuilder;
pub use forms::{AdminAction, DeleteForm, DeleteRequest, ExportForm, ExportRequest, sanitize_text};
pub use handlers::{AdminState, RecordServices};
