//! # Bulk Admin
//!
//! Date-filtered CSV export and bulk deletion of content items and accounts,
//! exposed as an authenticated admin HTTP surface.
//!
//! ## Features
//!
//! - **Date Filters**: all / single date with a condition / inclusive range
//! - **CSV Export**: RFC 4180 quoting, per-batch custom-field columns, no file for empty sets
//! - **Bulk Delete**: per-record failure tolerance, protection of the acting principal
//! - **Pluggable Storage**: any backend implementing `RecordStore`
//! - **Guarded Actions**: bearer-token auth, access policies and per-action nonces
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bulk_admin::prelude::*;
//!
//! let posts = InMemoryRecordStore::<ContentItem>::new();
//! let fetcher = RecordFetcher::new(Arc::new(posts.clone()));
//!
//! let filter = DateFilter::try_build(&DateFilterParams::range(
//!     DateColumn::CreationDate,
//!     "2024-02-01",
//!     "2024-03-31",
//! ))?;
//! let records = fetcher.fetch("post", &filter).await?;
//!
//! match CsvExporter::default().export_records(&records)? {
//!     ExportOutcome::File(file) => std::fs::write("posts.csv", file.bytes)?,
//!     ExportOutcome::NoRecords => println!("nothing to export"),
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, TokenAuthProvider},
        entity::{DateColumn, EntityKind, Record},
        error::{BulkError, BulkResult, ValidationError},
        field::FieldValue,
        filter::{DateCondition, DateFilter, DateFilterParams, DateMode},
        nonce::{InMemoryNonceStore, NonceStore},
        query::{RecordQuery, StatusFilter},
        store::RecordStore,
    };

    // === Entities ===
    pub use crate::entities::{Account, AuthorRef, ContentItem, ContentStatus};

    // === Engine ===
    pub use crate::engine::{
        BulkDeleter, CsvExporter, CsvFile, CsvRecord, DeleteScope, DeleteTally, ExportOutcome,
        ProtectList, RecordFetcher, delete_batch, export_file_name,
    };

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;

    // === Config ===
    pub use crate::config::AdminConfig;

    // === Server ===
    pub use crate::server::{AdminAction, AdminServerBuilder, AdminState};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
