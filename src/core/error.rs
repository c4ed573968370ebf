//! Typed error handling for bulk-admin
//!
//! Errors are grouped by category so the HTTP boundary can map each one to a
//! status code and a stable error code, while the engine can still match on
//! the specific failure.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed request input (date filters, forms)
//! - [`StorageError`]: failures reported by a record store
//! - [`ExportError`]: CSV production failures
//! - [`RequestError`]: authorization and CSRF failures at the boundary
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match DateFilter::try_build(&params) {
//!     Ok(filter) => run(filter).await,
//!     Err(ValidationError::InvertedRange { start, end }) => {
//!         println!("{start} is after {end}");
//!     }
//!     Err(e) => eprintln!("invalid filter: {e}"),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for bulk-admin
#[derive(Debug, Error)]
pub enum BulkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BulkError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BulkError::Validation(_) => StatusCode::BAD_REQUEST,
            BulkError::Storage(e) => e.status_code(),
            BulkError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BulkError::Request(e) => e.status_code(),
            BulkError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BulkError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BulkError::Validation(_) => "VALIDATION_ERROR",
            BulkError::Storage(e) => e.error_code(),
            BulkError::Export(_) => "EXPORT_ERROR",
            BulkError::Request(e) => e.error_code(),
            BulkError::Config(_) => "CONFIG_ERROR",
            BulkError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BulkError::Validation(ValidationError::InvalidDate { field, value }) => {
                Some(serde_json::json!({ "field": field, "value": value }))
            }
            BulkError::Storage(StorageError::NotFound { kind, id }) => {
                Some(serde_json::json!({ "kind": kind, "id": id }))
            }
            BulkError::Export(ExportError::RowWidth {
                expected, actual, ..
            }) => Some(serde_json::json!({ "expected": expected, "actual": actual })),
            _ => None,
        }
    }
}

impl IntoResponse for BulkError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request input validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required argument was left empty
    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    /// An enumerated option had an unrecognized value
    #[error("Unknown value '{value}' for {field}")]
    UnknownOption { field: String, value: String },

    /// A date did not parse as YYYY-MM-DD
    #[error("Invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    /// The range start lies after the range end
    #[error("Date range start {start} is after end {end}")]
    InvertedRange { start: String, end: String },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by record stores
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: String, id: u64 },

    #[error("Storage backend '{backend}' is unavailable: {reason}")]
    Unavailable { backend: String, reason: String },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "RECORD_NOT_FOUND",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors raised while producing a CSV file
#[derive(Debug, Error)]
pub enum ExportError {
    /// A row did not have one value per header column
    #[error("Row for record {record_id} has {actual} values, header has {expected}")]
    RowWidth {
        record_id: u64,
        expected: usize,
        actual: usize,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV sink failed: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised at the HTTP boundary before the engine runs
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// The submitted nonce was missing, unknown, expired or bound elsewhere
    #[error("Security check failed.")]
    InvalidNonce { action: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::InvalidNonce { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::InvalidNonce { .. } => "INVALID_NONCE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {message}")]
    IoError { message: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            message: err.to_string(),
        }
    }
}

/// Store traits return `anyhow::Error`; keep typed storage errors when present
impl From<anyhow::Error> for BulkError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => BulkError::Storage(storage),
            Err(other) => BulkError::Internal(other.to_string()),
        }
    }
}

/// A specialized Result type for bulk-admin operations
pub type BulkResult<T> = Result<T, BulkError>;
