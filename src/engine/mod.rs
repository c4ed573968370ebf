//! The filter-and-batch-operate engine
//!
//! Fetch records through a [`RecordFetcher`], then either stream them into a
//! [`CsvExporter`] or hand them to a [`BulkDeleter`].

pub mod delete;
pub mod export;
pub mod fetcher;

pub use delete::{BulkDeleter, DeleteScope, DeleteTally, ProtectList, delete_batch};
pub use export::{CsvExporter, CsvFile, CsvRecord, ExportOutcome, export_file_name};
pub use fetcher::RecordFetcher;
