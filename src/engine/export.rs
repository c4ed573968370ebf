//! CSV export of fetched records
//!
//! The exporter writes one header row followed by exactly one row per
//! record. Quoting follows RFC 4180: a field containing the delimiter, a
//! quote or a line break is quoted, with inner quotes doubled. An empty
//! record set never produces a file.

use crate::core::entity::{EntityKind, Record};
use crate::core::error::ExportError;
use crate::core::field::FieldValue;
use chrono::NaiveDate;
use regex::Regex;
use std::io::Write;
use std::sync::OnceLock;

/// Media type of every export
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Column layout of an exportable record type
pub trait CsvRecord: Record {
    /// Fixed leading columns
    fn base_header() -> &'static [&'static str];

    /// Columns derived from the batch being exported (e.g. custom fields)
    fn extra_columns(_records: &[Self]) -> Vec<String> {
        Vec::new()
    }

    /// Values for one row: the base columns, then one per extra column
    fn csv_row(&self, extra_columns: &[String]) -> Vec<FieldValue>;
}

/// A finished CSV document
#[derive(Debug, Clone)]
pub struct CsvFile {
    pub bytes: Vec<u8>,
    /// Data rows written, header excluded
    pub rows: usize,
}

/// Result of an export attempt
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// Nothing matched; no file must be sent
    NoRecords,
    File(CsvFile),
}

/// Writes records as delimited text
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Export records with an explicit header and row extractor
    pub fn export<R, F>(
        &self,
        records: &[R],
        header: &[String],
        extractor: F,
    ) -> Result<ExportOutcome, ExportError>
    where
        R: Record,
        F: Fn(&R) -> Vec<FieldValue>,
    {
        if records.is_empty() {
            return Ok(ExportOutcome::NoRecords);
        }

        let mut bytes = Vec::new();
        let rows = self.write_csv(&mut bytes, records, header, extractor)?;
        Ok(ExportOutcome::File(CsvFile { bytes, rows }))
    }

    /// Export records using their own column layout
    pub fn export_records<R: CsvRecord>(&self, records: &[R]) -> Result<ExportOutcome, ExportError> {
        let extra = R::extra_columns(records);
        let header: Vec<String> = R::base_header()
            .iter()
            .map(|h| h.to_string())
            .chain(extra.iter().cloned())
            .collect();

        self.export(records, &header, |record| record.csv_row(&extra))
    }

    /// Stream header and rows into any sink; returns the number of data rows
    pub fn write_csv<W, R, F>(
        &self,
        sink: W,
        records: &[R],
        header: &[String],
        extractor: F,
    ) -> Result<usize, ExportError>
    where
        W: Write,
        R: Record,
        F: Fn(&R) -> Vec<FieldValue>,
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(sink);

        writer.write_record(header)?;

        for record in records {
            let row = extractor(record);
            if row.len() != header.len() {
                return Err(ExportError::RowWidth {
                    record_id: record.id(),
                    expected: header.len(),
                    actual: row.len(),
                });
            }
            writer.write_record(row.iter().map(FieldValue::to_cell))?;
        }

        writer.flush()?;
        Ok(records.len())
    }
}

/// File name for a download: `<subtype>_<posts|users>_export_<YYYY-MM-DD>.csv`
pub fn export_file_name(subtype: &str, kind: EntityKind, date: NaiveDate) -> String {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

    let sanitized = unsafe_chars.replace_all(subtype.trim(), "-");
    let sanitized = sanitized.trim_matches(|c| c == '-' || c == '.');
    let stem = if sanitized.is_empty() {
        kind.singular()
    } else {
        sanitized
    };

    format!(
        "{}_{}_export_{}.csv",
        stem,
        kind.label(),
        date.format("%Y-%m-%d")
    )
}
