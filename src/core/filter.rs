//! Date filters built from admin form input
//!
//! A filter is an inclusive `[after, before]` window over one timestamp
//! column. Either bound may be open; a filter with neither bound is the
//! *empty* filter and matches every record.
//!
//! Two builders share one mapping:
//! - [`DateFilter::build`] degrades malformed input to the empty filter
//! - [`DateFilter::try_build`] reports it as a [`ValidationError`]
//!
//! Anything that can delete records must go through `try_build`.

use crate::core::entity::DateColumn;
use crate::core::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Date format accepted from forms
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which shape of filter the admin selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    All,
    Single,
    Range,
}

impl DateMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "all" => Some(DateMode::All),
            "single" => Some(DateMode::Single),
            "range" => Some(DateMode::Range),
            _ => None,
        }
    }
}

/// Comparator for single-date filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCondition {
    Before,
    After,
}

impl DateCondition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "before" => Some(DateCondition::Before),
            "after" => Some(DateCondition::After),
            _ => None,
        }
    }
}

/// Raw, already-sanitized filter input
#[derive(Debug, Clone)]
pub struct DateFilterParams {
    /// "all", "single" or "range"
    pub mode: String,
    /// Date for single mode (YYYY-MM-DD)
    pub single: String,
    /// "before" or "after" for single mode
    pub condition: String,
    /// Range start (YYYY-MM-DD)
    pub start: String,
    /// Range end (YYYY-MM-DD)
    pub end: String,
    /// Column the resulting filter applies to
    pub column: DateColumn,
}

impl DateFilterParams {
    /// Parameters selecting every record
    pub fn all(column: DateColumn) -> Self {
        Self {
            mode: "all".to_string(),
            single: String::new(),
            condition: String::new(),
            start: String::new(),
            end: String::new(),
            column,
        }
    }

    /// Parameters for a single-date comparison
    pub fn single(column: DateColumn, date: &str, condition: &str) -> Self {
        Self {
            mode: "single".to_string(),
            single: date.to_string(),
            condition: condition.to_string(),
            ..Self::all(column)
        }
    }

    /// Parameters for an inclusive date range
    pub fn range(column: DateColumn, start: &str, end: &str) -> Self {
        Self {
            mode: "range".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            ..Self::all(column)
        }
    }
}

/// Normalized, immutable date predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    pub column: DateColumn,
    /// Inclusive lower bound
    pub after: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub before: Option<DateTime<Utc>>,
}

impl DateFilter {
    /// The filter that matches every record
    pub fn empty(column: DateColumn) -> Self {
        Self {
            column,
            after: None,
            before: None,
        }
    }

    /// Build a filter, collapsing malformed input into the empty filter.
    ///
    /// The range order is not checked here; an inverted range simply
    /// matches nothing.
    pub fn build(params: &DateFilterParams) -> Self {
        Self::resolve(params).unwrap_or_else(|_| Self::empty(params.column))
    }

    /// Build a filter, rejecting malformed input
    pub fn try_build(params: &DateFilterParams) -> Result<Self, ValidationError> {
        let filter = Self::resolve(params)?;
        if let (Some(after), Some(before)) = (filter.after, filter.before) {
            if after > before {
                return Err(ValidationError::InvertedRange {
                    start: params.start.trim().to_string(),
                    end: params.end.trim().to_string(),
                });
            }
        }
        Ok(filter)
    }

    fn resolve(params: &DateFilterParams) -> Result<Self, ValidationError> {
        let mode = DateMode::parse(&params.mode).ok_or_else(|| ValidationError::UnknownOption {
            field: "date_option".to_string(),
            value: params.mode.clone(),
        })?;

        match mode {
            DateMode::All => Ok(Self::empty(params.column)),
            DateMode::Single => {
                let date = parse_date("date_single", &params.single)?;
                let condition = DateCondition::parse(&params.condition).ok_or_else(|| {
                    ValidationError::UnknownOption {
                        field: "date_condition".to_string(),
                        value: params.condition.clone(),
                    }
                })?;
                let filter = match condition {
                    DateCondition::Before => Self {
                        before: Some(end_of_day("date_single", date)?),
                        ..Self::empty(params.column)
                    },
                    DateCondition::After => Self {
                        after: Some(start_of_day("date_single", date)?),
                        ..Self::empty(params.column)
                    },
                };
                Ok(filter)
            }
            DateMode::Range => {
                let start = parse_date("date_start", &params.start)?;
                let end = parse_date("date_end", &params.end)?;
                Ok(Self {
                    column: params.column,
                    after: Some(start_of_day("date_start", start)?),
                    before: Some(end_of_day("date_end", end)?),
                })
            }
        }
    }

    /// True when the filter has no bound and matches everything
    pub fn is_empty(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    /// Evaluate the filter against a record's column value
    ///
    /// A record lacking the column only passes the empty filter.
    pub fn matches(&self, timestamp: Option<DateTime<Utc>>) -> bool {
        if self.is_empty() {
            return true;
        }
        let Some(ts) = timestamp else {
            return false;
        };
        self.after.is_none_or(|after| ts >= after) && self.before.is_none_or(|before| ts <= before)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingArgument {
            argument: field.to_string(),
        });
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn start_of_day(field: &str, date: NaiveDate) -> Result<DateTime<Utc>, ValidationError> {
    at(field, date, 0, 0, 0)
}

fn end_of_day(field: &str, date: NaiveDate) -> Result<DateTime<Utc>, ValidationError> {
    at(field, date, 23, 59, 59)
}

fn at(
    field: &str,
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<DateTime<Utc>, ValidationError> {
    date.and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate {
            field: field.to_string(),
            value: date.format(DATE_FORMAT).to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const COL: DateColumn = DateColumn::CreationDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    // === build() ===

    #[test]
    fn test_all_is_empty() {
        let filter = DateFilter::build(&DateFilterParams::all(COL));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_unrecognized_mode_is_empty() {
        let params = DateFilterParams {
            mode: "yesterday".to_string(),
            ..DateFilterParams::range(COL, "2024-01-01", "2024-01-31")
        };
        assert!(DateFilter::build(&params).is_empty());
    }

    #[test]
    fn test_single_before_is_inclusive_end_of_day() {
        let filter = DateFilter::build(&DateFilterParams::single(COL, "2024-06-01", "before"));
        assert_eq!(filter.before, Some(ts(2024, 6, 1, 23, 59, 59)));
        assert_eq!(filter.after, None);
        assert!(filter.matches(Some(ts(2024, 6, 1, 23, 59, 59))));
        assert!(!filter.matches(Some(ts(2024, 6, 2, 0, 0, 0))));
    }

    #[test]
    fn test_single_after_is_inclusive_start_of_day() {
        let filter = DateFilter::build(&DateFilterParams::single(COL, "2024-06-01", "after"));
        assert_eq!(filter.after, Some(ts(2024, 6, 1, 0, 0, 0)));
        assert_eq!(filter.before, None);
        assert!(filter.matches(Some(ts(2024, 6, 1, 0, 0, 0))));
        assert!(!filter.matches(Some(ts(2024, 5, 31, 23, 59, 59))));
    }

    #[test]
    fn test_range_bounds() {
        let filter = DateFilter::build(&DateFilterParams::range(COL, "2024-01-01", "2024-01-31"));
        assert_eq!(filter.after, Some(ts(2024, 1, 1, 0, 0, 0)));
        assert_eq!(filter.before, Some(ts(2024, 1, 31, 23, 59, 59)));
        assert!(filter.matches(Some(ts(2024, 1, 1, 0, 0, 0))));
        assert!(filter.matches(Some(ts(2024, 1, 31, 23, 59, 59))));
        assert!(!filter.matches(Some(ts(2024, 2, 1, 0, 0, 0))));
    }

    #[test]
    fn test_incomplete_input_degrades_to_empty() {
        let cases = [
            DateFilterParams::single(COL, "", "before"),
            DateFilterParams::single(COL, "2024-06-01", "around"),
            DateFilterParams::single(COL, "06/01/2024", "after"),
            DateFilterParams::range(COL, "", "2024-01-31"),
            DateFilterParams::range(COL, "2024-01-01", ""),
            DateFilterParams::range(COL, "2024-02-30", "2024-03-01"),
        ];
        for params in &cases {
            assert!(DateFilter::build(params).is_empty(), "{params:?}");
        }
    }

    #[test]
    fn test_build_keeps_inverted_range() {
        let filter = DateFilter::build(&DateFilterParams::range(COL, "2024-03-01", "2024-02-01"));
        assert!(!filter.is_empty());
        assert!(!filter.matches(Some(ts(2024, 2, 15, 0, 0, 0))));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let filter =
            DateFilter::build(&DateFilterParams::single(COL, " 2024-06-01 ", " after "));
        assert_eq!(filter.after, Some(ts(2024, 6, 1, 0, 0, 0)));
    }

    // === try_build() ===

    #[test]
    fn test_try_build_all_is_ok_empty() {
        let filter = DateFilter::try_build(&DateFilterParams::all(COL)).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_try_build_unknown_mode() {
        let params = DateFilterParams {
            mode: String::new(),
            ..DateFilterParams::all(COL)
        };
        assert!(matches!(
            DateFilter::try_build(&params),
            Err(ValidationError::UnknownOption { ref field, .. }) if field == "date_option"
        ));
    }

    #[test]
    fn test_try_build_missing_single() {
        let err = DateFilter::try_build(&DateFilterParams::single(COL, " ", "before")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingArgument {
                argument: "date_single".to_string()
            }
        );
    }

    #[test]
    fn test_try_build_unknown_condition() {
        let err =
            DateFilter::try_build(&DateFilterParams::single(COL, "2024-06-01", "on")).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownOption { ref field, .. } if field == "date_condition"));
    }

    #[test]
    fn test_try_build_invalid_date() {
        let err = DateFilter::try_build(&DateFilterParams::range(COL, "2024-01-01", "2024-13-01"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                field: "date_end".to_string(),
                value: "2024-13-01".to_string()
            }
        );
    }

    #[test]
    fn test_try_build_missing_range_start() {
        let err =
            DateFilter::try_build(&DateFilterParams::range(COL, "", "2024-01-31")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingArgument {
                argument: "date_start".to_string()
            }
        );
    }

    #[test]
    fn test_try_build_inverted_range() {
        let err = DateFilter::try_build(&DateFilterParams::range(COL, "2024-03-01", "2024-02-01"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }

    #[test]
    fn test_try_build_same_day_range() {
        let filter =
            DateFilter::try_build(&DateFilterParams::range(COL, "2024-03-01", "2024-03-01"))
                .unwrap();
        assert!(filter.matches(Some(ts(2024, 3, 1, 12, 0, 0))));
    }

    // === matches() ===

    #[test]
    fn test_missing_timestamp() {
        assert!(DateFilter::empty(COL).matches(None));
        let filter = DateFilter::build(&DateFilterParams::single(COL, "2024-06-01", "after"));
        assert!(!filter.matches(None));
    }
}
