//! Core data structures for the transform pipeline.
//!
//! Defines the raw and normalized survey records, the aggregation key and
//! group, the tidy output row, and processing statistics.

use crate::constants::{AREA_RURAL, AREA_TOTAL, AREA_URBAN};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Survey stratification of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    Rural,
    Urban,
    Total,
    /// Any other label found in the raw file, kept verbatim (trimmed)
    Other(String),
}

impl Area {
    /// Classify a trimmed, non-empty area label
    pub fn from_label(label: &str) -> Self {
        match label {
            AREA_RURAL => Area::Rural,
            AREA_URBAN => Area::Urban,
            AREA_TOTAL => Area::Total,
            other => Area::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Area::Rural => AREA_RURAL,
            Area::Urban => AREA_URBAN,
            Area::Total => AREA_TOTAL,
            Area::Other(label) => label,
        }
    }
}

// Areas sort by label so group emission order matches a lexicographic
// (State, Year, Area) sort.
impl Ord for Area {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Area {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One untouched row of the raw survey file, borrowed from the loaded frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawRecord<'a> {
    pub region: Option<&'a str>,
    pub date: Option<&'a str>,
    pub area: Option<&'a str>,
    pub unemployment_rate: Option<&'a str>,
    pub labour_participation_rate: Option<&'a str>,
    pub employed: Option<&'a str>,
}

/// Why a raw row was excluded from the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    MissingRegion,
    UnparseableDate(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::MissingRegion => f.write_str("missing region"),
            RowRejection::UnparseableDate(text) => write!(f, "unparseable date '{}'", text),
        }
    }
}

impl<'a> RawRecord<'a> {
    /// Clean a raw row into a [`NormalizedRecord`].
    ///
    /// Text fields are trimmed. The date must match `date_format` exactly;
    /// an empty area becomes `default_area`. Numeric fields that are empty
    /// or not decimal become missing measurements without rejecting the row.
    pub fn normalize(
        &self,
        date_format: &str,
        default_area: &str,
    ) -> Result<NormalizedRecord, RowRejection> {
        let state = non_empty(self.region).ok_or(RowRejection::MissingRegion)?;

        let date_text = non_empty(self.date).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_text, date_format)
            .ok()
            .filter(|_| has_four_digit_year(date_text, date_format))
            .ok_or_else(|| RowRejection::UnparseableDate(date_text.to_string()))?;

        let area = Area::from_label(non_empty(self.area).unwrap_or(default_area).trim());

        Ok(NormalizedRecord {
            state: state.to_string(),
            date,
            year: date.year(),
            area,
            unemployment_rate: parse_decimal(self.unemployment_rate),
            labour_participation_rate: parse_decimal(self.labour_participation_rate),
            employed: parse_decimal(self.employed),
        })
    }
}

/// chrono's `%Y` also takes short or signed years ("20", "+2020"); a
/// trailing `%Y` must match exactly four ASCII digits.
fn has_four_digit_year(text: &str, date_format: &str) -> bool {
    let Some(prefix) = date_format.strip_suffix("%Y") else {
        return true;
    };
    let year = match prefix.chars().last() {
        Some(separator) => match text.rsplit_once(separator) {
            Some((_, year)) => year,
            None => return false,
        },
        None => text,
    };
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Parse a trimmed decimal, treating empty or malformed text as missing
pub fn parse_decimal(value: Option<&str>) -> Option<f64> {
    non_empty(value)
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

/// A cleaned survey record keyed by state, year and area
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub state: String,
    pub date: NaiveDate,
    pub year: i32,
    pub area: Area,
    pub unemployment_rate: Option<f64>,
    pub labour_participation_rate: Option<f64>,
    pub employed: Option<f64>,
}

impl NormalizedRecord {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            state: self.state.clone(),
            year: self.year,
            area: self.area.clone(),
        }
    }
}

/// Aggregation key; field order gives the (State, Year, Area) sort
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub state: String,
    pub year: i32,
    pub area: Area,
}

impl GroupKey {
    pub fn new(state: impl Into<String>, year: i32, area: Area) -> Self {
        Self {
            state: state.into(),
            year,
            area,
        }
    }
}

/// Per-group means of the three survey measurements
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateGroup {
    pub unemployment_rate: Option<f64>,
    pub labour_participation_rate: Option<f64>,
    pub employed: Option<f64>,
    /// Number of normalized records that fell into the group
    pub record_count: usize,
}

/// One row of the tidy table: one per (State, Year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRow {
    pub state: String,
    pub year: i32,
    pub unemployment_rate: Option<f64>,
    pub wpr: Option<f64>,
    pub rural_employment: Option<f64>,
    pub urban_employment: Option<f64>,
}

impl TidyRow {
    /// True when the Rural/Urban average could not be formed
    pub fn has_derivation_gap(&self) -> bool {
        self.unemployment_rate.is_none() || self.wpr.is_none()
    }
}

/// Processing statistics for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub rows_read: usize,
    pub rows_missing_region: usize,
    pub rows_unparseable_date: usize,
    pub records_kept: usize,
    pub groups: usize,
    pub tidy_rows: usize,
    pub rows_with_gaps: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn rows_dropped(&self) -> usize {
        self.rows_missing_region + self.rows_unparseable_date
    }

    pub fn record_rejection(&mut self, rejection: &RowRejection) {
        match rejection {
            RowRejection::MissingRegion => self.rows_missing_region += 1,
            RowRejection::UnparseableDate(_) => self.rows_unparseable_date += 1,
        }
    }
}
