//! Read-side queries over the tidy table.
//!
//! The dashboard is a pure consumer of the tidy schema. [`TidyTable`]
//! answers the questions it asks: which states and years exist, one
//! state's rows over a year range, a single-year comparison across
//! states, a State x Year matrix of unemployment rates, and the Rural vs
//! Urban employment split.

use crate::config::OutputFormat;
use crate::constants::tidy_columns;
use crate::error::{PipelineError, Result};
use crate::models::{TidyRow, parse_decimal};
use crate::pipeline::loader::{read_string_frame, require_columns, string_values};

use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, warn};

/// In-memory tidy table, sorted by State then Year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTable {
    rows: Vec<TidyRow>,
}

/// State x Year matrix of unemployment rates
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub states: Vec<String>,
    pub years: Vec<i32>,
    /// `values[state_index][year_index]`
    pub values: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    pub fn get(&self, state: &str, year: i32) -> Option<f64> {
        let row = self.states.iter().position(|s| s == state)?;
        let column = self.years.iter().position(|&y| y == year)?;
        self.values.get(row)?.get(column).copied().flatten()
    }
}

/// Rural vs Urban employment for one state-year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmploymentShare {
    pub rural: Option<f64>,
    pub urban: Option<f64>,
}

impl EmploymentShare {
    /// Rural share of combined employment, when both sides are known
    pub fn rural_fraction(&self) -> Option<f64> {
        match (self.rural, self.urban) {
            (Some(rural), Some(urban)) if rural + urban > 0.0 => Some(rural / (rural + urban)),
            _ => None,
        }
    }
}

impl TidyTable {
    /// Wrap rows, enforcing the (State, Year) order
    pub fn from_rows(mut rows: Vec<TidyRow>) -> Self {
        rows.sort_by(|a, b| a.state.cmp(&b.state).then(a.year.cmp(&b.year)));
        Self { rows }
    }

    /// Load a tidy table written by the pipeline (CSV or Parquet)
    pub fn load(path: &Path) -> Result<Self> {
        let rows = match OutputFormat::from_path(path) {
            OutputFormat::Csv => read_tidy_csv(path)?,
            OutputFormat::Parquet => read_tidy_parquet(path)?,
        };
        debug!("Loaded {} tidy rows from {}", rows.len(), path.display());
        Ok(Self::from_rows(rows))
    }

    pub fn rows(&self) -> &[TidyRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct states in sorted order
    pub fn states(&self) -> Vec<&str> {
        let states: BTreeSet<&str> = self.rows.iter().map(|row| row.state.as_str()).collect();
        states.into_iter().collect()
    }

    /// Distinct years in ascending order
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.rows.iter().map(|row| row.year).collect();
        years.into_iter().collect()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let years = self.years();
        Some((*years.first()?, *years.last()?))
    }

    /// Rows for one state within an inclusive year range
    pub fn filter(&self, state: &str, years: RangeInclusive<i32>) -> Vec<&TidyRow> {
        self.rows
            .iter()
            .filter(|row| row.state == state && years.contains(&row.year))
            .collect()
    }

    /// All states in one year, highest unemployment first, missing last
    pub fn comparison(&self, year: i32) -> Vec<&TidyRow> {
        let mut rows: Vec<&TidyRow> = self.rows.iter().filter(|row| row.year == year).collect();
        rows.sort_by(|a, b| match (a.unemployment_rate, b.unemployment_rate) {
            (Some(a_rate), Some(b_rate)) => b_rate.partial_cmp(&a_rate).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows
    }

    /// Pivot the whole table into a State x Year matrix of unemployment rates
    pub fn heatmap(&self) -> Heatmap {
        let states: Vec<String> = self.states().into_iter().map(str::to_string).collect();
        let years = self.years();

        let lookup: BTreeMap<(&str, i32), Option<f64>> = self
            .rows
            .iter()
            .map(|row| ((row.state.as_str(), row.year), row.unemployment_rate))
            .collect();

        let values = states
            .iter()
            .map(|state| {
                years
                    .iter()
                    .map(|&year| lookup.get(&(state.as_str(), year)).copied().flatten())
                    .collect()
            })
            .collect();

        Heatmap {
            states,
            years,
            values,
        }
    }

    /// Rural vs Urban employment for one state-year, if that row exists
    pub fn employment_share(&self, state: &str, year: i32) -> Option<EmploymentShare> {
        self.rows
            .iter()
            .find(|row| row.state == state && row.year == year)
            .map(|row| EmploymentShare {
                rural: row.rural_employment,
                urban: row.urban_employment,
            })
    }
}

fn read_tidy_csv(path: &Path) -> Result<Vec<TidyRow>> {
    let frame = read_string_frame(path, b',')?;
    require_columns(&frame, path, tidy_columns::ALL)?;

    let states = string_values(&frame, tidy_columns::STATE)?;
    let years = string_values(&frame, tidy_columns::YEAR)?;
    let unemployment = string_values(&frame, tidy_columns::UNEMPLOYMENT_RATE)?;
    let wpr = string_values(&frame, tidy_columns::WPR)?;
    let rural = string_values(&frame, tidy_columns::RURAL_EMPLOYMENT)?;
    let urban = string_values(&frame, tidy_columns::URBAN_EMPLOYMENT)?;

    let mut rows = Vec::with_capacity(frame.height());
    for index in 0..frame.height() {
        let state = states[index].map(str::trim).filter(|s| !s.is_empty());
        let year = years[index].and_then(|y| y.trim().parse::<i32>().ok());

        match (state, year) {
            (Some(state), Some(year)) => rows.push(TidyRow {
                state: state.to_string(),
                year,
                unemployment_rate: parse_decimal(unemployment[index]),
                wpr: parse_decimal(wpr[index]),
                rural_employment: parse_decimal(rural[index]),
                urban_employment: parse_decimal(urban[index]),
            }),
            _ => warn!(
                "Skipping tidy row {} of {}: missing State or Year",
                index + 2,
                path.display()
            ),
        }
    }
    Ok(rows)
}

fn read_tidy_parquet(path: &Path) -> Result<Vec<TidyRow>> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let frame = ParquetReader::new(file)
        .finish()
        .map_err(|e| PipelineError::InvalidInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    require_columns(&frame, path, tidy_columns::ALL)?;

    let states: Vec<Option<&str>> = frame.column(tidy_columns::STATE)?.str()?.into_iter().collect();
    let years: Vec<Option<i32>> = frame.column(tidy_columns::YEAR)?.i32()?.into_iter().collect();
    let float_values = |name: &str| -> Result<Vec<Option<f64>>> {
        Ok(frame.column(name)?.f64()?.into_iter().collect())
    };
    let unemployment = float_values(tidy_columns::UNEMPLOYMENT_RATE)?;
    let wpr = float_values(tidy_columns::WPR)?;
    let rural = float_values(tidy_columns::RURAL_EMPLOYMENT)?;
    let urban = float_values(tidy_columns::URBAN_EMPLOYMENT)?;

    let rows = (0..frame.height())
        .filter_map(|index| {
            Some(TidyRow {
                state: states[index]?.to_string(),
                year: years[index]?,
                unemployment_rate: unemployment[index],
                wpr: wpr[index],
                rural_employment: rural[index],
                urban_employment: urban[index],
            })
        })
        .collect();
    Ok(rows)
}
