//! Tidy table writing
//!
//! Serializes tidy rows as exactly six columns in declared order. CSV output
//! has a header row, no index column and empty fields for missing values;
//! Parquet output carries the same columns with nulls.

use crate::config::OutputFormat;
use crate::constants::tidy_columns;
use crate::error::{PipelineError, Result};
use crate::models::TidyRow;

use polars::prelude::{
    Column, CsvWriter, DataFrame, ParquetWriter as PolarsParquetWriter, PolarsResult, SerWriter,
};
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Tidy table writer
#[derive(Debug, Clone, Default)]
pub struct TidyWriter {
    format: OutputFormat,
    float_precision: Option<usize>,
}

impl TidyWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            float_precision: None,
        }
    }

    pub fn with_float_precision(mut self, precision: Option<usize>) -> Self {
        self.float_precision = precision;
        self
    }

    /// Write `rows` to `destination`, creating its directory and replacing
    /// any existing file. Returns the number of rows written.
    pub fn write(&self, rows: &[TidyRow], destination: &Path) -> Result<usize> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PipelineError::OutputNotWritable {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut frame = tidy_frame(rows)?;
        let mut file = File::create(destination).map_err(|source| {
            PipelineError::OutputNotWritable {
                path: destination.to_path_buf(),
                source,
            }
        })?;

        debug!(
            "Writing {} tidy rows as {:?} to {}",
            frame.height(),
            self.format,
            destination.display()
        );

        match self.format {
            OutputFormat::Csv => {
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .with_separator(b',')
                    .with_float_precision(self.float_precision)
                    .finish(&mut frame)?;
            }
            OutputFormat::Parquet => {
                PolarsParquetWriter::new(&mut file).finish(&mut frame)?;
            }
        }

        info!("Wrote {} tidy rows to {}", rows.len(), destination.display());
        Ok(rows.len())
    }
}

/// Write tidy rows to `destination`, choosing the format from its extension
pub fn write_tidy(rows: &[TidyRow], destination: &Path) -> Result<usize> {
    TidyWriter::new(OutputFormat::from_path(destination)).write(rows, destination)
}

/// Build the six-column tidy frame in declared column order
pub fn tidy_frame(rows: &[TidyRow]) -> PolarsResult<DataFrame> {
    let states: Vec<&str> = rows.iter().map(|row| row.state.as_str()).collect();
    let years: Vec<i32> = rows.iter().map(|row| row.year).collect();
    let unemployment: Vec<Option<f64>> = rows.iter().map(|row| row.unemployment_rate).collect();
    let wpr: Vec<Option<f64>> = rows.iter().map(|row| row.wpr).collect();
    let rural: Vec<Option<f64>> = rows.iter().map(|row| row.rural_employment).collect();
    let urban: Vec<Option<f64>> = rows.iter().map(|row| row.urban_employment).collect();

    DataFrame::new(vec![
        Column::new(tidy_columns::STATE.into(), states),
        Column::new(tidy_columns::YEAR.into(), years),
        Column::new(tidy_columns::UNEMPLOYMENT_RATE.into(), unemployment),
        Column::new(tidy_columns::WPR.into(), wpr),
        Column::new(tidy_columns::RURAL_EMPLOYMENT.into(), rural),
        Column::new(tidy_columns::URBAN_EMPLOYMENT.into(), urban),
    ])
}
