//! Configuration management and validation.
//!
//! The pipeline is a pure function of a [`PipelineConfig`]: input path,
//! output path and the few parsing/serialization knobs live here rather
//! than in module-level state.

use crate::constants::{
    AREA_TOTAL, DEFAULT_DELIMITER, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, SURVEY_DATE_FORMAT,
};
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serialization format of the tidy table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Delimited text with a header row and no index column
    #[default]
    Csv,
    /// Apache Parquet with the same six columns
    Parquet,
}

impl OutputFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        }
    }
}

/// Configuration for one transform run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw survey file
    pub input_path: PathBuf,

    /// Tidy table destination (overwritten on each run)
    pub output_path: PathBuf,

    /// Tidy table format
    pub output_format: OutputFormat,

    /// Field separator of the raw survey file
    pub delimiter: u8,

    /// Strict chrono format for the raw `Date` column
    pub date_format: String,

    /// Area label substituted when the raw `Area` is empty
    pub default_area: String,

    /// Fixed number of decimals for CSV floats (None = shortest round-trip)
    pub float_precision: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            output_format: OutputFormat::Csv,
            delimiter: DEFAULT_DELIMITER,
            date_format: SURVEY_DATE_FORMAT.to_string(),
            default_area: AREA_TOTAL.to_string(),
            float_precision: None,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration for an explicit input/output pair
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self::default()
            .with_input_path(input_path)
            .with_output_path(output_path)
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    /// Set the output path; the format follows the extension
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self.output_format = OutputFormat::from_path(&self.output_path);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_float_precision(mut self, precision: Option<usize>) -> Self {
        self.float_precision = precision;
        self
    }

    /// Reject settings that would make every row unparseable
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(PipelineError::Configuration {
                message: "date format must not be empty".to_string(),
            });
        }

        if self.default_area.trim().is_empty() {
            return Err(PipelineError::Configuration {
                message: "default area label must not be empty".to_string(),
            });
        }

        if !self.delimiter.is_ascii() || self.delimiter == b'"' || self.delimiter == b'\n' {
            return Err(PipelineError::Configuration {
                message: format!("invalid field delimiter: {:?}", self.delimiter as char),
            });
        }

        Ok(())
    }
}
