//! Command-line argument definitions for the unemployment ETL
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{OutputFormat, PipelineConfig};
use crate::constants::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use crate::error::{PipelineError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the unemployment survey ETL
///
/// Reshapes a raw unemployment survey into a tidy per-state/year table and
/// answers the dashboard's questions about that table.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "unemployment-etl",
    version,
    about = "Reshape a raw unemployment survey into a tidy per-state/year table",
    long_about = "Reads a raw state unemployment survey, drops rows with no region or an \
                  unparseable date, averages each (state, year, area) group and derives \
                  unemployment rate, worker participation ratio and rural/urban employment \
                  per state and year."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Transform the raw survey into the tidy table
    Transform(TransformArgs),
    /// Query a tidy table the way the dashboard does
    Report(ReportArgs),
}

/// Serialization format of the tidy table on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl From<TableFormat> for OutputFormat {
    fn from(format: TableFormat) -> Self {
        match format {
            TableFormat::Csv => OutputFormat::Csv,
            TableFormat::Parquet => OutputFormat::Parquet,
        }
    }
}

/// Arguments for the transform command
#[derive(Debug, Clone, Parser)]
pub struct TransformArgs {
    /// Raw survey file
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        default_value = DEFAULT_INPUT_PATH,
        help = "Raw survey file to transform"
    )]
    pub input_path: PathBuf,

    /// Destination of the tidy table
    ///
    /// Its directory is created if missing; an existing file is replaced.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Destination of the tidy table"
    )]
    pub output_path: PathBuf,

    /// Tidy table format; inferred from the output extension when omitted
    #[arg(long = "format", value_enum, help = "Tidy table format (csv, parquet)")]
    pub format: Option<TableFormat>,

    /// Field separator of the raw survey file
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        default_value_t = ',',
        help = "Field separator of the raw survey file"
    )]
    pub delimiter: char,

    /// Write CSV floats with a fixed number of decimals
    #[arg(
        long = "float-precision",
        value_name = "DIGITS",
        help = "Fixed number of decimals for CSV floats"
    )]
    pub float_precision: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Dashboard view printed by the report command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportView {
    /// States, year range and row counts
    Summary,
    /// Unemployment rate and WPR of one state over the year range
    Trend,
    /// All states in the last year of the range, highest rate first
    Comparison,
    /// State x Year matrix of unemployment rates
    Heatmap,
    /// Rural vs Urban employment of one state in the last year of the range
    Share,
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Tidy table to read
    #[arg(
        short = 'd',
        long = "data",
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Tidy table produced by the transform command"
    )]
    pub data_path: PathBuf,

    /// View to print
    #[arg(long = "view", value_enum, default_value = "summary")]
    pub view: ReportView,

    /// State to report on (defaults to the first state alphabetically)
    #[arg(short = 's', long = "state", value_name = "NAME")]
    pub state: Option<String>,

    /// First year of the range (defaults to the earliest year)
    #[arg(long = "from", value_name = "YEAR")]
    pub from_year: Option<i32>,

    /// Last year of the range (defaults to the latest year)
    #[arg(long = "to", value_name = "YEAR")]
    pub to_year: Option<i32>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl TransformArgs {
    /// Validate the transform arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(PipelineError::Configuration {
                message: format!("Delimiter must be a single ASCII character, got '{}'", self.delimiter),
            });
        }

        if self.input_path == self.output_path {
            return Err(PipelineError::Configuration {
                message: format!(
                    "Output path must differ from input path: {}",
                    self.input_path.display()
                ),
            });
        }

        Ok(())
    }

    /// Build the pipeline configuration described by these arguments
    pub fn to_config(&self) -> Result<PipelineConfig> {
        self.validate()?;

        let mut config = PipelineConfig::new(&self.input_path, &self.output_path)
            .with_delimiter(self.delimiter as u8)
            .with_float_precision(self.float_precision);
        if let Some(format) = self.format {
            config = config.with_output_format(format.into());
        }

        config.validate()?;
        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level(self.verbose)
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ReportArgs {
    /// Validate the report arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from_year, self.to_year) {
            if from > to {
                return Err(PipelineError::Configuration {
                    message: format!("Year range is empty: --from {} is after --to {}", from, to),
                });
            }
        }

        if matches!(self.state.as_deref(), Some(state) if state.trim().is_empty()) {
            return Err(PipelineError::Configuration {
                message: "State name cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
