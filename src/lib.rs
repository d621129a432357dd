//! Unemployment ETL Library
//!
//! A Rust library for reshaping a raw state unemployment survey into a tidy
//! per-state/year metrics table.
//!
//! This library provides tools for:
//! - Loading the raw survey with trimmed headers and strict date parsing
//! - Dropping rows with no region or an unparseable date
//! - Averaging measurements per (State, Year, Area) group
//! - Deriving unemployment rate, worker participation ratio and rural/urban
//!   employment per (State, Year)
//! - Writing the tidy table as CSV or Parquet
//! - Answering the dashboard's queries over a written tidy table

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{OutputFormat, PipelineConfig};
pub use error::{PipelineError, Result};
pub use models::{AggregateGroup, Area, GroupKey, NormalizedRecord, ProcessingStats, TidyRow};
pub use pipeline::{
    AggregateMap, TransformPipeline, aggregate, load_and_clean, pivot_and_derive, run_pipeline,
    write_tidy,
};
pub use report::TidyTable;
