//! Error handling for the transform pipeline.
//!
//! Provides error types with enough context (offending path, offending
//! column) for an operator to fix the input and re-run. Row-level data
//! problems are not errors; see [`crate::models::RowRejection`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input file not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Input file is not a readable table: {path} - {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Required column '{column}' missing from input file: {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Cannot write tidy table to {path}: {source}")]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
