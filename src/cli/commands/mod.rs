//! Command implementations for the unemployment ETL CLI
//!
//! Each subcommand lives in its own module:
//! - `transform`: run the batch pipeline and write the tidy table
//! - `report`: print the dashboard views of an existing tidy table

pub mod report;
pub mod shared;
pub mod transform;

use crate::cli::args::Commands;
use anyhow::Result;

/// Dispatch to the handler of the selected subcommand
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Transform(transform_args) => {
            transform::run_transform(transform_args)?;
            Ok(())
        }
        Commands::Report(report_args) => report::run_report(report_args),
    }
}
