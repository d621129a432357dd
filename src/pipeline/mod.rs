//! Transform pipeline with a staged architecture.
//!
//! Runs the four batch stages in sequence, single-threaded:
//! load and clean the raw survey, group and aggregate by
//! (State, Year, Area), pivot the Rural/Urban slices into tidy rows, and
//! write the tidy table. Nothing is written unless every earlier stage
//! succeeded.

pub mod aggregate;
pub mod derive;
pub mod loader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use self::aggregate::{AggregateMap, aggregate};
pub use self::derive::{pivot_and_derive, rural_urban_average};
pub use self::loader::load_and_clean;
pub use self::writer::{TidyWriter, tidy_frame, write_tidy};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{ProcessingStats, TidyRow};

use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Stage reached by a running pipeline, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Aggregate,
    Derive,
    Write,
}

impl Stage {
    pub fn describe(&self) -> &'static str {
        match self {
            Stage::Load => "Loading and cleaning raw survey",
            Stage::Aggregate => "Aggregating by state, year and area",
            Stage::Derive => "Deriving tidy metrics",
            Stage::Write => "Writing tidy table",
        }
    }
}

/// Batch transform from a raw survey file to a tidy table
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    config: PipelineConfig,
}

impl TransformPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage and write the tidy table
    pub fn run(&self) -> Result<ProcessingStats> {
        self.run_with_progress(|_| {})
    }

    /// Run every stage, calling `on_stage` as each one starts
    pub fn run_with_progress(&self, mut on_stage: impl FnMut(Stage)) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        info!(
            "Transforming {} -> {}",
            self.config.input_path.display(),
            self.config.output_path.display()
        );
        debug!("Pipeline configuration: {:?}", self.config);

        let mut stats = ProcessingStats {
            output_path: self.config.output_path.clone(),
            ..Default::default()
        };

        on_stage(Stage::Load);
        let rows = self.transform(&mut stats, &mut on_stage)?;

        on_stage(Stage::Write);
        TidyWriter::new(self.config.output_format)
            .with_float_precision(self.config.float_precision)
            .write(&rows, &self.config.output_path)?;

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Pipeline finished in {}ms: {} tidy rows",
            stats.processing_time_ms, stats.tidy_rows
        );
        Ok(stats)
    }

    /// Run the in-memory stages only and return the tidy rows
    pub fn transform_only(&self) -> Result<(Vec<TidyRow>, ProcessingStats)> {
        self.config.validate()?;
        let mut stats = ProcessingStats {
            output_path: self.config.output_path.clone(),
            ..Default::default()
        };
        let rows = self.transform(&mut stats, &mut |_| {})?;
        Ok((rows, stats))
    }

    fn transform(
        &self,
        stats: &mut ProcessingStats,
        on_stage: &mut impl FnMut(Stage),
    ) -> Result<Vec<TidyRow>> {
        let records = load_and_clean(&self.config, stats)?;

        on_stage(Stage::Aggregate);
        let groups = aggregate(&records);
        stats.groups = groups.len();

        on_stage(Stage::Derive);
        let rows = pivot_and_derive(&groups);
        stats.tidy_rows = rows.len();
        stats.rows_with_gaps = rows.iter().filter(|row| row.has_derivation_gap()).count();

        if stats.rows_with_gaps > 0 {
            warn!(
                "{} of {} state-years lack a Rural or Urban counterpart; their rate averages are missing",
                stats.rows_with_gaps, stats.tidy_rows
            );
        }

        Ok(rows)
    }
}

/// Run the pipeline with default settings for one input/output pair
pub fn run_pipeline(input: &Path, output: &Path) -> Result<ProcessingStats> {
    TransformPipeline::new(PipelineConfig::new(input, output)).run()
}
