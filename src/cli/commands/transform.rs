//! Transform command implementation
//!
//! Runs the batch pipeline with a stage spinner and prints a summary.

use super::shared::{create_spinner, setup_logging};
use crate::cli::args::TransformArgs;
use crate::models::ProcessingStats;
use crate::pipeline::TransformPipeline;

use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info};

/// Transform command runner
pub fn run_transform(args: TransformArgs) -> Result<ProcessingStats> {
    setup_logging(args.get_log_level())?;
    debug!("Transform arguments: {:?}", args);

    let config = args.to_config().context("Invalid transform arguments")?;
    let input_display = config.input_path.display().to_string();
    let pipeline = TransformPipeline::new(config);

    if args.show_progress() {
        println!("{}", "Starting survey transform".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), input_display);
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            pipeline.config().output_path.display()
        );
    }

    let spinner = create_spinner(args.show_progress())?;
    let result = pipeline.run_with_progress(|stage| {
        info!("{}", stage.describe());
        spinner.set_message(format!("{}...", stage.describe()));
    });
    spinner.finish_and_clear();

    let stats = result.with_context(|| format!("Failed to transform {}", input_display))?;

    if args.show_progress() {
        print_summary(&stats);
    }
    Ok(stats)
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Transform Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows read:".bright_cyan(),
        stats.rows_read.to_string().bright_white()
    );
    if stats.rows_dropped() > 0 {
        println!(
            "  {} {} ({} missing region, {} unparseable date)",
            "Rows dropped:".bright_red(),
            stats.rows_dropped().to_string().bright_red().bold(),
            stats.rows_missing_region,
            stats.rows_unparseable_date
        );
    }
    println!(
        "  {} {}",
        "Groups:".bright_cyan(),
        stats.groups.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Tidy rows:".bright_cyan(),
        stats.tidy_rows.to_string().bright_white().bold()
    );
    if stats.rows_with_gaps > 0 {
        println!(
            "  {} {}",
            "Rows without Rural/Urban pair:".bright_yellow(),
            stats.rows_with_gaps.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Written to:".bright_cyan(),
        stats.output_path.display()
    );
}
