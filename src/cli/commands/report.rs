//! Report command implementation
//!
//! Prints the dashboard views of a tidy table as text: a summary, one
//! state's trend, a single-year comparison, the State x Year heatmap and the
//! Rural vs Urban employment split.

use super::shared::{format_count, format_value, setup_logging};
use crate::cli::args::{ReportArgs, ReportView};
use crate::report::TidyTable;

use anyhow::{Context, Result, bail};
use colored::*;
use tracing::debug;

/// Resolved state and year range for a report
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    state: String,
    from_year: i32,
    to_year: i32,
}

/// Report command runner
pub fn run_report(args: ReportArgs) -> Result<()> {
    setup_logging(args.get_log_level())?;
    debug!("Report arguments: {:?}", args);
    args.validate().context("Invalid report arguments")?;

    let table = TidyTable::load(&args.data_path)
        .with_context(|| format!("Failed to load tidy table {}", args.data_path.display()))?;
    if table.is_empty() {
        bail!("Tidy table {} has no rows", args.data_path.display());
    }

    let selection = resolve_selection(&table, &args)?;

    match args.view {
        ReportView::Summary => print_summary(&table),
        ReportView::Trend => print_trend(&table, &selection),
        ReportView::Comparison => print_comparison(&table, selection.to_year),
        ReportView::Heatmap => print_heatmap(&table),
        ReportView::Share => print_share(&table, &selection),
    }
    Ok(())
}

/// Fill in the dashboard defaults: first state, full year range
fn resolve_selection(table: &TidyTable, args: &ReportArgs) -> Result<Selection> {
    let states = table.states();
    let state = match &args.state {
        Some(state) => {
            let state = state.trim();
            if !states.contains(&state) {
                bail!(
                    "Unknown state '{}'. Available states: {}",
                    state,
                    states.join(", ")
                );
            }
            state.to_string()
        }
        None => states
            .first()
            .map(|s| s.to_string())
            .context("Tidy table has no states")?,
    };

    let (min_year, max_year) = table.year_range().context("Tidy table has no years")?;
    Ok(Selection {
        state,
        from_year: args.from_year.unwrap_or(min_year),
        to_year: args.to_year.unwrap_or(max_year),
    })
}

fn print_summary(table: &TidyTable) {
    let states = table.states();
    println!("{}", "Tidy Table Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Rows:".bright_cyan(),
        table.rows().len().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "States:".bright_cyan(),
        states.len().to_string().bright_white()
    );
    if let Some((min_year, max_year)) = table.year_range() {
        println!("  {} {} - {}", "Years:".bright_cyan(), min_year, max_year);
    }
    let gaps = table
        .rows()
        .iter()
        .filter(|row| row.has_derivation_gap())
        .count();
    if gaps > 0 {
        println!(
            "  {} {}",
            "Rows with missing rate averages:".bright_yellow(),
            gaps
        );
    }
    println!();
    for state in states {
        println!("    {}", state);
    }
}

fn print_trend(table: &TidyTable, selection: &Selection) {
    println!(
        "{}",
        format!(
            "Unemployment Rate and WPR in {} ({}-{})",
            selection.state, selection.from_year, selection.to_year
        )
        .bright_green()
        .bold()
    );

    let rows = table.filter(&selection.state, selection.from_year..=selection.to_year);
    if rows.is_empty() {
        println!("  {}", "No rows in the selected range".bright_yellow());
        return;
    }

    println!(
        "  {:<6} {:>18} {:>8}",
        "Year".bright_cyan(),
        "UnemploymentRate".bright_cyan(),
        "WPR".bright_cyan()
    );
    for row in rows {
        println!(
            "  {:<6} {:>18} {:>8}",
            row.year,
            format_value(row.unemployment_rate, 2),
            format_value(row.wpr, 2)
        );
    }
}

fn print_comparison(table: &TidyTable, year: i32) {
    println!(
        "{}",
        format!("Unemployment Rate by State ({})", year)
            .bright_green()
            .bold()
    );

    let rows = table.comparison(year);
    if rows.is_empty() {
        println!("  {}", format!("No rows for {}", year).bright_yellow());
        return;
    }

    let width = rows.iter().map(|row| row.state.len()).max().unwrap_or(5);
    for row in rows {
        println!(
            "  {:<width$} {:>8}",
            row.state,
            format_value(row.unemployment_rate, 2),
            width = width
        );
    }
}

fn print_heatmap(table: &TidyTable) {
    println!(
        "{}",
        "Unemployment Rate Heatmap (States vs Years)"
            .bright_green()
            .bold()
    );

    let heatmap = table.heatmap();
    let width = heatmap
        .states
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(5);

    let header: String = heatmap
        .years
        .iter()
        .map(|year| format!(" {:>7}", year))
        .collect();
    println!("  {:<width$}{}", "", header.bright_cyan(), width = width);

    for (state, values) in heatmap.states.iter().zip(&heatmap.values) {
        let cells: String = values
            .iter()
            .map(|value| format!(" {:>7}", format_value(*value, 2)))
            .collect();
        println!("  {:<width$}{}", state, cells, width = width);
    }
}

fn print_share(table: &TidyTable, selection: &Selection) {
    let year = selection.to_year;
    println!(
        "{}",
        format!("Urban vs Rural Employment in {} ({})", selection.state, year)
            .bright_green()
            .bold()
    );

    let Some(share) = table.employment_share(&selection.state, year) else {
        println!(
            "  {}",
            format!("No employment data for {} in {}.", selection.state, year).bright_yellow()
        );
        return;
    };

    println!(
        "  {} {}",
        "Rural Employment:".bright_cyan(),
        format_count(share.rural)
    );
    println!(
        "  {} {}",
        "Urban Employment:".bright_cyan(),
        format_count(share.urban)
    );
    if let Some(fraction) = share.rural_fraction() {
        println!(
            "  {} {:.1}% rural / {:.1}% urban",
            "Share:".bright_cyan(),
            fraction * 100.0,
            (1.0 - fraction) * 100.0
        );
    }
}
