//! Shared components for CLI commands
//!
//! Logging setup, progress spinners and number formatting used by more than
//! one command.

use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Set up structured logging at the given level
///
/// `RUST_LOG` takes precedence over the level derived from CLI flags.
pub fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("unemployment_etl={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Create a spinner for a single batch stage, or a hidden one when quiet
pub fn create_spinner(visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Format an optional decimal for a text table, with `-` for missing
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{:.*}", decimals, value),
        None => "-".to_string(),
    }
}

/// Format a large count with thousands separators
pub fn format_count(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(15.0), 2), "15.00");
        assert_eq!(format_value(Some(3.14159), 1), "3.1");
        assert_eq!(format_value(None, 2), "-");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(Some(11_999_139.0)), "11,999,139");
        assert_eq!(format_count(Some(999.0)), "999");
        assert_eq!(format_count(Some(1000.4)), "1,000");
        assert_eq!(format_count(Some(-12345.0)), "-12,345");
        assert_eq!(format_count(None), "-");
    }

    #[test]
    fn test_hidden_spinner_when_quiet() {
        let spinner = create_spinner(false).unwrap();
        assert!(spinner.is_hidden());
    }
}
