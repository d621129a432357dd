//! Raw survey loading and cleaning
//!
//! Reads the raw file with Polars as an all-string frame, trims the header,
//! checks the required columns and normalizes every row. Rows with a missing
//! region or an unparseable date are dropped and counted; everything else is
//! kept.

use crate::config::PipelineConfig;
use crate::constants::raw_columns;
use crate::error::{PipelineError, Result};
use crate::models::{NormalizedRecord, ProcessingStats, RawRecord};

use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load the raw survey file and return its cleaned records.
///
/// Fails before producing anything when the file is missing, is not a
/// readable table, or lacks one of the required columns.
pub fn load_and_clean(
    config: &PipelineConfig,
    stats: &mut ProcessingStats,
) -> Result<Vec<NormalizedRecord>> {
    let path = config.input_path.as_path();
    let frame = read_string_frame(path, config.delimiter)?;
    require_columns(&frame, path, raw_columns::REQUIRED)?;

    let regions = string_values(&frame, raw_columns::REGION)?;
    let dates = string_values(&frame, raw_columns::DATE)?;
    let areas = string_values(&frame, raw_columns::AREA)?;
    let unemployment = string_values(&frame, raw_columns::UNEMPLOYMENT_RATE)?;
    let participation = string_values(&frame, raw_columns::LABOUR_PARTICIPATION_RATE)?;
    let employed = string_values(&frame, raw_columns::EMPLOYED)?;

    stats.rows_read = frame.height();
    let mut records = Vec::with_capacity(frame.height());

    for row in 0..frame.height() {
        let raw = RawRecord {
            region: regions[row],
            date: dates[row],
            area: areas[row],
            unemployment_rate: unemployment[row],
            labour_participation_rate: participation[row],
            employed: employed[row],
        };

        match raw.normalize(&config.date_format, &config.default_area) {
            Ok(record) => records.push(record),
            Err(rejection) => {
                // +2: one for the header line, one for 1-based numbering
                debug!("Dropping row {} of {}: {}", row + 2, path.display(), rejection);
                stats.record_rejection(&rejection);
            }
        }
    }

    stats.records_kept = records.len();

    if stats.rows_dropped() > 0 {
        warn!(
            "Dropped {} of {} rows ({} missing region, {} unparseable date)",
            stats.rows_dropped(),
            stats.rows_read,
            stats.rows_missing_region,
            stats.rows_unparseable_date
        );
    }
    info!(
        "Loaded {} clean records from {}",
        records.len(),
        path.display()
    );

    Ok(records)
}

/// Read a delimited file with every column as a string and trimmed headers
pub(crate) fn read_string_frame(path: &Path, delimiter: u8) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading {} as an all-string table", path.display());

    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_separator(delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| PipelineError::InvalidInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let trimmed: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    frame
        .set_column_names(trimmed.iter().map(String::as_str))
        .map_err(|e| PipelineError::InvalidInput {
            path: path.to_path_buf(),
            reason: format!("header cannot be normalized: {}", e),
        })?;

    Ok(frame)
}

/// Fail with the first required column the frame does not have
pub(crate) fn require_columns(frame: &DataFrame, path: &Path, required: &[&str]) -> Result<()> {
    let present: Vec<&str> = frame
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();

    match required.iter().find(|column| !present.contains(column)) {
        Some(column) => Err(PipelineError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

/// Borrow one string column as a vector of optional values
pub(crate) fn string_values<'a>(frame: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>> {
    Ok(frame.column(name)?.str()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Area;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "Region, Date, Frequency, Estimated Unemployment Rate (%), Estimated Employed, Estimated Labour Participation Rate (%), Area";

    fn write_input(temp_dir: &TempDir, body: &str) -> PipelineConfig {
        let input = temp_dir.path().join("raw.csv");
        fs::write(&input, format!("{}\n{}", HEADER, body)).unwrap();
        PipelineConfig::new(input, temp_dir.path().join("out").join("state_data.csv"))
    }

    #[test]
    fn test_load_trims_headers_and_values() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_input(
            &temp_dir,
            "Andhra Pradesh, 31-05-2019, Monthly, 3.65, 11999139.0, 43.24, Rural\n",
        );
        let mut stats = ProcessingStats::default();

        let records = load_and_clean(&config, &mut stats).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.state, "Andhra Pradesh");
        assert_eq!(record.year, 2019);
        assert_eq!(record.area, Area::Rural);
        assert_eq!(record.unemployment_rate, Some(3.65));
        assert_eq!(record.employed, Some(11_999_139.0));
        assert_eq!(record.labour_participation_rate, Some(43.24));
        assert_eq!(stats.rows_read, 1);
        assert_eq!(stats.records_kept, 1);
    }

    #[test]
    fn test_load_drops_bad_rows_and_counts_them() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_input(
            &temp_dir,
            "Bihar, 01-01-2020, Monthly, 10.0, 100, 40.0, Rural\n\
             , 01-01-2020, Monthly, 11.0, 100, 40.0, Rural\n\
             Bihar, not-a-date, Monthly, 12.0, 100, 40.0, Urban\n\
             Bihar, 2020-06-15, Monthly, 13.0, 100, 40.0, Urban\n\
             Bihar, 15-06-2020, Monthly, 20.0, 200, 50.0,\n",
        );
        let mut stats = ProcessingStats::default();

        let records = load_and_clean(&config, &mut stats).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].area, Area::Total);
        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.rows_missing_region, 1);
        assert_eq!(stats.rows_unparseable_date, 2);
        assert_eq!(stats.records_kept, 2);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("raw.csv");
        fs::write(
            &input,
            "Notes,Region,Date,Area,Estimated Unemployment Rate (%),Estimated Labour Participation Rate (%),Estimated Employed\n\
             first,Goa,31-12-2020,Urban,5.5,38.1,150000\n",
        )
        .unwrap();
        let config = PipelineConfig::new(input, temp_dir.path().join("out.csv"));
        let mut stats = ProcessingStats::default();

        let records = load_and_clean(&config, &mut stats).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, "Goa");
        assert_eq!(records[0].labour_participation_rate, Some(38.1));
    }

    #[test]
    fn test_missing_column_is_named() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("raw.csv");
        fs::write(
            &input,
            "Region, Date, Estimated Unemployment Rate (%), Estimated Employed, Estimated Labour Participation Rate (%)\n\
             Bihar, 01-01-2020, 10.0, 100, 40.0\n",
        )
        .unwrap();
        let config = PipelineConfig::new(input.clone(), temp_dir.path().join("out.csv"));

        let result = load_and_clean(&config, &mut ProcessingStats::default());

        match result.unwrap_err() {
            PipelineError::MissingColumn { path, column } => {
                assert_eq!(path, input);
                assert_eq!(column, "Area");
            }
            other => panic!("Expected MissingColumn error, got {:?}", other),
        }
    }

    #[test]
    fn test_nonexistent_input() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.csv");
        let config = PipelineConfig::new(missing.clone(), temp_dir.path().join("out.csv"));

        match load_and_clean(&config, &mut ProcessingStats::default()).unwrap_err() {
            PipelineError::InputNotFound { path } => assert_eq!(path, missing),
            other => panic!("Expected InputNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_semicolon_delimited_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("raw.csv");
        fs::write(
            &input,
            "Region;Date;Area;Estimated Unemployment Rate (%);Estimated Labour Participation Rate (%);Estimated Employed\n\
             Punjab;30-04-2020;Urban;2,5;40.0;100\n",
        )
        .unwrap();
        let config = PipelineConfig::new(input, temp_dir.path().join("out.csv")).with_delimiter(b';');

        let records = load_and_clean(&config, &mut ProcessingStats::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, "Punjab");
        // "2,5" is not a decimal under the '.' convention
        assert_eq!(records[0].unemployment_rate, None);
    }
}
