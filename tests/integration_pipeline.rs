//! Integration tests for the transform pipeline through the public API
//!
//! A realistic excerpt of the raw survey (padded headers and values, a
//! blank trailing record, several months per year) is transformed end to end
//! and the tidy table is read back the way the dashboard reads it.

use chrono::Datelike;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use unemployment_etl::{
    Area, PipelineConfig, PipelineError, TidyTable, TransformPipeline, aggregate, load_and_clean,
    pivot_and_derive, run_pipeline,
};

const RAW_SURVEY: &str = "\
Region, Date, Frequency, Estimated Unemployment Rate (%), Estimated Employed, Estimated Labour Participation Rate (%), Area
Andhra Pradesh, 31-05-2019, Monthly, 3.65, 11999139.0, 43.24, Rural
Andhra Pradesh, 30-06-2019, Monthly, 3.05, 11755881.0, 42.05, Rural
Andhra Pradesh, 31-05-2019, Monthly, 6.09, 4788661.0, 38.92, Urban
Andhra Pradesh, 30-06-2019, Monthly, 4.29, 4884545.0, 37.84, Urban
Andhra Pradesh, 31-05-2020, Monthly, 14.46, 9526902.0, 38.36, Rural
Andhra Pradesh, 31-05-2020, Monthly, 29.22, 3356178.0, 34.14, Urban
Assam, 31-05-2019, Monthly, 4.29, 10284166.0, 47.82, Rural
Assam, 30-06-2019, Monthly, 5.41, 9920808.0, 46.21, Total
Chandigarh, 31-05-2019, Monthly, 21.06, 293223.0, 38.35, Urban
, , , , , ,
Bihar, 2019-05-31, Monthly, 10.0, 100.0, 40.0, Rural
";

fn write_survey(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let input = temp_dir.path().join("raw").join("Unemployment in India.csv");
    fs::create_dir_all(input.parent().unwrap()).unwrap();
    fs::write(&input, RAW_SURVEY).unwrap();
    let output = temp_dir.path().join("processed").join("state_data.csv");
    (input, output)
}

fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-9)
}

#[test]
fn test_end_to_end_transform() {
    let temp_dir = TempDir::new().unwrap();
    let (input, output) = write_survey(&temp_dir);

    let stats = run_pipeline(&input, &output).unwrap();

    assert_eq!(stats.rows_read, 11);
    assert_eq!(stats.rows_missing_region, 1);
    assert_eq!(stats.rows_unparseable_date, 1);
    assert_eq!(stats.records_kept, 9);
    assert_eq!(stats.tidy_rows, 4);
    assert_eq!(stats.rows_with_gaps, 2);

    let table = TidyTable::load(&output).unwrap();
    assert_eq!(table.states(), vec!["Andhra Pradesh", "Assam", "Chandigarh"]);
    assert_eq!(table.year_range(), Some((2019, 2020)));

    let ap_2019 = table.filter("Andhra Pradesh", 2019..=2019)[0];
    let rural_rate = (3.65 + 3.05) / 2.0;
    let urban_rate = (6.09 + 4.29) / 2.0;
    assert!(approx(ap_2019.unemployment_rate, (rural_rate + urban_rate) / 2.0));
    assert!(approx(ap_2019.wpr, ((43.24 + 42.05) / 2.0 + (38.92 + 37.84) / 2.0) / 2.0));
    assert!(approx(ap_2019.rural_employment, (11_999_139.0 + 11_755_881.0) / 2.0));
    assert!(approx(ap_2019.urban_employment, (4_788_661.0 + 4_884_545.0) / 2.0));

    let assam = table.filter("Assam", 2019..=2020)[0];
    assert_eq!(assam.unemployment_rate, None);
    assert_eq!(assam.wpr, None);
    assert_eq!(assam.rural_employment, Some(10_284_166.0));
    assert_eq!(assam.urban_employment, None);

    let chandigarh = table.filter("Chandigarh", 2019..=2019)[0];
    assert_eq!(chandigarh.rural_employment, None);
    assert_eq!(chandigarh.urban_employment, Some(293_223.0));
}

#[test]
fn test_stages_compose_like_the_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let (input, output) = write_survey(&temp_dir);
    let config = PipelineConfig::new(&input, &output);

    let mut stats = Default::default();
    let records = load_and_clean(&config, &mut stats).unwrap();
    for record in &records {
        assert_eq!(record.year, record.date.year());
        assert!(!record.state.is_empty());
    }

    let groups = aggregate(&records);
    assert!(groups.keys().any(|key| key.area == Area::Total));

    let staged = pivot_and_derive(&groups);
    let (piped, _) = TransformPipeline::new(config).transform_only().unwrap();
    assert_eq!(staged, piped);
}

#[test]
fn test_output_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let (input, output) = write_survey(&temp_dir);

    run_pipeline(&input, &output).unwrap();
    let first = fs::read(&output).unwrap();
    run_pipeline(&input, &output).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    assert!(text.starts_with("State,Year,UnemploymentRate,WPR,RuralEmployment,UrbanEmployment\n"));
}

#[test]
fn test_heatmap_covers_every_state_year() {
    let temp_dir = TempDir::new().unwrap();
    let (input, output) = write_survey(&temp_dir);
    run_pipeline(&input, &output).unwrap();

    let heatmap = TidyTable::load(&output).unwrap().heatmap();

    assert_eq!(heatmap.years, vec![2019, 2020]);
    assert_eq!(heatmap.values.len(), heatmap.states.len());
    assert!(heatmap.values.iter().all(|row| row.len() == 2));
    assert!(heatmap.get("Andhra Pradesh", 2020).is_some());
    assert_eq!(heatmap.get("Chandigarh", 2020), None);
}

#[test]
fn test_missing_input_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.csv");

    let error = run_pipeline(&missing, &temp_dir.path().join("out.csv")).unwrap_err();

    assert!(matches!(error, PipelineError::InputNotFound { .. }));
    assert!(error.to_string().contains("nope.csv"));
}

#[test]
fn test_parquet_round_trip_matches_csv() {
    let temp_dir = TempDir::new().unwrap();
    let (input, csv_output) = write_survey(&temp_dir);
    let parquet_output = temp_dir.path().join("processed").join("state_data.parquet");

    run_pipeline(&input, &csv_output).unwrap();
    run_pipeline(&input, &parquet_output).unwrap();

    let from_csv = TidyTable::load(&csv_output).unwrap();
    let from_parquet = TidyTable::load(&parquet_output).unwrap();
    assert_eq!(from_csv.states(), from_parquet.states());
    assert_eq!(from_csv.rows().len(), from_parquet.rows().len());
    for (a, b) in from_csv.rows().iter().zip(from_parquet.rows()) {
        assert_eq!(a.state, b.state);
        assert_eq!(a.year, b.year);
        assert_eq!(a.unemployment_rate.is_some(), b.unemployment_rate.is_some());
    }
}
