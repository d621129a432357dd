//! Integration tests for the pipeline module
//!
//! Exercise the complete transform on small raw survey files written to a
//! temporary directory.


use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) const RAW_HEADER: &str = "Region, Date, Frequency, Estimated Unemployment Rate (%), Estimated Employed, Estimated Labour Participation Rate (%), Area";

/// Write a raw survey file with the standard header and return
/// (input, output) paths inside `temp_dir`
pub(crate) fn create_raw_survey(temp_dir: &TempDir, rows: &[&str]) -> (PathBuf, PathBuf) {
    let input_path = temp_dir.path().join("raw").join("survey.csv");
    fs::create_dir_all(input_path.parent().unwrap()).unwrap();

    let mut content = String::from(RAW_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&input_path, content).unwrap();

    let output_path = temp_dir.path().join("processed").join("state_data.csv");
    (input_path, output_path)
}
