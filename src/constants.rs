//! Application constants for the unemployment ETL
//!
//! Column names of the raw survey and tidy schemas, stratification labels,
//! and the default paths used when no configuration is supplied.

// =============================================================================
// Raw Survey Schema
// =============================================================================

/// Column names of the raw survey file (after header whitespace is trimmed)
pub mod raw_columns {
    pub const REGION: &str = "Region";
    pub const DATE: &str = "Date";
    pub const AREA: &str = "Area";
    pub const UNEMPLOYMENT_RATE: &str = "Estimated Unemployment Rate (%)";
    pub const LABOUR_PARTICIPATION_RATE: &str = "Estimated Labour Participation Rate (%)";
    pub const EMPLOYED: &str = "Estimated Employed";

    /// Every column the loader refuses to run without, in report order
    pub const REQUIRED: &[&str] = &[
        REGION,
        DATE,
        AREA,
        UNEMPLOYMENT_RATE,
        LABOUR_PARTICIPATION_RATE,
        EMPLOYED,
    ];
}

// =============================================================================
// Tidy Output Schema
// =============================================================================

/// Column names of the tidy per-state/year table
pub mod tidy_columns {
    pub const STATE: &str = "State";
    pub const YEAR: &str = "Year";
    pub const UNEMPLOYMENT_RATE: &str = "UnemploymentRate";
    pub const WPR: &str = "WPR";
    pub const RURAL_EMPLOYMENT: &str = "RuralEmployment";
    pub const URBAN_EMPLOYMENT: &str = "UrbanEmployment";

    /// Output column order
    pub const ALL: &[&str] = &[
        STATE,
        YEAR,
        UNEMPLOYMENT_RATE,
        WPR,
        RURAL_EMPLOYMENT,
        URBAN_EMPLOYMENT,
    ];
}

// =============================================================================
// Survey Stratification
// =============================================================================

pub const AREA_RURAL: &str = "Rural";
pub const AREA_URBAN: &str = "Urban";
pub const AREA_TOTAL: &str = "Total";

/// Strict day-month-year format of the raw `Date` column
pub const SURVEY_DATE_FORMAT: &str = "%d-%m-%Y";

// =============================================================================
// Default Paths
// =============================================================================

pub const DEFAULT_INPUT_PATH: &str = "data/raw/Unemployment in India.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/state_data.csv";

pub const DEFAULT_DELIMITER: u8 = b',';
