//! Pivot-and-derive stage
//!
//! Reads the Rural and Urban slices of the aggregate map for every
//! (State, Year) and builds one [`TidyRow`] from them. Total-area groups,
//! and any other area label, are never consulted.

use super::aggregate::AggregateMap;
use crate::models::{AggregateGroup, Area, GroupKey, TidyRow};
use std::collections::BTreeSet;
use tracing::debug;

/// Average of the Rural and Urban values; missing unless both are present.
///
/// This is a plain two-value mean, not weighted by record counts.
pub fn rural_urban_average(rural: Option<f64>, urban: Option<f64>) -> Option<f64> {
    match (rural, urban) {
        (Some(rural), Some(urban)) => Some((rural + urban) / 2.0),
        _ => None,
    }
}

/// Build one tidy row per (State, Year) present in `groups`, sorted by
/// State then Year.
pub fn pivot_and_derive(groups: &AggregateMap) -> Vec<TidyRow> {
    let state_years: BTreeSet<(&str, i32)> = groups
        .keys()
        .map(|key| (key.state.as_str(), key.year))
        .collect();

    let rows: Vec<TidyRow> = state_years
        .into_iter()
        .map(|(state, year)| {
            let rural = slice(groups, state, year, Area::Rural);
            let urban = slice(groups, state, year, Area::Urban);
            derive_row(state, year, rural, urban)
        })
        .collect();

    debug!(
        "Derived {} tidy rows from {} groups",
        rows.len(),
        groups.len()
    );
    rows
}

fn slice<'a>(groups: &'a AggregateMap, state: &str, year: i32, area: Area) -> Option<&'a AggregateGroup> {
    groups.get(&GroupKey::new(state, year, area))
}

fn derive_row(
    state: &str,
    year: i32,
    rural: Option<&AggregateGroup>,
    urban: Option<&AggregateGroup>,
) -> TidyRow {
    TidyRow {
        state: state.to_string(),
        year,
        unemployment_rate: rural_urban_average(
            rural.and_then(|g| g.unemployment_rate),
            urban.and_then(|g| g.unemployment_rate),
        ),
        wpr: rural_urban_average(
            rural.and_then(|g| g.labour_participation_rate),
            urban.and_then(|g| g.labour_participation_rate),
        ),
        rural_employment: rural.and_then(|g| g.employed),
        urban_employment: urban.and_then(|g| g.employed),
    }
}
