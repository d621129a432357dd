//! Group-and-aggregate stage
//!
//! Collapses normalized records sharing a (State, Year, Area) key into one
//! [`AggregateGroup`] holding the arithmetic mean of each measurement. The
//! result is a `BTreeMap`, so iteration is always in (State, Year, Area)
//! order regardless of input order.

use crate::models::{AggregateGroup, GroupKey, NormalizedRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Keyed mapping produced by [`aggregate`]
pub type AggregateMap = BTreeMap<GroupKey, AggregateGroup>;

/// Running mean that ignores missing values
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    unemployment_rate: MeanAccumulator,
    labour_participation_rate: MeanAccumulator,
    employed: MeanAccumulator,
    records: usize,
}

impl GroupAccumulator {
    fn push(&mut self, record: &NormalizedRecord) {
        self.unemployment_rate.push(record.unemployment_rate);
        self.labour_participation_rate
            .push(record.labour_participation_rate);
        self.employed.push(record.employed);
        self.records += 1;
    }

    fn finish(&self) -> AggregateGroup {
        AggregateGroup {
            unemployment_rate: self.unemployment_rate.mean(),
            labour_participation_rate: self.labour_participation_rate.mean(),
            employed: self.employed.mean(),
            record_count: self.records,
        }
    }
}

/// Group records by (State, Year, Area) and average their measurements
pub fn aggregate(records: &[NormalizedRecord]) -> AggregateMap {
    let mut accumulators: BTreeMap<GroupKey, GroupAccumulator> = BTreeMap::new();

    for record in records {
        accumulators
            .entry(record.group_key())
            .or_default()
            .push(record);
    }

    let groups: AggregateMap = accumulators
        .into_iter()
        .map(|(key, accumulator)| {
            let group = accumulator.finish();
            debug!(
                "Group {} {} {}: {} records",
                key.state, key.year, key.area, group.record_count
            );
            (key, group)
        })
        .collect();

    debug!(
        "Aggregated {} records into {} groups",
        records.len(),
        groups.len()
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Area;
    use chrono::NaiveDate;

    fn record(state: &str, day: u32, month: u32, year: i32, area: Area, rate: Option<f64>) -> NormalizedRecord {
        NormalizedRecord {
            state: state.to_string(),
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            year,
            area,
            unemployment_rate: rate,
            labour_participation_rate: Some(40.0),
            employed: Some(1000.0),
        }
    }

    #[test]
    fn test_duplicate_periods_are_averaged() {
        let records = vec![
            record("Bihar", 31, 1, 2020, Area::Rural, Some(10.0)),
            record("Bihar", 29, 2, 2020, Area::Rural, Some(20.0)),
        ];

        let groups = aggregate(&records);

        assert_eq!(groups.len(), 1);
        let group = &groups[&GroupKey::new("Bihar", 2020, Area::Rural)];
        assert_eq!(group.unemployment_rate, Some(15.0));
        assert_eq!(group.labour_participation_rate, Some(40.0));
        assert_eq!(group.employed, Some(1000.0));
        assert_eq!(group.record_count, 2);
    }

    #[test]
    fn test_missing_values_are_skipped_in_mean() {
        let records = vec![
            record("Goa", 31, 1, 2020, Area::Urban, Some(6.0)),
            record("Goa", 29, 2, 2020, Area::Urban, None),
            record("Goa", 31, 3, 2020, Area::Urban, Some(9.0)),
        ];

        let groups = aggregate(&records);
        let group = &groups[&GroupKey::new("Goa", 2020, Area::Urban)];

        assert_eq!(group.unemployment_rate, Some(7.5));
        assert_eq!(group.record_count, 3);
    }

    #[test]
    fn test_all_missing_gives_missing_mean() {
        let records = vec![record("Goa", 31, 1, 2020, Area::Urban, None)];

        let groups = aggregate(&records);

        assert_eq!(
            groups[&GroupKey::new("Goa", 2020, Area::Urban)].unemployment_rate,
            None
        );
    }

    #[test]
    fn test_groups_are_sorted_regardless_of_input_order() {
        let records = vec![
            record("Kerala", 31, 5, 2020, Area::Urban, Some(1.0)),
            record("Assam", 31, 5, 2021, Area::Total, Some(2.0)),
            record("Kerala", 31, 5, 2019, Area::Rural, Some(3.0)),
            record("Assam", 31, 5, 2021, Area::Rural, Some(4.0)),
        ];

        let keys: Vec<GroupKey> = aggregate(&records).into_keys().collect();

        assert_eq!(
            keys,
            vec![
                GroupKey::new("Assam", 2021, Area::Rural),
                GroupKey::new("Assam", 2021, Area::Total),
                GroupKey::new("Kerala", 2019, Area::Rural),
                GroupKey::new("Kerala", 2020, Area::Urban),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
