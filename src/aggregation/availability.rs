//! Dates with data, used to bound the date picker.

use crate::aggregation::{PartitionResult, SkippedPartition};
use crate::datastore::extractor::RecordTable;
use crate::error::TrafficError;
use crate::preparation::coerce::{parse_date, text};
use crate::preparation::error::PrepareError;
use crate::query::columns::{COL_DATE, COL_DATE_MAX, COL_DATE_MIN};
use chrono::NaiveDate;
use log::warn;

/// Which per-partition query feeds the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateQueryMode {
    /// One `MIN`/`MAX` row per partition.
    #[default]
    Bounds,
    /// Every distinct date of every partition.
    Distinct,
}

/// Dates with traffic counts across all partitions that answered.
///
/// `dates` is the sorted, de-duplicated union of what the partitions
/// returned: every date in [`DateQueryMode::Distinct`], the per-partition
/// first and last date in [`DateQueryMode::Bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableDates {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub skipped: Vec<SkippedPartition>,
}

impl AvailableDates {
    /// Combines per-partition results. Returns `Err` with every skipped
    /// partition when no partition contributed a date.
    pub fn combine(
        results: impl IntoIterator<Item = PartitionResult<Vec<NaiveDate>>>,
    ) -> Result<Self, Vec<SkippedPartition>> {
        let mut dates = Vec::new();
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(partition_dates) => dates.extend(partition_dates),
                Err(skip) => {
                    warn!("Skipping partition for available dates: {}", skip);
                    skipped.push(skip);
                }
            }
        }
        dates.sort_unstable();
        dates.dedup();

        match (dates.first().copied(), dates.last().copied()) {
            (Some(min), Some(max)) => Ok(Self {
                min,
                max,
                dates,
                skipped,
            }),
            _ => Err(skipped),
        }
    }

    /// Whether `date` lies within the overall bounds.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Default selection of the date picker.
    pub fn latest(&self) -> NaiveDate {
        self.max
    }

    /// The date a picker bounded by these dates settles on: `requested` if
    /// it lies within the bounds, the latest date if nothing was requested.
    pub fn select(&self, requested: Option<NaiveDate>) -> Result<NaiveDate, TrafficError> {
        match requested {
            None => Ok(self.latest()),
            Some(date) if self.contains(date) => Ok(date),
            Some(date) => Err(TrafficError::DateOutOfRange {
                date,
                min: self.min,
                max: self.max,
            }),
        }
    }
}

/// Reads the dates out of one partition's date query result. Null bounds
/// (an empty partition) contribute nothing.
pub fn dates_from_table(
    table: &RecordTable,
    mode: DateQueryMode,
) -> Result<Vec<NaiveDate>, PrepareError> {
    let columns: &[&str] = match mode {
        DateQueryMode::Bounds => &[COL_DATE_MIN, COL_DATE_MAX],
        DateQueryMode::Distinct => &[COL_DATE],
    };

    let mut dates = Vec::with_capacity(table.len() * columns.len());
    for row in 0..table.len() {
        for column in columns {
            if let Some(raw) = text(table, row, column) {
                let date = parse_date(&raw).ok_or_else(|| PrepareError::TimestampParse {
                    row,
                    value: raw.clone(),
                })?;
                dates.push(date);
            }
        }
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::extractor::extract_records;
    use crate::types::partition::Partition;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_bounds_rows_are_read() {
        let table = extract_records(&json!({"result": {"records": [
            {"datum_min": "2021-01-01", "datum_max": "2021-12-31"}
        ]}}))
        .unwrap();
        let dates = dates_from_table(&table, DateQueryMode::Bounds).unwrap();
        assert_eq!(dates, vec![d(2021, 1, 1), d(2021, 12, 31)]);
    }

    #[test]
    fn test_null_bounds_contribute_nothing() {
        let table = extract_records(&json!({"result": {"records": [
            {"datum_min": null, "datum_max": null}
        ]}}))
        .unwrap();
        assert!(dates_from_table(&table, DateQueryMode::Bounds)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_distinct_rows_accept_timestamps() {
        let table = extract_records(&json!({"result": {"records": [
            {"datum": "2022-03-02T00:00:00"},
            {"datum": "2022-03-01"}
        ]}}))
        .unwrap();
        let dates = dates_from_table(&table, DateQueryMode::Distinct).unwrap();
        assert_eq!(dates, vec![d(2022, 3, 2), d(2022, 3, 1)]);
    }

    #[test]
    fn test_garbage_date_is_an_error() {
        let table = extract_records(&json!({"result": {"records": [{"datum": "Montag"}]}})).unwrap();
        assert!(dates_from_table(&table, DateQueryMode::Distinct).is_err());
    }

    #[test]
    fn test_failed_partition_is_skipped_not_fatal() {
        let p2022 = Partition::new(2022, "bc2d7c35-de13-45e9-be21-538d9eab3653");
        let available = AvailableDates::combine(vec![
            Ok(vec![d(2021, 1, 1), d(2021, 12, 31)]),
            Err(SkippedPartition::new(&p2022, "no such table")),
        ])
        .unwrap();

        assert_eq!(available.min, d(2021, 1, 1));
        assert_eq!(available.max, d(2021, 12, 31));
        assert_eq!(available.skipped.len(), 1);
        assert_eq!(available.skipped[0].year, 2022);
        assert!(available.contains(d(2021, 6, 1)));
        assert!(!available.contains(d(2022, 6, 1)));
    }

    #[test]
    fn test_select_is_bounded_by_available_dates() {
        let available =
            AvailableDates::combine(vec![Ok(vec![d(2021, 1, 1), d(2022, 6, 30)])]).unwrap();

        assert_eq!(available.select(None).unwrap(), d(2022, 6, 30));
        assert_eq!(available.select(Some(d(2021, 1, 1))).unwrap(), d(2021, 1, 1));
        match available.select(Some(d(2023, 1, 1))) {
            Err(TrafficError::DateOutOfRange { date, min, max }) => {
                assert_eq!(date, d(2023, 1, 1));
                assert_eq!((min, max), (d(2021, 1, 1), d(2022, 6, 30)));
            }
            other => panic!("expected DateOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        let available = AvailableDates::combine(vec![
            Ok(vec![d(2023, 5, 2), d(2023, 5, 1)]),
            Ok(vec![d(2023, 5, 1), d(2022, 1, 1)]),
        ])
        .unwrap();
        assert_eq!(
            available.dates,
            vec![d(2022, 1, 1), d(2023, 5, 1), d(2023, 5, 2)]
        );
        assert_eq!(available.latest(), d(2023, 5, 2));
    }

    #[test]
    fn test_all_failed_returns_every_skip() {
        let p = Partition::new(2021, "x");
        let skipped = AvailableDates::combine(vec![
            Err(SkippedPartition::new(&p, "a")),
            Err(SkippedPartition::new(&p, "b")),
        ])
        .unwrap_err();
        assert_eq!(skipped.len(), 2);
    }
}
