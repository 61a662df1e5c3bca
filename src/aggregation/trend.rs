//! Long-term trend: vehicles counted per calendar month.

use crate::aggregation::{PartitionResult, SkippedPartition};
use crate::datastore::extractor::RecordTable;
use crate::preparation::coerce::{number, parse_date, required_text};
use crate::preparation::error::PrepareError;
use crate::query::columns::{COL_MONTH, COL_VEHICLE_COUNT};
use chrono::{Datelike, NaiveDate};
use log::warn;
use polars::prelude::*;
use std::collections::BTreeMap;

pub const TREND_MONTH: &str = "month";
pub const TREND_VEHICLE_COUNT: &str = "vehicle_count";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub vehicle_count: f64,
}

/// Monthly totals of all partitions that answered, ordered by month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTrend {
    pub months: Vec<MonthlyTotal>,
    pub skipped: Vec<SkippedPartition>,
}

impl MonthlyTrend {
    /// Merges per-partition totals. A month reported by more than one
    /// partition is summed.
    pub fn combine(results: impl IntoIterator<Item = PartitionResult<Vec<MonthlyTotal>>>) -> Self {
        let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(totals) => {
                    for total in totals {
                        *by_month.entry(total.month).or_default() += total.vehicle_count;
                    }
                }
                Err(skip) => {
                    warn!("Skipping partition for monthly trend: {}", skip);
                    skipped.push(skip);
                }
            }
        }
        Self {
            months: by_month
                .into_iter()
                .map(|(month, vehicle_count)| MonthlyTotal {
                    month,
                    vehicle_count,
                })
                .collect(),
            skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// `month` (date) and `vehicle_count` (f64) columns.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        df!(
            TREND_MONTH => self.months.iter().map(|m| m.month).collect::<Vec<_>>(),
            TREND_VEHICLE_COUNT => self.months.iter().map(|m| m.vehicle_count).collect::<Vec<_>>()
        )
    }
}

/// Reads one partition's `monat`/`AnzFahrzeuge` rows.
pub fn monthly_from_table(table: &RecordTable) -> Result<Vec<MonthlyTotal>, PrepareError> {
    (0..table.len())
        .map(|row| {
            let raw = required_text(table, row, COL_MONTH)?;
            let month = parse_date(&raw)
                .and_then(|d| d.with_day(1))
                .ok_or_else(|| PrepareError::TimestampParse {
                    row,
                    value: raw.clone(),
                })?;
            Ok(MonthlyTotal {
                month,
                vehicle_count: number(table, row, COL_VEHICLE_COUNT)?,
            })
        })
        .collect()
}
