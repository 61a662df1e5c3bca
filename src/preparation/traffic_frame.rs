//! Contains [`TrafficFrame`], the prepared measurements of one query.

use crate::types::record::PreparedRecord;
use polars::prelude::*;

pub const FRAME_STATION: &str = "station_name";
pub const FRAME_DETECTION_POINT: &str = "detection_point_name";
pub const FRAME_EASTING_RAW: &str = "easting_raw";
pub const FRAME_NORTHING_RAW: &str = "northing_raw";
pub const FRAME_DIRECTION: &str = "direction";
pub const FRAME_STATUS: &str = "status_flag";
pub const FRAME_DISPLAY_TIME: &str = "measured_at_display";
pub const FRAME_MEASURED_AT: &str = "measured_at";
pub const FRAME_TIME_OF_DAY: &str = "time_of_day";
pub const FRAME_HOUR: &str = "hour";
pub const FRAME_EASTING: &str = "easting";
pub const FRAME_NORTHING: &str = "northing";
pub const FRAME_VEHICLE_COUNT: &str = "vehicle_count";
pub const FRAME_LATITUDE: &str = "latitude";
pub const FRAME_LONGITUDE: &str = "longitude";

/// Prepared measurement records, always ordered by `measured_at`.
///
/// Obtained from [`crate::prepare`] or [`crate::ZurichTraffic::day`]. The
/// records can be consumed directly or turned into a Polars `DataFrame` for
/// aggregation and charting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficFrame {
    records: Vec<PreparedRecord>,
}

impl TrafficFrame {
    /// Wraps `records`, sorting them by timestamp. The sort is stable.
    pub fn new(mut records: Vec<PreparedRecord>) -> Self {
        records.sort_by_key(|r| r.measured_at);
        Self { records }
    }

    pub fn records(&self) -> &[PreparedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PreparedRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merges frames of several partitions or days into one ordered frame.
    pub fn concat(frames: impl IntoIterator<Item = TrafficFrame>) -> Self {
        Self::new(frames.into_iter().flat_map(|f| f.records).collect())
    }

    /// Distinct `time_of_day` labels in chronological order; one animation
    /// frame of the map each.
    pub fn frames(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for record in &self.records {
            if !labels.contains(&record.time_of_day.as_str()) {
                labels.push(&record.time_of_day);
            }
        }
        labels
    }

    /// Total vehicles over all records.
    pub fn total_vehicles(&self) -> f64 {
        self.records.iter().map(|r| r.vehicle_count).sum()
    }

    /// All prepared columns as a `DataFrame`, one row per record.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let texts = |f: fn(&PreparedRecord) -> Option<String>| -> Vec<Option<String>> {
            self.records.iter().map(f).collect()
        };
        let floats = |f: fn(&PreparedRecord) -> f64| -> Vec<f64> {
            self.records.iter().map(f).collect()
        };

        df!(
            FRAME_STATION => texts(|r| r.station_name.clone()),
            FRAME_DETECTION_POINT => texts(|r| r.detection_point_name.clone()),
            FRAME_EASTING_RAW => texts(|r| r.easting_raw.clone()),
            FRAME_NORTHING_RAW => texts(|r| r.northing_raw.clone()),
            FRAME_DIRECTION => texts(|r| r.direction.clone()),
            FRAME_STATUS => texts(|r| r.status_flag.clone()),
            FRAME_DISPLAY_TIME => self.records.iter().map(|r| r.measured_at_display.clone()).collect::<Vec<_>>(),
            FRAME_MEASURED_AT => self.records.iter().map(|r| r.measured_at).collect::<Vec<_>>(),
            FRAME_TIME_OF_DAY => self.records.iter().map(|r| r.time_of_day.clone()).collect::<Vec<_>>(),
            FRAME_HOUR => self.records.iter().map(|r| r.hour).collect::<Vec<u32>>(),
            FRAME_EASTING => floats(|r| r.easting),
            FRAME_NORTHING => floats(|r| r.northing),
            FRAME_VEHICLE_COUNT => floats(|r| r.vehicle_count),
            FRAME_LATITUDE => floats(|r| r.latitude),
            FRAME_LONGITUDE => floats(|r| r.longitude)
        )
    }

    /// Sum of `vehicle_count` per `measured_at`, ordered by time.
    pub fn hourly_totals(&self) -> PolarsResult<DataFrame> {
        self.to_dataframe()?
            .lazy()
            .group_by([col(FRAME_MEASURED_AT)])
            .agg([col(FRAME_VEHICLE_COUNT).sum()])
            .sort([FRAME_MEASURED_AT], SortMultipleOptions::default())
            .collect()
    }
}
