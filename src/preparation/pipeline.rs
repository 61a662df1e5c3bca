//! Turns raw measurement rows into [`PreparedRecord`]s.
//!
//! Each step runs over the whole table before the next one starts: the
//! timestamps, then the numeric columns, then one batched coordinate
//! conversion over the easting/northing pair.

use crate::datastore::extractor::RecordTable;
use crate::preparation::coerce::{
    number, parse_float, parse_timestamp, required_text, strip_grid_prefix, text,
};
use crate::preparation::coordinates::ch_to_wgs_columns;
use crate::preparation::error::PrepareError;
use crate::preparation::traffic_frame::TrafficFrame;
use crate::query::columns::*;
use crate::types::record::PreparedRecord;
use chrono::{NaiveDateTime, Timelike};
use log::debug;

struct Timestamps {
    display: Vec<String>,
    parsed: Vec<NaiveDateTime>,
}

fn parse_timestamps(table: &RecordTable) -> Result<Timestamps, PrepareError> {
    let mut display = Vec::with_capacity(table.len());
    let mut parsed = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let raw = required_text(table, row, COL_MEASURED_AT)?;
        let ts = parse_timestamp(&raw)
            .ok_or_else(|| PrepareError::TimestampParse {
                row,
                value: raw.clone(),
            })?;
        display.push(raw);
        parsed.push(ts);
    }
    Ok(Timestamps { display, parsed })
}

/// Uses the server-stripped column when the query provided one and derives
/// it from the raw coordinate otherwise.
fn stripped_coordinate(
    table: &RecordTable,
    row: usize,
    strip_col: &str,
    raw_col: &str,
) -> Result<f64, PrepareError> {
    if table.value(row, strip_col).is_some() {
        return number(table, row, strip_col);
    }
    let stripped = strip_grid_prefix(&required_text(table, row, raw_col)?);
    parse_float(&stripped).ok_or(PrepareError::TypeCoercion {
        row,
        column: strip_col.to_string(),
        value: stripped,
    })
}

fn numeric_column(
    table: &RecordTable,
    read: impl Fn(usize) -> Result<f64, PrepareError>,
) -> Result<Vec<f64>, PrepareError> {
    (0..table.len()).map(read).collect()
}

/// Prepares a measurements table for presentation.
///
/// The output holds one record per input row, ordered by `measured_at`
/// (rows with equal timestamps keep their input order). The function is
/// pure: preparing the same table twice yields identical frames.
///
/// # Errors
///
/// * [`PrepareError::MissingField`] if a row lacks the timestamp, the
///   vehicle count or both coordinate columns.
/// * [`PrepareError::TimestampParse`] if `MessungDatZeit` is not a timestamp.
/// * [`PrepareError::TypeCoercion`] if a coordinate or the vehicle count is
///   not numeric.
pub fn prepare(table: &RecordTable) -> Result<TrafficFrame, PrepareError> {
    let Timestamps { display, parsed } = parse_timestamps(table)?;

    let eastings = numeric_column(table, |row| {
        stripped_coordinate(table, row, COL_EASTING_STRIP, COL_EASTING_RAW)
    })?;
    let northings = numeric_column(table, |row| {
        stripped_coordinate(table, row, COL_NORTHING_STRIP, COL_NORTHING_RAW)
    })?;
    let counts = numeric_column(table, |row| number(table, row, COL_VEHICLE_COUNT))?;

    let (latitudes, longitudes) = ch_to_wgs_columns(&eastings, &northings);

    let records: Vec<PreparedRecord> = display
        .into_iter()
        .zip(parsed)
        .enumerate()
        .map(|(row, (measured_at_display, measured_at))| PreparedRecord {
            station_name: text(table, row, COL_STATION),
            detection_point_name: text(table, row, COL_DETECTION_POINT),
            easting_raw: text(table, row, COL_EASTING_RAW),
            northing_raw: text(table, row, COL_NORTHING_RAW),
            direction: text(table, row, COL_DIRECTION),
            status_flag: text(table, row, COL_VEHICLE_STATUS),
            measured_at_display,
            time_of_day: measured_at.format("%H:%M:%S").to_string(),
            hour: measured_at.hour(),
            measured_at,
            easting: eastings[row],
            northing: northings[row],
            vehicle_count: counts[row],
            latitude: latitudes[row],
            longitude: longitudes[row],
        })
        .collect();

    debug!("Prepared {} measurement records", records.len());
    Ok(TrafficFrame::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::extractor::extract_records;
    use crate::preparation::coordinates::ch_to_wgs;
    use approx::assert_abs_diff_eq;
    use serde_json::{json, Value};

    fn table(records: Value) -> RecordTable {
        extract_records(&json!({"success": true, "result": {"records": records}})).unwrap()
    }

    fn measurement(time: &str, count: &str) -> Value {
        json!({
            "MSName": "Z001M001",
            "ZSName": "Seestrasse (Strandbad Wollishofen)",
            "EKoord": "2683000.000",
            "ekoord_strip": "683000.000",
            "NKoord": "1245000.000",
            "nkoord_strip": "245000.000",
            "Richtung": "auswärts",
            "AnzFahrzeuge": count,
            "AnzFahrzeugeStatus": "Gemessen",
            "MessungDatZeit": time
        })
    }

    #[test]
    fn test_raw_prefixed_record() {
        let frame = prepare(&table(json!([{
            "EKoord": "E2683000",
            "NKoord": "N1248000",
            "AnzFahrzeuge": "12",
            "MessungDatZeit": "2023-05-01T08:00:00"
        }])))
        .unwrap();

        let record = &frame.records()[0];
        assert_eq!(record.easting, 2683000.0);
        assert_eq!(record.northing, 1248000.0);
        assert_eq!(record.vehicle_count, 12.0);
        assert_eq!(record.hour, 8);
        assert_eq!(record.time_of_day, "08:00:00");
        assert_eq!(record.measured_at_display, "2023-05-01T08:00:00");
        assert_eq!(record.easting_raw.as_deref(), Some("E2683000"));
        assert!(record.station_name.is_none());

        let expected = ch_to_wgs(2683000.0, 1248000.0);
        assert_abs_diff_eq!(record.latitude, expected.0, epsilon = 1e-12);
        assert_abs_diff_eq!(record.longitude, expected.1, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_table_prepares_to_empty_frame() {
        let frame = prepare(&RecordTable::default()).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.to_dataframe().unwrap().height(), 0);
    }

    #[test]
    fn test_output_is_sorted_and_complete() {
        let frame = prepare(&table(json!([
            measurement("2023-05-01 10:00:00", "40"),
            measurement("2023-05-01 00:00:00", "3"),
            measurement("2023-05-01 23:00:00", "7"),
            measurement("2023-05-01 10:00:00", "41"),
        ])))
        .unwrap();

        assert_eq!(frame.len(), 4);
        let records = frame.records();
        assert!(records
            .windows(2)
            .all(|w| w[0].measured_at <= w[1].measured_at));
        // equal timestamps keep input order
        assert_eq!(records[1].vehicle_count, 40.0);
        assert_eq!(records[2].vehicle_count, 41.0);
        for record in records {
            assert!(record.hour <= 23);
            assert!(record.latitude > 47.0 && record.latitude < 48.0);
            assert!(record.longitude > 8.0 && record.longitude < 9.0);
        }
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let input = table(json!([
            measurement("2023-05-01 09:00:00", "5"),
            measurement("2023-05-01 08:00:00", "6"),
        ]));
        assert_eq!(prepare(&input).unwrap(), prepare(&input).unwrap());
    }

    #[test]
    fn test_non_numeric_count_is_coercion_error() {
        let result = prepare(&table(json!([
            measurement("2023-05-01 09:00:00", "5"),
            measurement("2023-05-01 10:00:00", "viele"),
        ])));
        match result {
            Err(PrepareError::TypeCoercion { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "AnzFahrzeuge");
            }
            other => panic!("expected coercion error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_coordinate_is_coercion_error() {
        let result = prepare(&table(json!([{
            "EKoord": "Eunbekannt",
            "NKoord": "N1248000",
            "AnzFahrzeuge": 1,
            "MessungDatZeit": "2023-05-01 08:00:00"
        }])));
        assert!(matches!(
            result,
            Err(PrepareError::TypeCoercion { ref column, .. }) if column == "ekoord_strip"
        ));
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let result = prepare(&table(json!([measurement("gestern", "1")])));
        assert!(matches!(
            result,
            Err(PrepareError::TimestampParse { row: 0, .. })
        ));
    }
}
