//! The prepared measurement row handed to the presentation layer.

use chrono::NaiveDateTime;
use serde::Serialize;

/// One sensor reading after type coercion and coordinate conversion.
///
/// Text fields are `None` when the datastore returned `null` or omitted them;
/// only the numeric and time fields are checked during preparation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRecord {
    /// Measuring station (`MSName`).
    pub station_name: Option<String>,
    /// Counting point inside the station (`ZSName`).
    pub detection_point_name: Option<String>,
    /// `EKoord` exactly as delivered, including its prefix.
    pub easting_raw: Option<String>,
    /// `NKoord` exactly as delivered, including its prefix.
    pub northing_raw: Option<String>,
    /// Direction of travel (`Richtung`).
    pub direction: Option<String>,
    /// `AnzFahrzeugeStatus`, e.g. "Gemessen" or "Imputiert".
    pub status_flag: Option<String>,
    /// Timestamp string with its original formatting (`Zeit`).
    pub measured_at_display: String,
    pub measured_at: NaiveDateTime,
    /// `HH:MM:SS`, the animation frame label (`Uhrzeit`).
    pub time_of_day: String,
    /// Hour of day, 0 to 23 (`stunde`).
    pub hour: u32,
    pub easting: f64,
    pub northing: f64,
    pub vehicle_count: f64,
    pub latitude: f64,
    pub longitude: f64,
}
