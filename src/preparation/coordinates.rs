//! Swiss grid (LV03 / LV95) to WGS84 conversion.
//!
//! Uses swisstopo's approximate formulas ("Approximate formulas for the
//! transformation between Swiss projection coordinates and WGS84"), accurate
//! to roughly one metre inside Switzerland. LV95 input is recognised by its
//! 2 000 000 / 1 000 000 false origin and shifted to LV03 first.

use serde::Serialize;

const LV95_EAST_OFFSET: f64 = 2_000_000.0;
const LV95_NORTH_OFFSET: f64 = 1_000_000.0;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon(pub f64, pub f64);

/// Auxiliary values relative to the old observatory in Bern, in 1000 km.
fn auxiliary(easting: f64, northing: f64) -> (f64, f64) {
    let easting = if easting >= LV95_EAST_OFFSET {
        easting - LV95_EAST_OFFSET
    } else {
        easting
    };
    let northing = if northing >= LV95_NORTH_OFFSET {
        northing - LV95_NORTH_OFFSET
    } else {
        northing
    };
    (
        (easting - 600_000.0) / 1_000_000.0,
        (northing - 200_000.0) / 1_000_000.0,
    )
}

/// Latitude of a Swiss grid point.
pub fn ch_to_wgs_lat(easting: f64, northing: f64) -> f64 {
    let (y, x) = auxiliary(easting, northing);
    let lat = 16.902_389_2 + 3.238_272 * x
        - 0.270_978 * y.powi(2)
        - 0.002_528 * x.powi(2)
        - 0.044_7 * y.powi(2) * x
        - 0.014_0 * x.powi(3);
    // 10000" units to degrees
    lat * 100.0 / 36.0
}

/// Longitude of a Swiss grid point.
pub fn ch_to_wgs_lng(easting: f64, northing: f64) -> f64 {
    let (y, x) = auxiliary(easting, northing);
    let lng = 2.677_909_4 + 4.728_982 * y + 0.791_484 * y * x + 0.130_6 * y * x.powi(2)
        - 0.043_6 * y.powi(3);
    lng * 100.0 / 36.0
}

pub fn ch_to_wgs(easting: f64, northing: f64) -> LatLon {
    LatLon(
        ch_to_wgs_lat(easting, northing),
        ch_to_wgs_lng(easting, northing),
    )
}

/// Converts a whole easting/northing column pair at once.
///
/// Returns `(latitudes, longitudes)`; both have the length of the shorter input.
pub fn ch_to_wgs_columns(eastings: &[f64], northings: &[f64]) -> (Vec<f64>, Vec<f64>) {
    eastings
        .iter()
        .zip(northings)
        .map(|(&e, &n)| (ch_to_wgs_lat(e, n), ch_to_wgs_lng(e, n)))
        .unzip()
}
