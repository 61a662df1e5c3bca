// Column names as they appear in the MIV datastore tables and query aliases.

pub const COL_STATION: &str = "MSName"; // Measuring station
pub const COL_DETECTION_POINT: &str = "ZSName"; // Counting point
pub const COL_EASTING_RAW: &str = "EKoord";
pub const COL_NORTHING_RAW: &str = "NKoord";
pub const COL_EASTING_STRIP: &str = "ekoord_strip";
pub const COL_NORTHING_STRIP: &str = "nkoord_strip";
pub const COL_DIRECTION: &str = "Richtung";
pub const COL_VEHICLE_COUNT: &str = "AnzFahrzeuge";
pub const COL_VEHICLE_STATUS: &str = "AnzFahrzeugeStatus";
pub const COL_MEASURED_AT: &str = "MessungDatZeit";

// Aliases of the date and trend queries
pub const COL_DATE: &str = "datum";
pub const COL_DATE_MIN: &str = "datum_min";
pub const COL_DATE_MAX: &str = "datum_max";
pub const COL_MONTH: &str = "monat";
