//! SQL for the CKAN `datastore_search_sql` action.
//!
//! The backend is a fixed, trusted PostgreSQL behind CKAN, so statements are
//! assembled with `format!`. Dates only ever enter as `%Y-%m-%d`.

use crate::query::columns::*;
use crate::types::partition::Partition;
use chrono::NaiveDate;
use std::fmt;

/// The four statement shapes issued against a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// All non-null counts of one calendar day.
    Measurements,
    /// Every date with at least one non-null count.
    DistinctDates,
    /// First and last date with a non-null count.
    DateBounds,
    /// Vehicle counts summed per calendar month.
    MonthlyTotals,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::Measurements => "measurements",
            QueryKind::DistinctDates => "distinct-dates",
            QueryKind::DateBounds => "date-bounds",
            QueryKind::MonthlyTotals => "monthly-totals",
        };
        f.write_str(name)
    }
}

/// A statement together with the partition and shape it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastoreQuery {
    pub kind: QueryKind,
    pub resource_id: String,
    pub sql: String,
}

impl fmt::Display for DatastoreQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.kind, self.resource_id)
    }
}

/// `MessungDatZeit` with its `T` separator normalised to a space.
fn normalized_timestamp() -> String {
    format!("REPLACE(\"{COL_MEASURED_AT}\",'T',' ')")
}

/// Measurements of `date`, with the coordinate prefixes stripped server side.
///
/// # Examples
///
/// ```
/// use zurich_traffic::{measurements_on, Partition};
/// use chrono::NaiveDate;
///
/// let partition = Partition::new(2023, "4492d891-a366-49b9-b0f2-fabaa8015d47");
/// let query = measurements_on(&partition, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
/// assert!(query.sql.contains("::DATE = '2023-05-01'"));
/// ```
pub fn measurements_on(partition: &Partition, date: NaiveDate) -> DatastoreQuery {
    let ts = normalized_timestamp();
    let sql = format!(
        r#"SELECT
    "{COL_STATION}",
    "{COL_DETECTION_POINT}",
    "{COL_EASTING_RAW}",
    substring("{COL_EASTING_RAW}", 2, 10) as {COL_EASTING_STRIP},
    "{COL_NORTHING_RAW}",
    substring("{COL_NORTHING_RAW}", 2, 10) as {COL_NORTHING_STRIP},
    "{COL_DIRECTION}",
    "{COL_VEHICLE_COUNT}",
    "{COL_VEHICLE_STATUS}",
    {ts} as "{COL_MEASURED_AT}"
    from "{resource}"
WHERE {ts}::DATE = '{date}'
AND "{COL_VEHICLE_COUNT}" IS NOT NULL"#,
        resource = partition.resource_id,
        date = date.format("%Y-%m-%d"),
    );
    DatastoreQuery {
        kind: QueryKind::Measurements,
        resource_id: partition.resource_id.clone(),
        sql,
    }
}

pub fn distinct_dates(partition: &Partition) -> DatastoreQuery {
    let sql = format!(
        r#"SELECT
    DISTINCT "{COL_MEASURED_AT}"::DATE AS {COL_DATE}
    from "{resource}"
WHERE "{COL_VEHICLE_COUNT}" IS NOT NULL
ORDER BY 1 DESC"#,
        resource = partition.resource_id,
    );
    DatastoreQuery {
        kind: QueryKind::DistinctDates,
        resource_id: partition.resource_id.clone(),
        sql,
    }
}

pub fn date_bounds(partition: &Partition) -> DatastoreQuery {
    let ts = normalized_timestamp();
    let sql = format!(
        r#"SELECT
    MIN({ts}::DATE) AS {COL_DATE_MIN},
    MAX({ts}::DATE) AS {COL_DATE_MAX}
    from "{resource}"
WHERE "{COL_VEHICLE_COUNT}" IS NOT NULL"#,
        resource = partition.resource_id,
    );
    DatastoreQuery {
        kind: QueryKind::DateBounds,
        resource_id: partition.resource_id.clone(),
        sql,
    }
}

pub fn monthly_totals(partition: &Partition) -> DatastoreQuery {
    let sql = format!(
        r#"SELECT
    DATE_TRUNC('MONTH', "{COL_MEASURED_AT}"::TIMESTAMP) AS {COL_MONTH},
    SUM("{COL_VEHICLE_COUNT}"::INT) AS "{COL_VEHICLE_COUNT}"
    FROM "{resource}"
WHERE "{COL_VEHICLE_COUNT}" IS NOT NULL
GROUP BY 1"#,
        resource = partition.resource_id,
    );
    DatastoreQuery {
        kind: QueryKind::MonthlyTotals,
        resource_id: partition.resource_id.clone(),
        sql,
    }
}
