//! Client for the motorised private traffic (MIV) counts published by the
//! city of Zurich.
//!
//! Data is read from the CKAN `datastore_search_sql` endpoint, one resource
//! per year, and prepared into [`TrafficFrame`]s with WGS84 coordinates
//! ready for mapping. See [`ZurichTraffic`] to get started.

mod aggregation;
#[cfg(feature = "charts")]
mod charts;
mod datastore;
mod error;
mod preparation;
mod query;
mod traffic;
mod types;

#[cfg(test)]
mod test_support;

pub use error::TrafficError;
pub use traffic::*;

pub use aggregation::availability::{dates_from_table, AvailableDates, DateQueryMode};
pub use aggregation::trend::{monthly_from_table, MonthlyTotal, MonthlyTrend};
pub use aggregation::{PartitionResult, SkippedPartition};

pub use datastore::error::DatastoreError;
pub use datastore::extractor::{extract_records, Record, RecordTable};
pub use datastore::fetcher::{classify_response, DatastoreFetcher, FetchOutcome, DEFAULT_ENDPOINT};

pub use preparation::coordinates::{ch_to_wgs, ch_to_wgs_columns, ch_to_wgs_lat, ch_to_wgs_lng, LatLon};
pub use preparation::error::PrepareError;
pub use preparation::pipeline::prepare;
pub use preparation::traffic_frame::*;

pub use query::columns;
pub use query::sql::*;

pub use types::api_error::ApiError;
pub use types::outcome::QueryOutcome;
pub use types::partition::*;
pub use types::record::PreparedRecord;

#[cfg(feature = "charts")]
pub use charts::*;
