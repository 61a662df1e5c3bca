use crate::aggregation::SkippedPartition;
use crate::datastore::error::DatastoreError;
use crate::preparation::error::PrepareError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error(transparent)]
    Datastore(#[from] DatastoreError),

    #[error(transparent)]
    Prepare(#[from] PrepareError),

    #[error("No partition holds data for {date}")]
    UnknownPartition { date: NaiveDate },

    #[error("{date} lies outside the available dates {min} to {max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("No available dates: all {} partitions failed", skipped.len())]
    NoAvailableDates { skipped: Vec<SkippedPartition> },

    #[error("Polars operation failed")]
    Polars(#[from] PolarsError),

    #[error("Failed to write chart '{0}'")]
    ChartOutput(String, #[source] std::io::Error),
}
