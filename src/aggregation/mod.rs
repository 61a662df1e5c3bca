//! Aggregations that span every partition of the catalog.
//!
//! Each partition is queried on its own. A partition whose query fails is
//! skipped and reported in the result instead of aborting the aggregation.

pub mod availability;
pub mod trend;

use crate::types::partition::Partition;
use std::fmt;

/// A partition left out of a multi-partition aggregation, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPartition {
    pub year: i32,
    pub resource_id: String,
    pub reason: String,
}

impl SkippedPartition {
    pub fn new(partition: &Partition, reason: impl fmt::Display) -> Self {
        Self {
            year: partition.year,
            resource_id: partition.resource_id.clone(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for SkippedPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.year, self.resource_id, self.reason)
    }
}

/// Outcome of one partition's query inside an aggregation loop.
pub type PartitionResult<T> = Result<T, SkippedPartition>;
