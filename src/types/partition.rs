//! Year-scoped partitions of the MIV dataset and the catalog resolving a date
//! to the datastore resource that holds it.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// One year of traffic counts, stored as its own datastore resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Calendar year covered by the resource.
    pub year: i32,
    /// CKAN resource identifier (the table name used in `FROM "..."`).
    pub resource_id: String,
}

impl Partition {
    pub fn new(year: i32, resource_id: impl Into<String>) -> Self {
        Self {
            year,
            resource_id: resource_id.into(),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.year, self.resource_id)
    }
}

const DEFAULT_RESOURCES: [(i32, &str); 5] = [
    (2025, "d96c83ea-8c65-4b6b-991e-fbfeb31a5959"),
    (2024, "c1855626-88e1-4d48-99c8-00b049aae900"),
    (2023, "4492d891-a366-49b9-b0f2-fabaa8015d47"),
    (2022, "bc2d7c35-de13-45e9-be21-538d9eab3653"),
    (2021, "b2b5730d-b816-4c20-a3a3-ab2567f81574"),
];

/// Resource id of the 2020 table. Not part of the default catalog since its
/// timestamps do not follow the later tables' format.
pub const LEGACY_2020_RESOURCE: &str = "44607195-a2ad-4f9b-b6f1-d26c003d85a2";

/// The set of known partitions, kept in descending year order.
///
/// # Examples
///
/// ```
/// use zurich_traffic::PartitionCatalog;
/// use chrono::NaiveDate;
///
/// let catalog = PartitionCatalog::default();
/// let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
/// assert_eq!(catalog.resolve(date).unwrap().year, 2023);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionCatalog {
    partitions: Vec<Partition>,
}

impl PartitionCatalog {
    /// Builds a catalog from arbitrary partitions. Later duplicates of a year
    /// replace earlier ones.
    pub fn new(partitions: impl IntoIterator<Item = Partition>) -> Self {
        let mut by_year: Vec<Partition> = Vec::new();
        for partition in partitions {
            match by_year.iter_mut().find(|p| p.year == partition.year) {
                Some(existing) => *existing = partition,
                None => by_year.push(partition),
            }
        }
        by_year.sort_by(|a, b| b.year.cmp(&a.year));
        Self {
            partitions: by_year,
        }
    }

    /// Finds the partition holding `date`, if any.
    pub fn resolve(&self, date: NaiveDate) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.year == date.year())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

impl Default for PartitionCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_RESOURCES
                .iter()
                .map(|(year, id)| Partition::new(*year, *id)),
        )
    }
}
