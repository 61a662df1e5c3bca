use crate::datastore::error::DatastoreError;
use serde_json::{Map, Value};

/// A single datastore row: column name to scalar JSON value.
pub type Record = Map<String, Value>;

/// Flat table of rows unwrapped from `result.records`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<Record>,
}

impl RecordTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Value at `row`/`column`, `None` when absent or JSON `null`.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.records
            .get(row)
            .and_then(|record| record.get(column))
            .filter(|value| !value.is_null())
    }

    /// Appends the rows of another table, as when combining partitions.
    pub fn extend(&mut self, other: RecordTable) {
        self.records.extend(other.records);
    }
}

impl FromIterator<Record> for RecordTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Unwraps `result.records` of a response that reported success.
///
/// Fails with [`DatastoreError::Schema`] when `result` or `records` is absent,
/// or when a row is not a JSON object.
pub fn extract_records(envelope: &Value) -> Result<RecordTable, DatastoreError> {
    let result = envelope
        .get("result")
        .ok_or_else(|| DatastoreError::Schema {
            missing: "result".to_string(),
        })?;
    let records = result
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| DatastoreError::Schema {
            missing: "result.records".to_string(),
        })?;

    records
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            row.as_object()
                .cloned()
                .ok_or_else(|| DatastoreError::Schema {
                    missing: format!("result.records[{idx}] as object"),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(RecordTable::new)
}
