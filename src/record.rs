//! Normalized car-listing records
//!
//! Every extractor produces a [`RecordSet`]: an ordered list of
//! [`Record`]s sharing the fixed schema in [`COLUMNS`].

use serde::{Deserialize, Serialize};

/// Column names of every record set, in order
pub const COLUMNS: [&str; 4] = ["car_model", "year_of_manufacture", "price", "fuel"];

/// One car listing
///
/// `None` means "no value". It is distinct from an empty string, which is
/// a real value for the text fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub car_model: Option<String>,
    pub year_of_manufacture: Option<i64>,
    pub price: Option<f64>,
    pub fuel: Option<String>,
}

impl Record {
    pub fn new(
        car_model: impl Into<String>,
        year_of_manufacture: Option<i64>,
        price: Option<f64>,
        fuel: impl Into<String>,
    ) -> Self {
        Self {
            car_model: Some(car_model.into()),
            year_of_manufacture,
            price,
            fuel: Some(fuel.into()),
        }
    }

    /// Model name, or `None` when the source had no value
    pub fn car_model(&self) -> Option<&str> {
        self.car_model.as_deref()
    }

    /// Fuel type, or `None` when the source had no value
    pub fn fuel(&self) -> Option<&str> {
        self.fuel.as_deref()
    }
}

/// An ordered sequence of records with the fixed [`COLUMNS`] schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of the set; the same for empty and populated sets
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Append all records of `other`, keeping their order
    pub fn append(&mut self, other: RecordSet) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Model names in row order
    pub fn car_models(&self) -> Vec<Option<&str>> {
        self.records.iter().map(Record::car_model).collect()
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
