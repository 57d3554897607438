//! JSON extractor
//!
//! Accepts a table in either of two layouts:
//!
//! ```json
//! [{"car_model": "Ford", "year_of_manufacture": 2020, "price": 20000, "fuel": "Gasoline"}]
//! {"car_model": {"0": "Ford"}, "price": [20000]}
//! ```
//!
//! A document that is not valid JSON, or that has neither layout, fails
//! the whole extraction. `null` values are kept as missing values.

use super::{SourceFormat, coerce, read_sources};
use crate::error::{ExtractError, Result};
use crate::etl::Extractor;
use crate::record::{Record, RecordSet};
use crate::storage::{DirectoryListing, FileDiscovery};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Extract records from a JSON file or a directory of `.json` files
pub struct JsonExtractor<D = DirectoryListing> {
    path: PathBuf,
    discovery: D,
}

impl JsonExtractor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_discovery(path, DirectoryListing)
    }
}

impl<D: FileDiscovery> JsonExtractor<D> {
    /// Use a custom directory listing
    pub fn with_discovery(path: impl AsRef<Path>, discovery: D) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            discovery,
        }
    }

    /// Read all JSON sources into one record set
    pub fn read_all(&self) -> Result<RecordSet> {
        read_sources(&self.path, SourceFormat::Json, &self.discovery, parse_json)
    }
}

impl<D: FileDiscovery> Extractor for JsonExtractor<D> {
    type Item = Record;

    async fn extract(&self) -> eyre::Result<Vec<Self::Item>> {
        Ok(self.read_all()?.into_records())
    }
}

/// Extract records from a JSON file or directory
pub fn extract_from_json(path: impl AsRef<Path>) -> Result<RecordSet> {
    JsonExtractor::new(path).read_all()
}

fn parse_json(path: &Path, bytes: &[u8]) -> Result<RecordSet> {
    let malformed = |reason: String| ExtractError::parse(SourceFormat::Json, path, reason);

    let document: Value = serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

    match document {
        Value::Array(rows) => rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Object(fields) => {
                    Ok(record_from_fields(path, index, |name| fields.get(name)))
                }
                other => Err(malformed(format!(
                    "Row {} is {}, expected an object",
                    index,
                    kind(other)
                ))),
            })
            .collect(),
        Value::Object(columns) => parse_columns(path, &columns).map_err(malformed),
        other => Err(malformed(format!(
            "Expected an array of records or an object of columns, found {}",
            kind(&other)
        ))),
    }
}

/// Column layout: each value holds one column, keyed by row label
fn parse_columns(
    path: &Path,
    columns: &Map<String, Value>,
) -> std::result::Result<RecordSet, String> {
    let mut labels: Vec<String> = Vec::new();

    for (name, column) in columns {
        let column_labels: Vec<String> = match column {
            Value::Array(values) => (0..values.len()).map(|i| i.to_string()).collect(),
            Value::Object(values) => values.keys().cloned().collect(),
            _ => {
                return Err(format!(
                    "Column {:?} holds a scalar; if using all scalar values, an index is required",
                    name
                ));
            }
        };

        for label in column_labels {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }

    let lookup = |name: &str, label: &str| match columns.get(name)? {
        Value::Array(values) => values.get(label.parse::<usize>().ok()?),
        Value::Object(values) => values.get(label),
        _ => None,
    };

    Ok(labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            record_from_fields(path, index, |name| lookup(name, label.as_str()))
        })
        .collect())
}

fn record_from_fields<'a>(
    path: &Path,
    index: usize,
    field: impl Fn(&str) -> Option<&'a Value>,
) -> Record {
    Record {
        car_model: coerce_value(path, index, "car_model", field("car_model"), text_value),
        year_of_manufacture: coerce_value(
            path,
            index,
            "year_of_manufacture",
            field("year_of_manufacture"),
            year_value,
        ),
        price: coerce_value(path, index, "price", field("price"), price_value),
        fuel: coerce_value(path, index, "fuel", field("fuel"), text_value),
    }
}

fn coerce_value<T>(
    path: &Path,
    index: usize,
    name: &str,
    value: Option<&Value>,
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = value.filter(|v| !v.is_null())?;
    let converted = convert(value);
    if converted.is_none() {
        log::warn!(
            "{}: row {}: cannot read {} from {}, leaving it empty",
            path.display(),
            index,
            name,
            value
        );
    }
    converted
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn year_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(coerce::integral)),
        Value::String(s) => coerce::parse_integer(s),
        _ => None,
    }
}

fn price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => coerce::parse_real(s),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
