//! CSV extractor
//!
//! Columns are matched to record fields by header name. Short rows are
//! tolerated: the missing trailing cells read as no value.

use super::{SourceFormat, coerce, read_sources};
use crate::error::{ExtractError, Result};
use crate::etl::Extractor;
use crate::record::{Record, RecordSet};
use crate::storage::{DirectoryListing, FileDiscovery};
use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};

/// Extract records from a CSV file or a directory of `.csv` files
///
/// # Example
/// ```no_run
/// use car_extract::sources::CsvExtractor;
///
/// let records = CsvExtractor::new("data/").read_all()?;
/// println!("{} cars", records.len());
/// # Ok::<(), car_extract::ExtractError>(())
/// ```
pub struct CsvExtractor<D = DirectoryListing> {
    path: PathBuf,
    discovery: D,
}

impl CsvExtractor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_discovery(path, DirectoryListing)
    }
}

impl<D: FileDiscovery> CsvExtractor<D> {
    /// Use a custom directory listing
    pub fn with_discovery(path: impl AsRef<Path>, discovery: D) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            discovery,
        }
    }

    /// Read all CSV sources into one record set
    pub fn read_all(&self) -> Result<RecordSet> {
        read_sources(&self.path, SourceFormat::Csv, &self.discovery, parse_csv)
    }
}

impl<D: FileDiscovery> Extractor for CsvExtractor<D> {
    type Item = Record;

    async fn extract(&self) -> eyre::Result<Vec<Self::Item>> {
        Ok(self.read_all()?.into_records())
    }
}

/// Extract records from a CSV file or directory
pub fn extract_from_csv(path: impl AsRef<Path>) -> Result<RecordSet> {
    CsvExtractor::new(path).read_all()
}

/// Header positions of the schema columns
struct Columns {
    car_model: Option<usize>,
    year_of_manufacture: Option<usize>,
    price: Option<usize>,
    fuel: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h == name);
        Self {
            car_model: position("car_model"),
            year_of_manufacture: position("year_of_manufacture"),
            price: position("price"),
            fuel: position("fuel"),
        }
    }
}

fn parse_csv(path: &Path, bytes: &[u8]) -> Result<RecordSet> {
    let malformed = |reason: String| ExtractError::parse(SourceFormat::Csv, path, reason);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(malformed("No columns to parse from file".to_string()));
    }

    let columns = Columns::from_headers(&headers);
    let mut records = RecordSet::new();

    for result in reader.records() {
        let row = result.map_err(|e| malformed(e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.len() > headers.len() {
            return Err(malformed(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                row.len()
            )));
        }

        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .filter(|value| !value.is_empty())
        };

        records.push(Record {
            car_model: cell(columns.car_model).map(str::to_string),
            year_of_manufacture: coerce_cell(
                path,
                line,
                "year_of_manufacture",
                cell(columns.year_of_manufacture),
                coerce::parse_integer,
            ),
            price: coerce_cell(path, line, "price", cell(columns.price), coerce::parse_real),
            fuel: cell(columns.fuel).map(str::to_string),
        });
    }

    Ok(records)
}

fn coerce_cell<T>(
    path: &Path,
    line: u64,
    name: &str,
    raw: Option<&str>,
    convert: fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw?;
    let value = convert(raw);
    if value.is_none() {
        log::warn!(
            "{}:{}: cannot read {} from {:?}, leaving it empty",
            path.display(),
            line,
            name,
            raw
        );
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "car_model,year_of_manufacture,price,fuel\n";

    fn parse(content: &str) -> Result<RecordSet> {
        parse_csv(Path::new("cars.csv"), content.as_bytes())
    }

    #[test]
    fn test_parse_rows() {
        let records = parse(&format!(
            "{HEADER}Toyota,2015,15000,Diesel\nFord,2018,22000.5,Gasoline\n"
        ))
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records.get(0),
            Some(&Record::new("Toyota", Some(2015), Some(15000.0), "Diesel"))
        );
        assert_eq!(records.get(1).unwrap().price, Some(22000.5));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let records = parse(&format!("{HEADER}Toyota,2015,15000\nHonda,2018\n")).unwrap();

        assert_eq!(records.len(), 2);
        let toyota = records.get(0).unwrap();
        assert_eq!(toyota.price, Some(15000.0));
        assert_eq!(toyota.fuel, None);

        let honda = records.get(1).unwrap();
        assert_eq!(honda.car_model(), Some("Honda"));
        assert_eq!(honda.price, None);
        assert_eq!(honda.fuel, None);
    }

    #[test]
    fn test_long_row_is_fatal() {
        let err = parse(&format!("{HEADER}Toyota,2015,15000,Diesel,extra\n")).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_empty_file_is_fatal() {
        assert!(parse("").unwrap_err().is_parse());
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let records = parse(HEADER).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_columns_matched_by_name() {
        let records = parse("fuel,color,car_model\nDiesel,red,Toyota\n").unwrap();
        let record = records.get(0).unwrap();

        assert_eq!(record.car_model(), Some("Toyota"));
        assert_eq!(record.fuel(), Some("Diesel"));
        assert_eq!(record.year_of_manufacture, None);
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_empty_and_unreadable_cells() {
        let records = parse(&format!("{HEADER},20x5,,Diesel\n,2015.0,n/a,\n")).unwrap();

        let first = records.get(0).unwrap();
        assert_eq!(first.car_model, None);
        assert_eq!(first.year_of_manufacture, None);
        assert_eq!(first.price, None);

        let second = records.get(1).unwrap();
        assert_eq!(second.year_of_manufacture, Some(2015));
        assert_eq!(second.price, None);
        assert_eq!(second.fuel, None);
    }

    #[tokio::test]
    async fn test_extractor_trait() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("cars.csv"),
            format!("{HEADER}Volkswagen,2020,40000,Gasoline\n"),
        )
        .unwrap();

        let items = CsvExtractor::new(temp.path()).extract().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].car_model(), Some("Volkswagen"));
    }
}
