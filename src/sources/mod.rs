//! Per-format record extractors
//!
//! Each extractor takes a path that is either a single file or a
//! directory of files with the format's extension, and concatenates the
//! records of every file in discovery order.
//!
//! The formats differ in how strict they are:
//! - CSV pads short rows with missing values
//! - JSON fails on a malformed document
//! - XML fails on a malformed document but tolerates missing fields

mod coerce;
mod csv_extractor;
mod json_extractor;
mod xml_extractor;

pub use csv_extractor::{CsvExtractor, extract_from_csv};
pub use json_extractor::{JsonExtractor, extract_from_json};
pub use xml_extractor::{XmlExtractor, extract_from_xml};

use crate::error::{ExtractError, Result};
use crate::record::RecordSet;
use crate::storage::{FileDiscovery, resolve_sources};
use std::fmt;
use std::path::Path;

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SourceFormat {
    Csv,
    Json,
    Xml,
}

impl SourceFormat {
    /// File extension matched during directory discovery
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Infer the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Xml => "XML",
        };
        f.write_str(name)
    }
}

/// Pick the format for `path`: the explicit choice, else the file extension
pub fn detect_format(path: &Path, explicit: Option<SourceFormat>) -> Result<SourceFormat> {
    explicit
        .or_else(|| SourceFormat::from_path(path))
        .ok_or_else(|| ExtractError::UnknownFormat {
            path: path.to_path_buf(),
        })
}

/// Extract records from `path` with the extractor for `format`
pub fn extract_path(path: impl AsRef<Path>, format: SourceFormat) -> Result<RecordSet> {
    match format {
        SourceFormat::Csv => extract_from_csv(path),
        SourceFormat::Json => extract_from_json(path),
        SourceFormat::Xml => extract_from_xml(path),
    }
}

/// Read every source file under `path` and concatenate what `parse` yields
///
/// Each file is read fully and closed before it is parsed. The first
/// failing file aborts the whole call.
fn read_sources<F>(
    path: &Path,
    format: SourceFormat,
    discovery: &dyn FileDiscovery,
    parse: F,
) -> Result<RecordSet>
where
    F: Fn(&Path, &[u8]) -> Result<RecordSet>,
{
    let mut records = RecordSet::new();

    for file in resolve_sources(path, format.extension(), discovery)? {
        log::debug!("Reading {} source {}", format, file.display());
        let bytes = std::fs::read(&file).map_err(|e| ExtractError::io(&file, e))?;

        let parsed = parse(&file, &bytes)?;
        log::debug!("Extracted {} record(s) from {}", parsed.len(), file.display());
        records.append(parsed);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("cars.CSV")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("dir/cars.xml")),
            Some(SourceFormat::Xml)
        );
        assert_eq!(SourceFormat::from_path(&PathBuf::from("cars")), None);
        assert_eq!(SourceFormat::from_path(&PathBuf::from("cars.txt")), None);
    }

    #[test]
    fn test_detect_format() {
        let dir = PathBuf::from("listings");
        assert_eq!(
            detect_format(&dir, Some(SourceFormat::Xml)).unwrap(),
            SourceFormat::Xml
        );
        assert_eq!(
            detect_format(&PathBuf::from("cars.json"), None).unwrap(),
            SourceFormat::Json
        );
        assert!(matches!(
            detect_format(&dir, None),
            Err(ExtractError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_format_display_and_extension() {
        assert_eq!(SourceFormat::Json.to_string(), "JSON");
        assert_eq!(SourceFormat::Json.extension(), "json");
    }
}
