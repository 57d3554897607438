//! Car Extract
//!
//! Extracts car-listing records from CSV, JSON and XML files into one
//! uniform record set

pub mod error;
pub mod etl;
pub mod record;
pub mod sources;
pub mod storage;

// Re-exports for convenience
pub use error::ExtractError;
pub use etl::{Extractor, Loader};
pub use record::{COLUMNS, Record, RecordSet};
pub use sources::{
    CsvExtractor, JsonExtractor, SourceFormat, XmlExtractor, detect_format, extract_from_csv,
    extract_from_json, extract_from_xml, extract_path,
};
pub use storage::{DirectoryListing, FileDiscovery, NdjsonWriter};
