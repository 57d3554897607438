//! File system operations
//!
//! This module handles all file I/O around extraction:
//! - Discovering source files in a directory
//! - Writing extracted records as NDJSON

mod directory;
mod ndjson;

pub use directory::{DirectoryListing, FileDiscovery, resolve_sources};
pub use ndjson::NdjsonWriter;
