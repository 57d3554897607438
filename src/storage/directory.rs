//! Source file discovery

use crate::error::{ExtractError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Lists the files in a directory that carry a given extension
///
/// Implementations must return the same order for the same directory
/// contents; extractors concatenate records in that order.
pub trait FileDiscovery: Send + Sync {
    /// Files directly inside `dir` whose name ends in `.{extension}`
    ///
    /// # Errors
    /// Returns an error if the directory exists but cannot be listed
    fn discover(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;
}

/// Non-recursive directory listing, sorted by path
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryListing;

impl FileDiscovery for DirectoryListing {
    fn discover(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir).map_err(|e| ExtractError::io(dir, e))? {
            let entry = entry.map_err(|e| ExtractError::io(dir, e))?;
            let path = entry.path();

            // Like a shell glob, `*.ext` never matches dot-files
            let hidden = entry.file_name().as_encoded_bytes().starts_with(b".");
            let matches = path.extension() == Some(OsStr::new(extension));

            if matches && !hidden && path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Resolve a source path into the list of files to read
///
/// An existing file is read on its own, whatever its extension. Anything
/// else is treated as a directory and handed to `discovery`; a path that
/// does not exist resolves to no files.
pub fn resolve_sources(
    path: &Path,
    extension: &str,
    discovery: &dyn FileDiscovery,
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let files = discovery.discover(path, extension)?;
    log::debug!(
        "Discovered {} .{} file(s) in {}",
        files.len(),
        extension,
        path.display()
    );
    Ok(files)
}
