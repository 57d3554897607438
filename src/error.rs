//! Error types for record extraction

use crate::sources::SourceFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting records from a source path
///
/// Field-level problems (a missing `<price>`, a short CSV row, a year that
/// is not a number) never show up here; they become `None` on the record.
/// Only document-level failures do.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A source file or directory could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid syntax for its format
    #[error("Malformed {format} document {}: {reason}", .path.display())]
    Parse {
        format: SourceFormat,
        path: PathBuf,
        reason: String,
    },

    /// No format could be inferred for a path
    #[error("Cannot infer source format for {}", .path.display())]
    UnknownFormat { path: PathBuf },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(
        format: SourceFormat,
        path: impl Into<PathBuf>,
        reason: impl ToString,
    ) -> Self {
        Self::Parse {
            format,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for structural parse failures
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ExtractError::parse(SourceFormat::Xml, "/tmp/cars.xml", "unclosed tag");
        assert!(err.is_parse());
        assert_eq!(
            err.to_string(),
            "Malformed XML document /tmp/cars.xml: unclosed tag"
        );
    }

    #[test]
    fn test_io_error_is_not_parse() {
        let err = ExtractError::io(
            "/missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_parse());
        assert!(err.to_string().starts_with("Failed to read /missing.csv"));
    }
}
