//! NDJSON (Newline Delimited JSON) output

use crate::etl::Loader;
use crate::record::Record;

use eyre::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write records as NDJSON, one object per line
///
/// Missing values are written as `null`.
pub struct NdjsonWriter {
    path: Option<PathBuf>,
}

impl NdjsonWriter {
    /// Write to a file, replacing its contents
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Write to standard output
    pub fn stdout() -> Self {
        Self { path: None }
    }

    /// Write all records to the configured destination
    pub fn write(&self, items: &[Record]) -> Result<()> {
        match &self.path {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Failed to create NDJSON file: {}", path.display()))?;
                let mut out = std::io::BufWriter::new(file);
                write_records(&mut out, items)
                    .with_context(|| format!("Failed to write NDJSON file: {}", path.display()))
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                write_records(&mut out, items).context("Failed to write NDJSON to stdout")
            }
        }
    }
}

/// Serialize records to any writer, one per line
fn write_records<W: Write>(out: &mut W, items: &[Record]) -> Result<()> {
    for item in items {
        serde_json::to_writer(&mut *out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

impl Loader for NdjsonWriter {
    type Item = Record;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write(&items)?;
        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_records() {
        let records = vec![
            Record::new("Ford", Some(2020), Some(20000.0), "Gasoline"),
            Record {
                car_model: Some("Audi".to_string()),
                year_of_manufacture: None,
                price: None,
                fuel: Some("Gasoline".to_string()),
            },
        ];

        let mut buf = Vec::new();
        write_records(&mut buf, &records).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["car_model"], "Ford");
        assert_eq!(lines[1]["price"], json!(null));
    }

    #[tokio::test]
    async fn test_load_to_file() {
        let temp = NamedTempFile::new().unwrap();
        let writer = NdjsonWriter::new(temp.path());

        let count = writer
            .load(vec![Record::new("Tesla", Some(2021), Some(35000.0), "Electric")])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let content = std::fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_write_empty_truncates() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "stale\n").unwrap();

        NdjsonWriter::new(temp.path()).write(&[]).unwrap();

        assert_eq!(std::fs::read_to_string(temp.path()).unwrap(), "");
    }
}
