//! Extractor trait for reading records from a source

use eyre::Result;

/// Extractor trait for extracting items from a source
///
/// The file extractors in [`crate::sources`] implement this with
/// `Item = Record`, so any format can be driven through one seam.
///
/// # Example
/// ```no_run
/// use car_extract::etl::Extractor;
/// use car_extract::Record;
/// use eyre::Result;
///
/// struct FixedExtractor(Vec<Record>);
///
/// impl Extractor for FixedExtractor {
///     type Item = Record;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, malformed documents, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
