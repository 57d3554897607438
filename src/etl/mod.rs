//! Core extract/load abstractions
//!
//! Extractors read records from a source; loaders hand them to whatever
//! consumes them downstream. Transformation is left to callers.

mod extract;
mod load;

pub use extract::Extractor;
pub use load::Loader;
