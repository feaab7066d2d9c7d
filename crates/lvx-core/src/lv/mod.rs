//! Leistungsverzeichnis extraction module.

mod document;
mod header;
mod metadata;
mod positions;
pub mod rules;
mod sections;

pub use document::{extract_document, Extraction};
pub use header::PageHeaderParser;
pub use metadata::MetadataExtractor;
pub use positions::PositionExtractor;
pub use sections::SectionExtractor;

use crate::error::ExtractionError;
use crate::models::page::PageText;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for extractors that turn page text into one structured record.
///
/// Field-level problems never abort a run. They are collected as warnings
/// next to the (possibly partial) output.
pub trait LvExtractor {
    /// Record produced from a page sequence.
    type Output;

    /// Extract the record together with the problems met on the way.
    fn extract_with_warnings(&self, pages: &[PageText]) -> (Self::Output, Vec<ExtractionError>);

    /// Extract the record, dropping warnings.
    fn extract(&self, pages: &[PageText]) -> Self::Output {
        self.extract_with_warnings(pages).0
    }

    /// Extract the record, rejecting an empty page sequence.
    fn try_extract(&self, pages: &[PageText]) -> Result<Self::Output> {
        if pages.is_empty() {
            return Err(ExtractionError::NoPages);
        }
        Ok(self.extract(pages))
    }
}
