//! Error types for the lvx-core library.

use thiserror::Error;

/// Main error type for the lvx library.
#[derive(Error, Debug)]
pub enum LvxError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// LV extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to LV field and position extraction.
///
/// Only [`ExtractionError::NoPages`] and [`ExtractionError::InvalidPattern`]
/// are returned as failures. Missing fields and unparseable numbers are
/// absorbed by the extractors and reported as warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// An expected metadata field was not found.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A numeric token could not be parsed under the decimal-comma convention.
    #[error("unparseable number for {field}: {value:?}")]
    UnparseableNumber { field: String, value: String },

    /// No pages were supplied.
    #[error("no pages to extract from")]
    NoPages,

    /// A configured pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Result type for the lvx library.
pub type Result<T> = std::result::Result<T, LvxError>;
