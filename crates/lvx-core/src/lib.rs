//! Core library for Leistungsverzeichnis (German bill of quantities) extraction.
//!
//! This crate provides:
//! - Page text sources (PDF via lopdf / pdf-extract, form-feed separated text)
//! - Cover-page metadata extraction driven by a declarative rule table
//! - Position extraction with a line-by-line state machine
//! - Running page header and free-text section parsing
//! - German-locale number and date parsing

pub mod error;
pub mod lv;
pub mod models;
pub mod pdf;

pub use error::{ExtractionError, LvxError, PdfError, Result};
pub use lv::{
    extract_document, Extraction, LvExtractor, MetadataExtractor, PageHeaderParser,
    PositionExtractor, SectionExtractor,
};
pub use models::config::LvxConfig;
pub use models::metadata::{DocumentSections, MetadataField, MetadataRecord, PageHeader};
pub use models::page::{pages_from_lines, PageText};
pub use models::position::{Position, PositionTable};
pub use pdf::{load_pages, pages_from_text, PdfExtractor, PdfProcessor};
