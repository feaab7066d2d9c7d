//! Page text sources.

mod extractor;

pub use extractor::{load_pages, PdfExtractor};

use crate::error::PdfError;
use crate::models::page::PageText;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Page separator used by plain-text exports and pdf-extract output.
pub const FORM_FEED: char = '\x0c';

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract all pages as line sequences.
    fn pages(&self) -> Result<Vec<PageText>>;
}

/// Split a plain-text document into pages on form feeds.
///
/// Text without form feeds is a single page. A trailing form feed does not
/// start an extra page.
pub fn pages_from_text(text: &str) -> Vec<PageText> {
    let text = text.strip_suffix(FORM_FEED).unwrap_or(text);
    text.split(FORM_FEED)
        .enumerate()
        .map(|(i, page)| PageText::from_text(i as u32 + 1, page))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_from_text() {
        let pages = pages_from_text("1 Erdarbeiten\n1.1 Aushub\x0c1.2 Verfüllen\n\x0c");

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].lines, vec!["1 Erdarbeiten", "1.1 Aushub"]);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].lines, vec!["1.2 Verfüllen"]);
    }

    #[test]
    fn test_single_page_text() {
        let pages = pages_from_text("Projekt: Kita");
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].is_blank());
    }
}
