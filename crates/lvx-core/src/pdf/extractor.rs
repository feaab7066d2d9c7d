//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::page::PageText;

/// PDF page text extractor using lopdf.
///
/// Page text comes from lopdf's per-page content stream decoding. When
/// that yields nothing, pdf-extract's whole-document text is split on form
/// feeds instead.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Create an extractor and load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    /// Pages from pdf-extract output, when it separates pages with form feeds.
    fn fallback_pages(&self) -> Result<Vec<PageText>> {
        let text = self.extract_text()?;
        let pages = super::pages_from_text(&text);

        if pages.len() as u32 != self.page_count() {
            warn!(
                "pdf-extract returned {} page blocks for {} pages",
                pages.len(),
                self.page_count()
            );
        }
        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.raw_data.is_empty() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if page == 0 || !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn pages(&self) -> Result<Vec<PageText>> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        let mut total_chars = 0;

        for number in 1..=page_count {
            let text = match self.extract_page_text(number) {
                Ok(text) => text,
                Err(e) => {
                    trace!("Page {}: {}", number, e);
                    String::new()
                }
            };
            total_chars += text.trim().len();
            pages.push(PageText::from_text(number, &text));
        }

        debug!("lopdf extracted {} chars from {} pages", total_chars, page_count);

        if total_chars == 0 {
            debug!("No text from lopdf, falling back to pdf-extract");
            return self.fallback_pages();
        }

        Ok(pages)
    }
}

/// Load a PDF and return its pages.
pub fn load_pages(data: &[u8]) -> Result<Vec<PageText>> {
    PdfExtractor::from_bytes(data)?.pages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.pages().is_err());
    }

    #[test]
    fn test_invalid_pdf() {
        let result = PdfExtractor::from_bytes(b"not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_page_text_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_page_text(1), Err(PdfError::Parse(_))));
        assert!(extractor.extract_text().is_err());
    }
}
