//! Keyword-bounded free-text sections (Vorbemerkungen, Schlussbemerkungen).

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::rules::patterns::{normalize_whitespace, PAGE_NUMBER, TABLE_HEADER};
use super::Result;
use crate::error::ExtractionError;
use crate::models::config::{SectionConfig, CLOSING_REMARKS, PRELIMINARY_REMARKS};
use crate::models::metadata::DocumentSections;
use crate::models::page::PageText;

struct Section {
    name: String,
    pattern: Regex,
}

/// Extracts the text between a start and an end keyword over the whole
/// document.
pub struct SectionExtractor {
    sections: Vec<Section>,
}

impl SectionExtractor {
    /// Compile the configured keyword pairs.
    pub fn new(config: &SectionConfig) -> Result<Self> {
        let sections = config
            .sections
            .iter()
            .map(|bounds| {
                let source = format!(
                    r"{}\s*[:\-–]?\s*(.*?)\s*{}\b",
                    regex::escape(&bounds.start),
                    regex::escape(&bounds.end)
                );
                RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map(|pattern| Section {
                        name: bounds.name.clone(),
                        pattern,
                    })
                    .map_err(|e| ExtractionError::InvalidPattern {
                        pattern: source,
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { sections })
    }

    /// Extract all sections.
    ///
    /// `header_raw` is the running page header text, removed from the
    /// section bodies together with page numbers and table column headers.
    pub fn extract(&self, pages: &[PageText], header_raw: &str) -> DocumentSections {
        let full_text = normalize_whitespace(
            &pages.iter().map(PageText::text).collect::<Vec<_>>().join(" "),
        );

        let mut result = DocumentSections::default();

        for section in &self.sections {
            let body = section
                .pattern
                .captures(&full_text)
                .and_then(|caps| caps.get(1))
                .map(|m| clean_section(m.as_str(), header_raw))
                .unwrap_or_default();

            debug!("Section {}: {} chars", section.name, body.len());

            match section.name.as_str() {
                PRELIMINARY_REMARKS => result.preliminary_remarks = body,
                CLOSING_REMARKS => result.closing_remarks = body,
                other => {
                    result.other.insert(other.to_string(), body);
                }
            }
        }

        result
    }
}

/// Remove page furniture from a section body.
fn clean_section(text: &str, header_raw: &str) -> String {
    let mut cleaned = text.to_string();

    let header_raw = normalize_whitespace(header_raw);
    if !header_raw.is_empty() {
        if let Ok(re) = RegexBuilder::new(&regex::escape(&header_raw))
            .case_insensitive(true)
            .build()
        {
            cleaned = re.replace_all(&cleaned, "").into_owned();
        }
    }

    cleaned = PAGE_NUMBER.replace_all(&cleaned, "").into_owned();
    cleaned = TABLE_HEADER.replace_all(&cleaned, "").into_owned();

    normalize_whitespace(&cleaned)
}
