//! Whole-document extraction pipeline.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    LvExtractor, MetadataExtractor, PageHeaderParser, PositionExtractor, Result, SectionExtractor,
};
use crate::error::ExtractionError;
use crate::models::config::LvxConfig;
use crate::models::metadata::{DocumentSections, MetadataRecord, PageHeader};
use crate::models::page::PageText;
use crate::models::position::PositionTable;

/// Everything extracted from one LV document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Cover-page metadata fields.
    pub metadata: MetadataRecord,
    /// Running header of the first page.
    pub header: PageHeader,
    /// Free-text sections.
    pub sections: DocumentSections,
    /// Positions in document order.
    pub positions: PositionTable,
    /// Non-fatal problems found during extraction.
    pub warnings: Vec<String>,
    /// Number of pages processed.
    pub page_count: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Run header, metadata, section and position extraction over `pages`.
///
/// Only an empty page sequence or an invalid configured pattern fails.
pub fn extract_document(pages: &[PageText], config: &LvxConfig) -> Result<Extraction> {
    let start = Instant::now();

    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let pages = match config.pdf.max_pages {
        0 => pages,
        max => &pages[..pages.len().min(max)],
    };

    let header = PageHeaderParser::new(&config.pdf).parse_first(pages);

    let (metadata, metadata_warnings) = MetadataExtractor::new(&config.metadata)
        .with_sections(&config.sections)
        .extract_with_warnings(pages);

    let sections = SectionExtractor::new(&config.sections)?.extract(pages, &header.raw);

    let (positions, position_warnings) = PositionExtractor::new(&config.positions)?
        .with_header(&header)
        .with_sections(&config.sections)
        .extract_with_warnings(pages);

    let warnings: Vec<String> = metadata_warnings
        .iter()
        .chain(position_warnings.iter())
        .map(ToString::to_string)
        .collect();

    if positions.is_empty() {
        warn!("No positions found in {} pages", pages.len());
    }

    let processing_time_ms = start.elapsed().as_millis() as u64;
    info!(
        "Extraction complete in {}ms: {} metadata fields, {} positions, {} warnings",
        processing_time_ms,
        metadata.found_count(),
        positions.len(),
        warnings.len()
    );

    Ok(Extraction {
        metadata,
        header,
        sections,
        positions,
        warnings,
        page_count: pages.len(),
        processing_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metadata::MetadataField;
    use crate::models::page::pages_from_lines;

    fn pages() -> Vec<PageText> {
        pages_from_lines(&[
            vec![
                "Muster Bau GmbH -- Hauptstr. 1 -- 12345 Musterstadt",
                "Projekt: Neubau Kita 12.03.2024 LV: Rohbau Seite: 1",
                "Bauherr: Stadt Musterhausen",
                "Vorbemerkungen: Zufahrt über Nordtor.",
                "AUSSCHREIBUNG",
                "1 Erdarbeiten",
                "1.1 Aushub 10 m3 5,00 50,00",
            ],
            vec![
                "Muster Bau GmbH -- Hauptstr. 1 -- 12345 Musterstadt",
                "Projekt: Neubau Kita 12.03.2024 LV: Rohbau Seite: 2",
                "1.2 Verfüllen 5 m3 3,00 15,00",
            ],
        ])
    }

    #[test]
    fn test_extract_document() {
        let extraction = extract_document(&pages(), &LvxConfig::default()).unwrap();

        assert_eq!(extraction.page_count, 2);
        assert_eq!(extraction.header.company.as_deref(), Some("Muster Bau GmbH"));
        assert_eq!(extraction.metadata.project_name(), Some("Neubau Kita"));
        assert_eq!(extraction.metadata.client(), Some("Stadt Musterhausen"));
        assert_eq!(extraction.sections.preliminary_remarks, "Zufahrt über Nordtor.");
        assert_eq!(extraction.positions.len(), 3);
        assert!(extraction
            .warnings
            .contains(&format!("missing field: {}", MetadataField::Bidder)));
    }

    #[test]
    fn test_max_pages() {
        let mut config = LvxConfig::default();
        config.pdf.max_pages = 1;

        let extraction = extract_document(&pages(), &config).unwrap();
        assert_eq!(extraction.page_count, 1);
        assert_eq!(extraction.positions.len(), 2);
    }

    #[test]
    fn test_no_pages() {
        assert_eq!(
            extract_document(&[], &LvxConfig::default()),
            Err(ExtractionError::NoPages)
        );
    }

    #[test]
    fn test_invalid_boilerplate_pattern() {
        let mut config = LvxConfig::default();
        config.positions.boilerplate_patterns.push("[".to_string());

        assert!(matches!(
            extract_document(&pages(), &config),
            Err(ExtractionError::InvalidPattern { .. })
        ));
    }
}
