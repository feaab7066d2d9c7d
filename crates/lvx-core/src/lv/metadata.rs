//! Cover-page metadata extraction.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, info, trace};

use super::rules::patterns::{BOILERPLATE, POSITION_HEADER};
use super::rules::{starts_with_date, FieldRule, FIELD_RULES};
use super::LvExtractor;
use crate::error::ExtractionError;
use crate::models::config::{MetadataConfig, SectionConfig};
use crate::models::metadata::{MetadataField, MetadataRecord};
use crate::models::page::PageText;

/// Extracts labeled metadata fields from the leading pages of an LV.
///
/// Every line is run through the ordered [`FIELD_RULES`] table. The first
/// match of a field wins and later occurrences are ignored. Multi-line
/// fields keep collecting unlabeled follow-up lines until another label,
/// their terminator, a position header or a section keyword appears.
pub struct MetadataExtractor {
    /// Number of leading pages scanned.
    metadata_pages: usize,
    rules: &'static [FieldRule],
    /// Section keywords that close a multi-line value.
    section_keywords: Vec<Regex>,
}

impl MetadataExtractor {
    /// Create an extractor from configuration.
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            metadata_pages: config.metadata_pages,
            rules: FIELD_RULES.as_slice(),
            section_keywords: Vec::new(),
        }
    }

    /// Close multi-line values at lines starting with a section start or
    /// end keyword, e.g. "AUSSCHREIBUNG".
    pub fn with_sections(mut self, config: &SectionConfig) -> Self {
        self.section_keywords = config
            .sections
            .iter()
            .flat_map(|bounds| [bounds.start.trim(), bounds.end.trim()])
            .filter(|keyword| !keyword.is_empty())
            .filter_map(|keyword| Regex::new(&format!(r"(?i)^{}\b", regex::escape(keyword))).ok())
            .collect();
        self
    }

    fn ends_value(&self, rule: &FieldRule, line: &str) -> bool {
        rule.is_terminator(line)
            || (POSITION_HEADER.is_match(line) && !starts_with_date(line))
            || self.section_keywords.iter().any(|re| re.is_match(line))
    }

    /// Set the number of leading pages to scan.
    pub fn with_metadata_pages(mut self, pages: usize) -> Self {
        self.metadata_pages = pages;
        self
    }

    fn scan(&self, pages: &[PageText]) -> BTreeMap<MetadataField, String> {
        let mut found: BTreeMap<MetadataField, String> = BTreeMap::new();
        // Multi-line field currently collecting continuation lines
        let mut open: Option<&FieldRule> = None;

        for page in pages.iter().take(self.metadata_pages) {
            for line in page.content_lines() {
                if open.is_some_and(|rule| self.ends_value(rule, line)) {
                    trace!("multi-line field closed by {:?}", line);
                    open = None;
                }

                let matched: Vec<&FieldRule> =
                    self.rules.iter().filter(|rule| rule.matches(line)).collect();

                if matched.is_empty() {
                    if let Some(rule) = open {
                        if BOILERPLATE.iter().any(|re| re.is_match(line)) {
                            continue;
                        }
                        let value = found.entry(rule.field).or_default();
                        if !value.is_empty() {
                            value.push(' ');
                        }
                        value.push_str(line);
                    }
                    continue;
                }

                open = None;
                for rule in matched {
                    if found.contains_key(&rule.field) {
                        continue;
                    }
                    let Some(value) = rule.capture(line) else {
                        continue;
                    };
                    if value.is_empty() && !rule.multiline {
                        continue;
                    }

                    debug!("page {}: {} = {:?}", page.number, rule.field, value);
                    found.insert(rule.field, value.to_string());
                    if rule.multiline {
                        open = Some(rule);
                    }
                }
            }
        }

        found.retain(|_, value| !value.is_empty());
        found
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(&MetadataConfig::default())
    }
}

impl LvExtractor for MetadataExtractor {
    type Output = MetadataRecord;

    fn extract_with_warnings(&self, pages: &[PageText]) -> (MetadataRecord, Vec<ExtractionError>) {
        let record = MetadataRecord::from_values(self.scan(pages));

        let warnings: Vec<ExtractionError> = record
            .missing()
            .into_iter()
            .map(|field| ExtractionError::MissingField(field.key().to_string()))
            .collect();

        info!(
            "Metadata: {} of {} fields found",
            record.found_count(),
            MetadataField::ALL.len()
        );

        (record, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::pages_from_lines;
    use pretty_assertions::assert_eq;

    fn cover() -> Vec<PageText> {
        pages_from_lines(&[
            vec![
                "Muster Bau GmbH -- Hauptstr. 1 -- 12345 Musterstadt",
                "Projekt: Neubau Kita Sonnenschein 12.03.2024 LV: Rohbau Seite: 1",
                "",
                "Bauherr: Stadt Musterhausen",
                "Bieter: Beispiel Hoch- und Tiefbau AG",
                "Ausführungszeitraum:",
                "01.04.2024 bis",
                "30.09.2024",
                "Ausführungsbeginn: 01.04.2024",
                "Angebotssumme Netto: 10.000,00 €",
                "Mehrwertsteuer (19 %): 1.900,00 €",
                "Angebotssumme Brutto: 11.900,00 €",
                "Angebotsabgabe: 15.02.2024, 10:00 Uhr",
                "Rathaus, Zimmer 12",
                "ANGEBOT",
                "Hiermit bieten wir an",
            ],
            vec!["Projekt: Anderes Projekt 01.01.2020 LV: Ausbau Seite: 2"],
        ])
    }

    #[test]
    fn test_extract_cover_fields() {
        let record = MetadataExtractor::default().extract(&cover());

        assert_eq!(record.project_name(), Some("Neubau Kita Sonnenschein"));
        assert_eq!(record.issue_date(), Some("12.03.2024"));
        assert_eq!(record.client(), Some("Stadt Musterhausen"));
        assert_eq!(record.get(MetadataField::Bidder), Some("Beispiel Hoch- und Tiefbau AG"));
        assert_eq!(record.get(MetadataField::LvName), None);
        assert_eq!(record.get(MetadataField::OfferNetTotal), Some("10.000,00 €"));
        assert_eq!(record.get(MetadataField::OfferVat), Some("1.900,00 €"));
        assert_eq!(record.get(MetadataField::OfferGrossTotal), Some("11.900,00 €"));
    }

    #[test]
    fn test_multiline_fields() {
        let record = MetadataExtractor::default().extract(&cover());

        assert_eq!(
            record.get(MetadataField::ExecutionPeriod),
            Some("01.04.2024 bis 30.09.2024")
        );
        assert_eq!(
            record.get(MetadataField::SubmissionDeadline),
            Some("15.02.2024, 10:00 Uhr Rathaus, Zimmer 12")
        );
        assert_eq!(record.get(MetadataField::ExecutionStart), Some("01.04.2024"));
    }

    #[test]
    fn test_multiline_value_ends_at_positions_and_sections() {
        let pages = pages_from_lines(&[vec![
            "Ausführungszeitraum:",
            "01.04.2024 bis",
            "30.09.2024",
            "AUSSCHREIBUNG",
            "Allgemeine Hinweise",
        ]]);
        let record = MetadataExtractor::default()
            .with_sections(&SectionConfig::default())
            .extract(&pages);
        assert_eq!(
            record.get(MetadataField::ExecutionPeriod),
            Some("01.04.2024 bis 30.09.2024")
        );

        let pages = pages_from_lines(&[vec![
            "Ausführungszeitraum: 2024",
            "1 Erdarbeiten",
            "1.1 Aushub",
        ]]);
        let record = MetadataExtractor::default().extract(&pages);
        assert_eq!(record.get(MetadataField::ExecutionPeriod), Some("2024"));
    }

    #[test]
    fn test_first_match_wins() {
        let pages = pages_from_lines(&[vec!["Bauherr: Erster", "Bauherr: Zweiter"]]);
        let record = MetadataExtractor::default().extract(&pages);
        assert_eq!(record.client(), Some("Erster"));
    }

    #[test]
    fn test_only_leading_pages_scanned() {
        let pages = pages_from_lines(&[vec!["Text"], vec!["Text"], vec!["Bauherr: Spät"]]);
        let record = MetadataExtractor::default().extract(&pages);
        assert_eq!(record.client(), None);

        let record = MetadataExtractor::default().with_metadata_pages(3).extract(&pages);
        assert_eq!(record.client(), Some("Spät"));
    }

    #[test]
    fn test_missing_fields_are_warnings() {
        let pages = pages_from_lines(&[vec!["Bauherr: Stadt"]]);
        let (record, warnings) = MetadataExtractor::default().extract_with_warnings(&pages);

        assert_eq!(record.found_count(), 1);
        assert_eq!(warnings.len(), MetadataField::ALL.len() - 1);
        assert!(warnings.contains(&ExtractionError::MissingField("project_name".to_string())));
    }

    #[test]
    fn test_empty_pages() {
        let extractor = MetadataExtractor::default();
        assert_eq!(extractor.extract(&[]), MetadataRecord::empty());
        assert_eq!(extractor.try_extract(&[]), Err(ExtractionError::NoPages));
    }
}
