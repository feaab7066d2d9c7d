//! Declarative table of cover-page metadata rules.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::DATE_TOKEN;
use crate::models::metadata::MetadataField;

/// How one metadata field is recognized.
///
/// Each pattern is line-anchored and captures the value in group 1.
#[derive(Debug)]
pub struct FieldRule {
    pub field: MetadataField,
    pub patterns: Vec<Regex>,
    /// Following unlabeled lines continue the value.
    pub multiline: bool,
    /// Line that ends a multi-line value.
    pub terminator: Option<Regex>,
}

impl FieldRule {
    fn new(field: MetadataField, patterns: &[&str]) -> Self {
        Self {
            field,
            patterns: patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
            multiline: false,
            terminator: None,
        }
    }

    fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    fn terminated_by(mut self, pattern: &str) -> Self {
        self.terminator = Some(Regex::new(pattern).unwrap());
        self
    }

    /// Try all patterns in order and return the trimmed capture of the first match.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.patterns
            .iter()
            .find_map(|re| re.captures(line))
            .map(|caps| caps.get(1).map_or("", |m| m.as_str().trim()))
    }

    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(line))
    }

    pub fn is_terminator(&self, line: &str) -> bool {
        self.terminator.as_ref().is_some_and(|re| re.is_match(line))
    }
}

lazy_static! {
    /// Metadata rules in evaluation order.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule::new(MetadataField::ProjectName, &[
            format!(r"(?i)^Projekt\s*:\s*(.+?)(?:\s+{DATE_TOKEN})?(?:\s+LV\s*:.*)?(?:\s+Seite\s*:.*)?$").as_str(),
            r"(?i)^Bauvorhaben\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::IssueDate, &[
            r"(?i)^Datum\s*:\s*(.+)$",
            format!(r"(?i)^Projekt\s*:.*?\s({DATE_TOKEN})\b").as_str(),
            format!(r"(?i)^Stand\s*:?\s*({DATE_TOKEN})\b").as_str(),
        ]),
        FieldRule::new(MetadataField::Client, &[
            r"(?i)^Bauherr(?:in)?\s*:\s*(.+)$",
            r"(?i)^Auftraggeber\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::Bidder, &[r"(?i)^Bieter\s*:\s*(.+)$"]),
        FieldRule::new(MetadataField::LvName, &[r"(?i)^LV\s*:\s*(.+?)(?:\s+Seite\s*:.*)?$"]),
        FieldRule::new(MetadataField::BuildingApplicationPlanning, &[
            r"(?i)^Bauantragsplanung\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::ExecutionPlanning, &[
            r"(?i)^Ausführungsplanung\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::ConstructionManagement, &[
            r"(?i)^Bauleitung\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::ExecutionPeriod, &[
            r"(?i)^Ausführungszeitraum\s*:\s*(.*)$",
        ])
        .multiline(),
        FieldRule::new(MetadataField::ExecutionStart, &[
            r"(?i)^Ausführungsbeginn\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::OfferNetTotal, &[
            r"(?i)^Angebotssumme\s+Netto\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::OfferVat, &[
            r"(?i)^(?:Mehrwertsteuer|MwSt\.?|USt\.?)(?:\s*\(\s*\d+(?:,\d+)?\s*%\s*\))?\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::OfferGrossTotal, &[
            r"(?i)^Angebotssumme\s+Brutto\s*:\s*(.+)$",
        ]),
        FieldRule::new(MetadataField::SubmissionDeadline, &[
            r"(?i)^Angebotsabgabe\s*:\s*(.*)$",
        ])
        .multiline()
        .terminated_by(r"(?i)^ANGEBOT\b"),
    ];
}
