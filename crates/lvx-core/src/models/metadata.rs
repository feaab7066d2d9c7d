//! Document-level metadata: labeled cover-page fields, the running page
//! header and free-text sections.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lv::rules::{parse_date, AmountExtractor, FieldExtractor};

/// The fixed set of metadata fields recognized on the first pages of an LV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    /// Project title (Projekt).
    ProjectName,
    /// Issue date of the document (Datum).
    IssueDate,
    /// Client / building owner (Bauherr).
    Client,
    /// Bidding company (Bieter).
    Bidder,
    /// Name of the bill of quantities (LV).
    LvName,
    /// Building application planner (Bauantragsplanung).
    BuildingApplicationPlanning,
    /// Execution planner (Ausführungsplanung).
    ExecutionPlanning,
    /// Site management (Bauleitung).
    ConstructionManagement,
    /// Execution period (Ausführungszeitraum).
    ExecutionPeriod,
    /// Start of execution (Ausführungsbeginn).
    ExecutionStart,
    /// Net offer total (Angebotssumme Netto).
    OfferNetTotal,
    /// VAT amount (Mehrwertsteuer).
    OfferVat,
    /// Gross offer total (Angebotssumme Brutto).
    OfferGrossTotal,
    /// Submission deadline and place (Angebotsabgabe).
    SubmissionDeadline,
}

impl MetadataField {
    /// All fields in output order.
    pub const ALL: [MetadataField; 14] = [
        MetadataField::ProjectName,
        MetadataField::IssueDate,
        MetadataField::Client,
        MetadataField::Bidder,
        MetadataField::LvName,
        MetadataField::BuildingApplicationPlanning,
        MetadataField::ExecutionPlanning,
        MetadataField::ConstructionManagement,
        MetadataField::ExecutionPeriod,
        MetadataField::ExecutionStart,
        MetadataField::OfferNetTotal,
        MetadataField::OfferVat,
        MetadataField::OfferGrossTotal,
        MetadataField::SubmissionDeadline,
    ];

    /// Snake-case key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            MetadataField::ProjectName => "project_name",
            MetadataField::IssueDate => "issue_date",
            MetadataField::Client => "client",
            MetadataField::Bidder => "bidder",
            MetadataField::LvName => "lv_name",
            MetadataField::BuildingApplicationPlanning => "building_application_planning",
            MetadataField::ExecutionPlanning => "execution_planning",
            MetadataField::ConstructionManagement => "construction_management",
            MetadataField::ExecutionPeriod => "execution_period",
            MetadataField::ExecutionStart => "execution_start",
            MetadataField::OfferNetTotal => "offer_net_total",
            MetadataField::OfferVat => "offer_vat",
            MetadataField::OfferGrossTotal => "offer_gross_total",
            MetadataField::SubmissionDeadline => "submission_deadline",
        }
    }

    /// The German label as printed in the document.
    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::ProjectName => "Projekt",
            MetadataField::IssueDate => "Datum",
            MetadataField::Client => "Bauherr",
            MetadataField::Bidder => "Bieter",
            MetadataField::LvName => "LV",
            MetadataField::BuildingApplicationPlanning => "Bauantragsplanung",
            MetadataField::ExecutionPlanning => "Ausführungsplanung",
            MetadataField::ConstructionManagement => "Bauleitung",
            MetadataField::ExecutionPeriod => "Ausführungszeitraum",
            MetadataField::ExecutionStart => "Ausführungsbeginn",
            MetadataField::OfferNetTotal => "Angebotssumme Netto",
            MetadataField::OfferVat => "Mehrwertsteuer",
            MetadataField::OfferGrossTotal => "Angebotssumme Brutto",
            MetadataField::SubmissionDeadline => "Angebotsabgabe",
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Metadata fields of one document. Every field is present as a key;
/// fields that were not found map to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    values: BTreeMap<MetadataField, Option<String>>,
}

impl MetadataRecord {
    /// A record with every field absent.
    pub fn empty() -> Self {
        Self {
            values: MetadataField::ALL.iter().map(|f| (*f, None)).collect(),
        }
    }

    pub(crate) fn from_values(found: BTreeMap<MetadataField, String>) -> Self {
        let mut record = Self::empty();
        for (field, value) in found {
            record.values.insert(field, Some(value));
        }
        record
    }

    /// Value of a field, if it was found.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.values.get(&field).and_then(|v| v.as_deref())
    }

    pub fn is_found(&self, field: MetadataField) -> bool {
        self.get(field).is_some()
    }

    /// Fields that were not found, in output order.
    pub fn missing(&self) -> Vec<MetadataField> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Number of fields with a value.
    pub fn found_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    /// Iterate over all fields and their optional values.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, Option<&str>)> {
        self.values.iter().map(|(k, v)| (*k, v.as_deref()))
    }

    pub fn project_name(&self) -> Option<&str> {
        self.get(MetadataField::ProjectName)
    }

    pub fn issue_date(&self) -> Option<&str> {
        self.get(MetadataField::IssueDate)
    }

    pub fn client(&self) -> Option<&str> {
        self.get(MetadataField::Client)
    }

    /// First German-formatted amount in a field, e.g. the offer totals.
    pub fn amount(&self, field: MetadataField) -> Option<Decimal> {
        AmountExtractor::new()
            .extract(self.get(field)?)
            .map(|m| m.value)
    }

    /// Issue date parsed into a calendar date.
    pub fn issue_date_parsed(&self) -> Option<NaiveDate> {
        self.issue_date().and_then(parse_date)
    }
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// Structured running header of a page.
///
/// Typical layout: `Company -- Street -- City Tel.: … Fax: … E-mail: … --
/// Projekt: Name 12.03.2024 LV: Name Seite: 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHeader {
    /// Whole normalized header text before "Seite".
    pub raw: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    /// City with postal code, contact details removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Date as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_parsed: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lv: Option<String>,
}

impl PageHeader {
    /// Check if nothing was recognized.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
            && self.company.is_none()
            && self.project.is_none()
            && self.lv.is_none()
    }
}

/// Free-text sections of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSections {
    /// Preliminary remarks (Vorbemerkungen).
    pub preliminary_remarks: String,
    /// Closing remarks (Schlussbemerkungen).
    pub closing_remarks: String,
    /// Any further configured sections, keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}
