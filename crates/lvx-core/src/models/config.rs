//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LvxError, Result};

/// Main configuration for the lvx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LvxConfig {
    /// Page source configuration.
    pub pdf: PdfConfig,

    /// Metadata extraction configuration.
    pub metadata: MetadataConfig,

    /// Position extraction configuration.
    pub positions: PositionConfig,

    /// Free-text section configuration.
    pub sections: SectionConfig,
}

/// Page source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Number of leading lines of a page that form the running header.
    pub header_lines: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            header_lines: 6,
        }
    }
}

/// Metadata extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Number of leading pages scanned for labeled fields.
    pub metadata_pages: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self { metadata_pages: 2 }
    }
}

/// Position extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Recognized units of measure (case-insensitive).
    pub units: Vec<String>,

    /// Additional line patterns to discard as page boilerplate.
    pub boilerplate_patterns: Vec<String>,

    /// Remove placeholder runs like "________" from descriptions.
    pub strip_placeholders: bool,

    /// Inside an open position, read a header whose number does not
    /// advance past the last one as description text.
    pub reject_duplicate_numbers: bool,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            units: default_units(),
            boilerplate_patterns: Vec::new(),
            strip_placeholders: true,
            reject_duplicate_numbers: true,
        }
    }
}

fn default_units() -> Vec<String> {
    [
        "m", "m2", "m²", "qm", "m3", "m³", "cbm", "lfm", "lfdm", "cm", "mm", "km", "ha",
        "Stk", "St", "Stck", "Psch", "pschl", "pauschal", "h", "Std", "kg", "t", "to", "l",
        "Satz", "Tag", "Wo", "Mon",
    ]
    .iter()
    .map(|u| u.to_string())
    .collect()
}

/// A free-text section bounded by two keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBounds {
    /// Output key of the section.
    pub name: String,
    /// Keyword that opens the section.
    pub start: String,
    /// Keyword that closes the section (not included).
    pub end: String,
}

impl SectionBounds {
    pub fn new(name: &str, start: &str, end: &str) -> Self {
        Self {
            name: name.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// Section extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub sections: Vec<SectionBounds>,
}

/// Section name for the preliminary remarks.
pub const PRELIMINARY_REMARKS: &str = "preliminary_remarks";
/// Section name for the closing remarks.
pub const CLOSING_REMARKS: &str = "closing_remarks";

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                SectionBounds::new(PRELIMINARY_REMARKS, "Vorbemerkungen", "AUSSCHREIBUNG"),
                SectionBounds::new(CLOSING_REMARKS, "Schlussbemerkungen", "Ort, Datum"),
            ],
        }
    }
}

impl LvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| LvxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| LvxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
