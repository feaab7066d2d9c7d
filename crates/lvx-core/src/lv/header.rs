//! Running page header parsing.

use tracing::debug;

use super::rules::parse_date;
use super::rules::patterns::{
    normalize_whitespace, CONTACT_SUFFIX, EMAIL, FAX, HEADER_LV, HEADER_PROJECT, HEADER_SEPARATOR,
    PHONE,
};
use crate::models::config::PdfConfig;
use crate::models::metadata::PageHeader;
use crate::models::page::PageText;

/// Parses the company / project header printed at the top of every page.
pub struct PageHeaderParser {
    header_lines: usize,
}

impl PageHeaderParser {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            header_lines: config.header_lines,
        }
    }

    /// Parse the header of the first page, or an empty header without pages.
    pub fn parse_first(&self, pages: &[PageText]) -> PageHeader {
        pages.first().map(|page| self.parse(page)).unwrap_or_default()
    }

    /// Parse the header of one page.
    pub fn parse(&self, page: &PageText) -> PageHeader {
        let lines: Vec<&str> = page.content_lines().take(self.header_lines).collect();
        let text = normalize_whitespace(&lines.join(" "));
        let mut header = self.parse_text(&text);

        if !header.is_empty() {
            debug!(
                "Page {} header: company={:?} project={:?} lv={:?}",
                page.number, header.company, header.project, header.lv
            );
        }
        header.raw = header.raw.trim().to_string();
        header
    }

    fn parse_text(&self, text: &str) -> PageHeader {
        let raw = match text.find("Seite") {
            Some(idx) => &text[..idx],
            None => text,
        };

        let mut header = PageHeader {
            raw: raw.to_string(),
            ..PageHeader::default()
        };

        let parts: Vec<&str> = HEADER_SEPARATOR
            .split(raw)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        // Company -- street -- city: only when the header actually uses separators
        if parts.len() > 1 {
            header.company = parts.first().map(|s| s.to_string());
            header.street = parts.get(1).map(|s| s.to_string());
            header.city = parts
                .get(2)
                .map(|city| CONTACT_SUFFIX.replace(city, "").trim().to_string())
                .filter(|city| !city.is_empty());
        }

        for part in &parts {
            if header.phone.is_none() {
                header.phone = PHONE.captures(part).map(|c| c[1].trim().to_string());
            }
            if header.fax.is_none() {
                header.fax = FAX.captures(part).map(|c| c[1].trim().to_string());
            }
            if header.email.is_none() {
                header.email = EMAIL.captures(part).map(|c| c[1].to_string());
            }
        }

        if let Some(caps) = HEADER_PROJECT.captures(text) {
            header.project = Some(caps[1].trim().to_string());
            if let Some(date) = caps.get(2) {
                header.date = Some(date.as_str().to_string());
                header.date_parsed = parse_date(date.as_str());
            }
        }

        header.lv = HEADER_LV
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|lv| !lv.is_empty());

        header
    }
}

impl Default for PageHeaderParser {
    fn default() -> Self {
        Self::new(&PdfConfig::default())
    }
}
