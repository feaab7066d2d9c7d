//! Common regex patterns for LV extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// A quantity token: German thousands/decimal notation, or a plain
/// dotted decimal with at most two fraction digits.
pub const NUMBER_TOKEN: &str = r"\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?|\d+\.\d{1,2}";

/// A price column token: anything without letters, or an explicit "n/a".
/// Placeholders such as "________" are matched so they do not end up in
/// the description; they fail numeric parsing later.
pub const PRICE_TOKEN: &str = r"[^\sA-Za-zÄÖÜäöüß]+|[nN]/[aA]";

/// A money amount with decimal comma.
pub const AMOUNT_TOKEN: &str = r"\d{1,3}(?:\.\d{3})*,\d{2}|\d+,\d{2}";

/// Date as printed in LV headers: DD.MM.YYYY, DD/MM/YY, DD-MM-YYYY.
pub const DATE_TOKEN: &str = r"\d{1,2}[./\-]\d{1,2}[./\-]\d{2,4}";

lazy_static! {
    // Position header: dotted number at line start followed by text.
    // "1...3" style numbers from column-collapsed layouts are accepted.
    pub static ref POSITION_HEADER: Regex = Regex::new(
        r"^(\d{1,4}(?:\.+\d{1,4})*)\.?\s+(\S.*)$"
    ).unwrap();

    // Unit and total price on their own line.
    pub static ref PRICE_LINE: Regex = Regex::new(
        &format!(r"^({AMOUNT_TOKEN})\s+({AMOUNT_TOKEN})$")
    ).unwrap();

    // Date patterns
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    // Amounts, optionally followed by a currency
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\d{1,3}(?:[.\s\u{00a0}]?\d{3})*),(\d{2})\b"
    ).unwrap();

    // Page header pieces
    pub static ref HEADER_PROJECT: Regex = Regex::new(
        &format!(r"(?i)Projekt\s*:\s*(.+?)(?:\s+({DATE_TOKEN}))?(?:\s+LV\s*:|\s+Seite\b|$)")
    ).unwrap();

    pub static ref HEADER_LV: Regex = Regex::new(
        r"(?i)\bLV\s*:\s*(.*?)\s*(?:Seite\b|$)"
    ).unwrap();

    pub static ref HEADER_SEPARATOR: Regex = Regex::new(r"\s*--\s*").unwrap();

    pub static ref CONTACT_SUFFIX: Regex = Regex::new(
        r"(?i)(Tel\.?\s*:.*|Fax\.?\s*:.*|E-?mail\s*:.*)"
    ).unwrap();

    pub static ref PHONE: Regex = Regex::new(r"Tel\.?\s*:\s*([+\d\s/()\-]+)").unwrap();

    pub static ref FAX: Regex = Regex::new(r"Fax\.?\s*:\s*([+\d\s/()\-]+)").unwrap();

    pub static ref EMAIL: Regex = Regex::new(r"([\w.\-]+@[\w.\-]+)").unwrap();

    // Section cleanup
    pub static ref PAGE_NUMBER: Regex = Regex::new(r"(?i)Seite\s*:\s*\d+").unwrap();

    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)Position\s+Menge\s*/\s*Einheit\s+EP\s*\([A-Z]{3}\)\s+GP\s*\([A-Z]{3}\)"
    ).unwrap();

    pub static ref PLACEHOLDER: Regex = Regex::new(r"_{2,}").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Lines that belong to page furniture rather than to positions
    pub static ref BOILERPLATE: Vec<Regex> = [
        r"(?i)^Ü+\s*b+e+r+t+r+a+g+",
        r"(?i)^(?:Zwischen|Gesamt|Titel)?summe\b",
        r"(?i)^mailto:",
        r"(?i)^Projekt\s*:",
        r"(?i)^LV\s*:",
        r"(?i)^Seite\s*:?\s*\d+",
        r"(?i)\bSeite\s*:\s*\d+\s*$",
        r"(?i)^Position\s+Menge\s*/\s*Einheit",
        r"(?i)^(?:Tel|Fax)\.?\s*:",
        r"(?i)^E-?mail\s*:",
        r"(?i)^Firmenstempel",
        r"\s--\s",
        r"^-\s*\d+\s*-$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Normalize whitespace and remove line breaks.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_header() {
        let caps = POSITION_HEADER.captures("1.1 Aushub 10 m3 5,00 50,00").unwrap();
        assert_eq!(&caps[1], "1.1");
        assert_eq!(&caps[2], "Aushub 10 m3 5,00 50,00");

        let caps = POSITION_HEADER.captures("1...3 Mauerwerk").unwrap();
        assert_eq!(&caps[1], "1...3");

        let caps = POSITION_HEADER.captures("2. Rohbau").unwrap();
        assert_eq!(&caps[1], "2");

        assert!(POSITION_HEADER.captures("Aushub 10 m3").is_none());
        assert!(POSITION_HEADER.captures("12").is_none());
    }

    #[test]
    fn test_boilerplate() {
        let is_boilerplate = |l: &str| BOILERPLATE.iter().any(|re| re.is_match(l));
        assert!(is_boilerplate("Übertrag: 1.234,00"));
        assert!(is_boilerplate("Summe 1 Erdarbeiten"));
        assert!(is_boilerplate("Position Menge/Einheit EP (EUR) GP (EUR)"));
        assert!(is_boilerplate("Projekt: Neubau Kita 12.03.2024 LV: Rohbau Seite: 2"));
        assert!(is_boilerplate("Muster Bau GmbH -- Hauptstr. 1 -- 12345 Musterstadt"));
        assert!(!is_boilerplate("weitere Beschreibung"));
        assert!(!is_boilerplate("1.1 Aushub"));
    }

    #[test]
    fn test_price_line() {
        let caps = PRICE_LINE.captures("1.250,00 12.500,00").unwrap();
        assert_eq!(&caps[1], "1.250,00");
        assert_eq!(&caps[2], "12.500,00");
        assert!(PRICE_LINE.captures("10 m3").is_none());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n b\t c "), "a b c");
    }
}
