//! Date extraction for LV headers and cover pages.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // DD.MM.YYYY or DD/MM/YY or DD-MM-YYYY
        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = parse_year(&caps[3]);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                results.push(
                    ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()),
                );
            }
        }

        // YYYY-MM-DD
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(m)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                if results.iter().any(|r| r.value == date) {
                    continue;
                }
                results.push(
                    ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()),
                );
            }
        }

        results.sort_by_key(|r| r.position.map(|(start, _)| start));
        results
    }
}

/// Parse a printed date into a `NaiveDate`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

/// Check if `text` starts with a calendar date with a four-digit year
/// between 1900 and 2099.
///
/// Zero-padded position numbers such as "01.02.0010" are not dates.
pub fn starts_with_date(text: &str) -> bool {
    let Some(caps) = DATE_DMY.captures(text) else {
        return false;
    };
    if caps.get(0).is_none_or(|m| m.start() != 0) || caps[3].len() != 4 {
        return false;
    }

    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);
    let year: i32 = caps[3].parse().unwrap_or(0);
    (1900..=2099).contains(&year) && NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_dmy() {
        let result = DateExtractor::new().extract("Stand 12.03.2024");
        assert_eq!(
            result.map(|m| m.value),
            NaiveDate::from_ymd_opt(2024, 3, 12)
        );
    }

    #[test]
    fn test_extract_date_ymd() {
        assert_eq!(parse_date("2024-03-12"), NaiveDate::from_ymd_opt(2024, 3, 12));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("01/02/24"), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(parse_date("01.02.98"), NaiveDate::from_ymd_opt(1998, 2, 1));
    }

    #[test]
    fn test_starts_with_date() {
        assert!(starts_with_date("01.04.2024 bis"));
        assert!(starts_with_date("30.09.2024"));
        assert!(!starts_with_date("01.02.0010 Baustelleneinrichtung"));
        assert!(!starts_with_date("Stand 12.03.2024"));
        assert!(!starts_with_date("1.1 Aushub"));
        assert!(!starts_with_date("31.02.2024"));
    }

    #[test]
    fn test_invalid_date_skipped() {
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date("kein Datum"), None);
    }
}
