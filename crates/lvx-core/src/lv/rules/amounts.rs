//! German-locale number and amount parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Amount extractor for free text such as "Angebotssumme Netto: 12.345,67 €".
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in AMOUNT_PATTERN.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            if let Some(amount) = parse_german_decimal(full_match.as_str()) {
                results.push(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Parse a German-formatted number ("1.234,56" -> 1234.56).
///
/// The last comma is the decimal separator and dots before it are thousands
/// separators. Without a comma, a last dot group of at most two digits is
/// read as a decimal point ("1234.50"), otherwise all dots are thousands
/// separators ("3.350.000"). Spaces are ignored. Returns `None` for
/// anything that is not a number.
pub fn parse_german_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{00a0}')
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    if !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return None;
    }

    let normalized = if let Some((int_part, decimal_part)) = digits.rsplit_once(',') {
        if decimal_part.is_empty() || !decimal_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let int_part = int_part.replace('.', "");
        if int_part.contains(',') {
            return None;
        }
        let int_part = if int_part.is_empty() { "0".to_string() } else { int_part };
        format!("{}.{}", int_part, decimal_part)
    } else if let Some((int_part, decimal_part)) = digits.rsplit_once('.') {
        if decimal_part.len() <= 2 && !decimal_part.is_empty() {
            format!("{}.{}", int_part.replace('.', ""), decimal_part)
        } else {
            digits.replace('.', "")
        }
    } else {
        digits.to_string()
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Format a decimal German style with two decimals ("1.234,56").
pub fn format_german_decimal(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_german_decimal() {
        assert_eq!(parse_german_decimal("12.345,67"), Some(dec("12345.67")));
        assert_eq!(parse_german_decimal("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_german_decimal("5,00"), Some(dec("5.00")));
        assert_eq!(parse_german_decimal("10"), Some(dec("10")));
        assert_eq!(parse_german_decimal("1 234,75"), Some(dec("1234.75")));
        assert_eq!(parse_german_decimal("-3,5"), Some(dec("-3.5")));
    }

    #[test]
    fn test_parse_dot_only_numbers() {
        assert_eq!(parse_german_decimal("1234.50"), Some(dec("1234.50")));
        assert_eq!(parse_german_decimal("3.350.000"), Some(dec("3350000")));
    }

    #[test]
    fn test_unparseable_tokens() {
        assert_eq!(parse_german_decimal("n/a"), None);
        assert_eq!(parse_german_decimal("________"), None);
        assert_eq!(parse_german_decimal(""), None);
        assert_eq!(parse_german_decimal("1,2,3"), None);
        assert_eq!(parse_german_decimal("12,"), None);
    }

    #[test]
    fn test_format_german_decimal() {
        assert_eq!(format_german_decimal(dec("1234.56")), "1.234,56");
        assert_eq!(format_german_decimal(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_german_decimal(dec("5")), "5,00");
        assert_eq!(format_german_decimal(dec("-1500")), "-1.500,00");
    }

    #[test]
    fn test_extract_amounts() {
        let extractor = AmountExtractor::new();
        let text = "Angebotssumme Netto: 12.345,67 € zzgl. 2.345,68 € MwSt";

        let results = extractor.extract_all(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, dec("12345.67"));
        assert_eq!(results[0].source, "12.345,67");
        assert_eq!(results[0].position, Some((21, 30)));
        assert_eq!(results[1].value, dec("2345.68"));
    }
}
