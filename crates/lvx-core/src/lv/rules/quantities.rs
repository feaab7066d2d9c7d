//! Quantity, unit and price columns of a position.

use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::amounts::parse_german_decimal;
use super::patterns::{NUMBER_TOKEN, PRICE_LINE, PRICE_TOKEN};
use crate::error::ExtractionError;

/// Numeric columns recognized on one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quantities {
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    /// Tokens that sat in a numeric column but did not parse.
    pub rejected: Vec<ExtractionError>,
}

/// Recognizes `<qty> <unit> [<unit price> [<total price>]]` as a whole
/// line, or `<qty> <unit> <unit price> [<total price>]` as the tail of a
/// position header line.
#[derive(Debug, Clone)]
pub struct QuantityMatcher {
    line: Regex,
    tail: Regex,
}

impl QuantityMatcher {
    /// Build the matcher for a unit vocabulary.
    pub fn new<S: AsRef<str>>(units: &[S]) -> Result<Self, ExtractionError> {
        // A header tail needs the unit price so that measurements in the
        // description ("Tiefe 2 m") stay text.
        let line = format!("^{}$", columns_pattern(units, false));
        let tail = format!(r"^(?P<desc>.*?)\s+{}$", columns_pattern(units, true));

        Ok(Self {
            line: compile(&line)?,
            tail: compile(&tail)?,
        })
    }

    /// Match a line consisting only of numeric columns.
    ///
    /// Also accepts a bare "<unit price> <total price>" pair.
    pub fn match_line(&self, line: &str) -> Option<Quantities> {
        if let Some(caps) = self.line.captures(line) {
            return Some(quantities_from(&caps));
        }

        PRICE_LINE.captures(line).map(|caps| Quantities {
            unit_price: parse_german_decimal(&caps[1]),
            total_price: parse_german_decimal(&caps[2]),
            ..Quantities::default()
        })
    }

    /// Split trailing numeric columns off a header text.
    ///
    /// Returns the remaining description and the columns.
    pub fn split_tail<'a>(&self, text: &'a str) -> Option<(&'a str, Quantities)> {
        let caps = self.tail.captures(text)?;
        let desc = caps.name("desc").map_or("", |m| m.as_str().trim());
        Some((desc, quantities_from(&caps)))
    }
}

fn compile(pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(pattern).map_err(|e| ExtractionError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn columns_pattern<S: AsRef<str>>(units: &[S], price_required: bool) -> String {
    let mut units: Vec<&str> = units
        .iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .collect();
    // Longest first so "m3" wins over "m"
    units.sort_by_key(|u| std::cmp::Reverse(u.chars().count()));
    units.dedup();

    let units = if units.is_empty() {
        r"\S+".to_string()
    } else {
        units
            .iter()
            .map(|u| regex::escape(u))
            .collect::<Vec<_>>()
            .join("|")
    };

    let prices = format!(r"\s+(?P<up>{PRICE_TOKEN})(?:\s+(?P<tp>{PRICE_TOKEN}))?");
    let prices = if price_required { prices } else { format!("(?:{prices})?") };

    format!(r"(?P<qty>{NUMBER_TOKEN})\s+(?P<unit>(?i:{units})){prices}")
}

fn quantities_from(caps: &Captures<'_>) -> Quantities {
    let mut result = Quantities {
        unit: caps.name("unit").map(|m| m.as_str().to_string()),
        ..Quantities::default()
    };

    let mut parse = |name: &str, field: &str| -> Option<Decimal> {
        let raw = caps.name(name)?.as_str();
        let value = parse_german_decimal(raw);
        if value.is_none() {
            result.rejected.push(ExtractionError::UnparseableNumber {
                field: field.to_string(),
                value: raw.to_string(),
            });
        }
        value
    };

    let quantity = parse("qty", "quantity");
    let unit_price = parse("up", "unit_price");
    let total_price = parse("tp", "total_price");

    result.quantity = quantity;
    result.unit_price = unit_price;
    result.total_price = total_price;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn matcher() -> QuantityMatcher {
        QuantityMatcher::new(&["m", "m2", "m3", "Stk", "psch"]).unwrap()
    }

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_full_line() {
        let q = matcher().match_line("1.250,5 m2 12,40 15.506,20").unwrap();
        assert_eq!(q.quantity, dec("1250.5"));
        assert_eq!(q.unit.as_deref(), Some("m2"));
        assert_eq!(q.unit_price, dec("12.40"));
        assert_eq!(q.total_price, dec("15506.20"));
        assert!(q.rejected.is_empty());
    }

    #[test]
    fn test_quantity_only_and_case_insensitive_unit() {
        let q = matcher().match_line("3 STK").unwrap();
        assert_eq!(q.quantity, dec("3"));
        assert_eq!(q.unit.as_deref(), Some("STK"));
        assert_eq!(q.unit_price, None);
    }

    #[test]
    fn test_placeholder_prices_rejected() {
        let q = matcher().match_line("1 psch ________ n/a").unwrap();
        assert_eq!(q.quantity, dec("1"));
        assert_eq!(q.unit_price, None);
        assert_eq!(q.total_price, None);
        assert_eq!(q.rejected.len(), 2);
        assert_eq!(
            q.rejected[1],
            ExtractionError::UnparseableNumber {
                field: "total_price".to_string(),
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn test_price_pair_line() {
        let q = matcher().match_line("5,00 50,00").unwrap();
        assert_eq!(q.quantity, None);
        assert_eq!(q.unit_price, dec("5.00"));
        assert_eq!(q.total_price, dec("50.00"));
    }

    #[test]
    fn test_text_is_not_a_quantity_line() {
        assert!(matcher().match_line("2 Lagen Bitumenbahn").is_none());
        assert!(matcher().match_line("weitere Beschreibung").is_none());
        assert!(matcher().match_line("3 Stk Türen").is_none());
    }

    #[test]
    fn test_split_tail() {
        let (desc, q) = matcher().split_tail("Aushub 10 m3 5,00 50,00").unwrap();
        assert_eq!(desc, "Aushub");
        assert_eq!(q.quantity, dec("10"));
        assert_eq!(q.unit.as_deref(), Some("m3"));
        assert_eq!(q.total_price, dec("50.00"));

        assert!(matcher().split_tail("Erdarbeiten").is_none());
        assert!(matcher().split_tail("Rohr DN 100 2 m lang").is_none());
    }

    #[test]
    fn test_split_tail_needs_unit_price() {
        assert!(matcher().split_tail("Rohrgraben Tiefe 2 m").is_none());
        assert!(matcher().split_tail("Aushub 10 m3").is_none());

        let (desc, q) = matcher().split_tail("Rohrgraben Tiefe 2 m 12,00").unwrap();
        assert_eq!(desc, "Rohrgraben Tiefe");
        assert_eq!(q.unit_price, dec("12.00"));
        assert_eq!(q.total_price, None);
    }
}
