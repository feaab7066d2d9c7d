//! Bill-of-quantities positions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the bill of quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Dotted hierarchical identifier, verbatim (e.g. "1.2.3").
    pub position_number: String,

    /// Depth in the hierarchy (number of dot-separated segments).
    pub level: u32,

    /// Accumulated multi-line description.
    pub description: String,

    /// Quantity (Menge).
    pub quantity: Option<Decimal>,

    /// Unit of measure (Einheit), e.g. "m2", "Stk".
    pub unit: Option<String>,

    /// Unit price (EP).
    pub unit_price: Option<Decimal>,

    /// Total price (GP).
    pub total_price: Option<Decimal>,

    /// Page on which the position starts (1-indexed).
    pub page: u32,
}

impl Position {
    /// Create an empty position for a dotted number.
    pub fn new(position_number: impl Into<String>, page: u32) -> Self {
        let position_number = position_number.into();
        let level = level_of(&position_number);
        Self {
            position_number,
            level,
            description: String::new(),
            quantity: None,
            unit: None,
            unit_price: None,
            total_price: None,
            page,
        }
    }

    /// Numeric segments of the position number.
    pub fn segments(&self) -> Vec<u32> {
        segments_of(&self.position_number)
    }

    /// Number of the enclosing position ("1.2" for "1.2.3"), `None` on level 1.
    pub fn parent_number(&self) -> Option<String> {
        let segments: Vec<&str> = self
            .position_number
            .split('.')
            .filter(|s| !s.is_empty())
            .collect();
        if segments.len() < 2 {
            return None;
        }
        Some(segments[..segments.len() - 1].join("."))
    }

    /// Check if any of quantity, unit or prices were found.
    pub fn has_quantities(&self) -> bool {
        self.quantity.is_some()
            || self.unit.is_some()
            || self.unit_price.is_some()
            || self.total_price.is_some()
    }

    /// Check if quantity, unit price and total price are all present.
    pub fn is_priced(&self) -> bool {
        self.quantity.is_some() && self.unit_price.is_some() && self.total_price.is_some()
    }

    /// Difference between the stated total and quantity × unit price.
    ///
    /// `None` unless all three values are present and the product fits
    /// into a `Decimal`.
    pub fn price_deviation(&self) -> Option<Decimal> {
        let expected = self.quantity?.checked_mul(self.unit_price?)?.round_dp(2);
        self.total_price?.checked_sub(expected)
    }
}

/// Numeric segments of a dotted number; empty segments are skipped, so
/// "1...3" gives `[1, 3]`.
pub fn segments_of(position_number: &str) -> Vec<u32> {
    position_number
        .split('.')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Level of a dotted position number: count of non-empty segments.
pub fn level_of(position_number: &str) -> u32 {
    position_number.split('.').filter(|s| !s.is_empty()).count() as u32
}

/// Positions of one document in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionTable {
    positions: Vec<Position>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    pub(crate) fn pop(&mut self) -> Option<Position> {
        self.positions.pop()
    }

    /// Most recently emitted position.
    pub fn last(&self) -> Option<&Position> {
        self.positions.last()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    pub fn into_vec(self) -> Vec<Position> {
        self.positions
    }

    /// Look up a position by its number.
    pub fn get(&self, position_number: &str) -> Option<&Position> {
        self.positions
            .iter()
            .find(|p| p.position_number == position_number)
    }

    /// Level-1 positions (main positions / sections).
    pub fn main_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| p.level == 1)
    }

    /// Direct children of a position.
    pub fn children_of<'a>(&'a self, position_number: &'a str) -> impl Iterator<Item = &'a Position> {
        self.positions
            .iter()
            .filter(move |p| p.parent_number().as_deref() == Some(position_number))
    }

    /// Sum of all total prices that were found.
    ///
    /// `None` if the sum overflows `Decimal`.
    pub fn total_price(&self) -> Option<Decimal> {
        self.positions
            .iter()
            .filter_map(|p| p.total_price)
            .try_fold(Decimal::ZERO, |sum, total| sum.checked_add(total))
    }

    /// Check the table and return any issues found.
    ///
    /// Reports totals that differ from quantity × unit price by more than
    /// `tolerance` and duplicated position numbers.
    pub fn validate(&self, tolerance: Decimal) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for position in &self.positions {
            if !seen.insert(position.position_number.as_str()) {
                issues.push(format!(
                    "Duplicate position number {}",
                    position.position_number
                ));
            }

            match position.price_deviation() {
                Some(deviation) if deviation.abs() > tolerance => {
                    issues.push(format!(
                        "Position {}: total price {} differs from quantity x unit price by {}",
                        position.position_number,
                        position.total_price.unwrap_or_default(),
                        deviation
                    ));
                }
                None if position.is_priced() => {
                    issues.push(format!(
                        "Position {}: quantity x unit price is out of range",
                        position.position_number
                    ));
                }
                _ => {}
            }
        }

        issues
    }
}

impl From<Vec<Position>> for PositionTable {
    fn from(positions: Vec<Position>) -> Self {
        Self { positions }
    }
}

impl IntoIterator for PositionTable {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.into_iter()
    }
}

impl<'a> IntoIterator for &'a PositionTable {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(number: &str, qty: i64, price: Decimal, total: Decimal) -> Position {
        let mut p = Position::new(number, 1);
        p.quantity = Some(Decimal::from(qty));
        p.unit_price = Some(price);
        p.total_price = Some(total);
        p
    }

    #[test]
    fn test_level_and_parent() {
        let p = Position::new("1.2.3", 1);
        assert_eq!(p.level, 3);
        assert_eq!(p.parent_number(), Some("1.2".to_string()));
        assert_eq!(p.segments(), vec![1, 2, 3]);

        let main = Position::new("4", 1);
        assert_eq!(main.level, 1);
        assert_eq!(main.parent_number(), None);
    }

    #[test]
    fn test_level_ignores_empty_segments() {
        assert_eq!(level_of("1...3"), 2);
        assert_eq!(Position::new("1...3", 1).parent_number(), Some("1".to_string()));
    }

    #[test]
    fn test_price_deviation() {
        let ok = priced("1.1", 10, Decimal::new(500, 2), Decimal::new(5000, 2));
        assert_eq!(ok.price_deviation(), Some(Decimal::ZERO));

        let off = priced("1.2", 5, Decimal::new(300, 2), Decimal::new(1600, 2));
        assert_eq!(off.price_deviation(), Some(Decimal::new(100, 2)));

        assert_eq!(Position::new("1", 1).price_deviation(), None);
    }

    #[test]
    fn test_validate_reports_issues() {
        let table = PositionTable::from(vec![
            priced("1.1", 10, Decimal::new(500, 2), Decimal::new(5000, 2)),
            priced("1.2", 5, Decimal::new(300, 2), Decimal::new(1600, 2)),
            Position::new("1.1", 2),
        ]);

        let issues = table.validate(Decimal::new(1, 2));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.contains("Duplicate position number 1.1")));
        assert!(issues.iter().any(|i| i.starts_with("Position 1.2")));
    }

    #[test]
    fn test_oversized_numbers_do_not_panic() {
        let huge: Decimal = "99999999999999999999".parse().unwrap();
        let price: Decimal = "99999999999999.00".parse().unwrap();
        let p = priced("1.1", 1, price, Decimal::new(100, 2));
        let p = Position { quantity: Some(huge), ..p };

        assert_eq!(p.price_deviation(), None);

        let issues = PositionTable::from(vec![p]).validate(Decimal::new(1, 2));
        assert_eq!(issues, vec!["Position 1.1: quantity x unit price is out of range"]);
    }

    #[test]
    fn test_total_price() {
        let table = PositionTable::from(vec![
            priced("1.1", 10, Decimal::new(500, 2), Decimal::new(5000, 2)),
            Position::new("1.2", 1),
            priced("1.3", 5, Decimal::new(300, 2), Decimal::new(1500, 2)),
        ]);
        assert_eq!(table.total_price(), Some(Decimal::new(6500, 2)));
        assert_eq!(PositionTable::new().total_price(), Some(Decimal::ZERO));

        let big: Decimal = "50000000000000000000000000000".parse().unwrap();
        let table = PositionTable::from(vec![
            priced("1", 1, big, big),
            priced("2", 1, big, big),
        ]);
        assert_eq!(table.total_price(), None);
    }

    #[test]
    fn test_hierarchy_helpers() {
        let table = PositionTable::from(vec![
            Position::new("1", 1),
            Position::new("1.1", 1),
            Position::new("1.1.1", 1),
            Position::new("1.2", 1),
            Position::new("2", 2),
        ]);

        let mains: Vec<&str> = table.main_positions().map(|p| p.position_number.as_str()).collect();
        assert_eq!(mains, vec!["1", "2"]);

        let children: Vec<&str> = table.children_of("1").map(|p| p.position_number.as_str()).collect();
        assert_eq!(children, vec!["1.1", "1.2"]);
        assert!(table.get("1.1.1").is_some());
    }
}
