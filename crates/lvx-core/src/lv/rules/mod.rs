//! Rule-based extractors for LV documents.

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod patterns;
pub mod quantities;

pub use amounts::{format_german_decimal, parse_german_decimal, AmountExtractor};
pub use dates::{parse_date, starts_with_date, DateExtractor};
pub use fields::{FieldRule, FIELD_RULES};
pub use quantities::{QuantityMatcher, Quantities};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with where it was found.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
