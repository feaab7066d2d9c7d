//! Page text as delivered by a page source.

use serde::{Deserialize, Serialize};

/// Raw text lines of one document page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed).
    pub number: u32,
    /// Lines in reading order, untrimmed.
    pub lines: Vec<String>,
}

impl PageText {
    /// Create a page from already split lines.
    pub fn new(number: u32, lines: Vec<String>) -> Self {
        Self { number, lines }
    }

    /// Create a page by splitting a text block into lines.
    pub fn from_text(number: u32, text: &str) -> Self {
        Self {
            number,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Iterate over trimmed, non-empty lines.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty())
    }

    /// Page text joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.content_lines().next().is_none()
    }
}

/// Build pages from a sequence of line slices, numbering them from 1.
pub fn pages_from_lines<S: AsRef<str>>(pages: &[Vec<S>]) -> Vec<PageText> {
    pages
        .iter()
        .enumerate()
        .map(|(i, lines)| {
            PageText::new(
                i as u32 + 1,
                lines.iter().map(|l| l.as_ref().to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_skip_blank() {
        let page = PageText::from_text(1, "  Projekt: A  \n\n   \nBauherr: B");
        let lines: Vec<&str> = page.content_lines().collect();
        assert_eq!(lines, vec!["Projekt: A", "Bauherr: B"]);
        assert!(!page.is_blank());
        assert!(PageText::from_text(2, " \n ").is_blank());
    }

    #[test]
    fn test_pages_from_lines_numbering() {
        let pages = pages_from_lines(&[vec!["a"], vec!["b", "c"]]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].lines, vec!["b".to_string(), "c".to_string()]);
    }
}
