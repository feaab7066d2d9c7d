//! Position extraction from the bill-of-quantities pages.

use regex::Regex;
use tracing::{debug, info, trace};

use super::rules::patterns::{normalize_whitespace, BOILERPLATE, PLACEHOLDER, POSITION_HEADER};
use super::rules::{starts_with_date, QuantityMatcher, Quantities};
use super::{LvExtractor, Result};
use crate::error::ExtractionError;
use crate::models::config::{PositionConfig, SectionConfig};
use crate::models::metadata::PageHeader;
use crate::models::page::PageText;
use crate::models::position::{segments_of, Position, PositionTable};

/// Scanner state between two lines.
#[derive(Debug)]
enum State {
    /// No position opened yet (preamble text).
    Seeking,
    /// A position is open and collects description and numbers.
    Accumulating { open: Position },
}

/// Output collected during one run.
#[derive(Debug, Default)]
struct Collected {
    table: PositionTable,
    /// Segments of the most recently opened position.
    last: Option<Vec<u32>>,
    warnings: Vec<ExtractionError>,
}

/// Extracts positions with a line-by-line state machine.
///
/// State carries across page boundaries, so a description interrupted by a
/// page break continues on the next page once the page furniture has been
/// skipped.
pub struct PositionExtractor {
    quantities: QuantityMatcher,
    /// Boilerplate patterns on top of the built-in ones.
    boilerplate: Vec<Regex>,
    /// Section keywords that end the position list.
    section_starts: Vec<Regex>,
    strip_placeholders: bool,
    reject_duplicate_numbers: bool,
}

impl PositionExtractor {
    /// Create an extractor from configuration.
    ///
    /// Fails with [`ExtractionError::InvalidPattern`] if a configured
    /// boilerplate pattern does not compile.
    pub fn new(config: &PositionConfig) -> Result<Self> {
        let quantities = QuantityMatcher::new(&config.units)?;

        let boilerplate = config
            .boilerplate_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ExtractionError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            quantities,
            boilerplate,
            section_starts: Vec::new(),
            strip_placeholders: config.strip_placeholders,
            reject_duplicate_numbers: config.reject_duplicate_numbers,
        })
    }

    /// Treat lines starting with the header's company name as boilerplate.
    pub fn with_header(mut self, header: &PageHeader) -> Self {
        let company = header.company.as_deref().map(str::trim).unwrap_or_default();
        if company.is_empty() {
            return self;
        }

        if let Ok(re) = Regex::new(&format!("(?i)^{}", regex::escape(company))) {
            debug!("Skipping lines starting with company name {:?}", company);
            self.boilerplate.push(re);
        }
        self
    }

    /// Close the open position at lines starting with a section keyword,
    /// e.g. "Schlussbemerkungen" after the last position.
    pub fn with_sections(mut self, config: &SectionConfig) -> Self {
        self.section_starts = config
            .sections
            .iter()
            .filter(|bounds| !bounds.start.trim().is_empty())
            .filter_map(|bounds| {
                Regex::new(&format!(r"(?i)^{}\b", regex::escape(bounds.start.trim()))).ok()
            })
            .collect();
        self
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        BOILERPLATE
            .iter()
            .chain(self.boilerplate.iter())
            .any(|re| re.is_match(line))
    }

    /// Advance the state machine by one trimmed, non-empty line.
    fn step(&self, state: State, line: &str, page: u32, out: &mut Collected) -> State {
        if self.is_boilerplate(line) {
            trace!("page {}: boilerplate {:?}", page, line);
            return state;
        }

        if self.section_starts.iter().any(|re| re.is_match(line)) {
            debug!("page {}: section start {:?}", page, line);
            if let State::Accumulating { open } = state {
                self.finish(open, out);
            }
            return State::Seeking;
        }

        // A pure numeric line is never read as description or header
        if let Some(quantities) = self.quantities.match_line(line) {
            return match state {
                State::Accumulating { mut open } => {
                    fill(&mut open, quantities, &mut out.warnings);
                    State::Accumulating { open }
                }
                State::Seeking => {
                    debug!("page {}: quantity line outside a position {:?}", page, line);
                    State::Seeking
                }
            };
        }

        // "01.04.2024 bis ..." on a cover page is a date, not a position
        if let Some(caps) = POSITION_HEADER.captures(line).filter(|_| !starts_with_date(line)) {
            let number = &caps[1];
            let text = caps.get(2).map_or("", |m| m.as_str());
            let segments = segments_of(number);

            // Inside a position, a number that does not advance is text
            let advances = out.last.as_ref().is_none_or(|last| segments > *last);
            return match state {
                State::Accumulating { open } if self.reject_duplicate_numbers && !advances => {
                    match self.fold_misread(open, &segments, out) {
                        Ok(()) => State::Accumulating {
                            open: self.open_position(number, text, page, out),
                        },
                        Err(open) => {
                            debug!("page {}: position {} out of order, reading as text", page, number);
                            append(open, line)
                        }
                    }
                }
                state => {
                    if let State::Accumulating { open } = state {
                        self.finish(open, out);
                    }
                    State::Accumulating {
                        open: self.open_position(number, text, page, out),
                    }
                }
            };
        }

        match state {
            State::Accumulating { open } => append(open, line),
            State::Seeking => {
                trace!("page {}: preamble {:?}", page, line);
                State::Seeking
            }
        }
    }

    /// Undo a position opened from a description line that happened to
    /// start with a number ("2 Lagen verschweisst").
    ///
    /// A header that falls between the previously emitted position and the
    /// open one proves the open one misread. Its text then goes back into
    /// the previous description and its numbers fill unset fields there.
    /// A misread first position is dropped. Returns the open position
    /// unchanged when no such fold applies.
    fn fold_misread(
        &self,
        open: Position,
        next: &[u32],
        out: &mut Collected,
    ) -> std::result::Result<(), Position> {
        if out.table.is_empty() {
            debug!("position {} misread from preamble", open.position_number);
            return Ok(());
        }

        let fits_previous = out
            .table
            .last()
            .is_some_and(|previous| next > previous.segments().as_slice());
        if !fits_previous {
            return Err(open);
        }
        let Some(mut previous) = out.table.pop() else {
            return Err(open);
        };

        debug!(
            "position {} misread from description of {}",
            open.position_number, previous.position_number
        );
        previous.description = format!(
            "{} {} {}",
            previous.description, open.position_number, open.description
        );
        let numbers = Quantities {
            quantity: open.quantity,
            unit: open.unit,
            unit_price: open.unit_price,
            total_price: open.total_price,
            rejected: Vec::new(),
        };
        fill(&mut previous, numbers, &mut out.warnings);
        self.finish(previous, out);
        Ok(())
    }

    fn open_position(&self, number: &str, text: &str, page: u32, out: &mut Collected) -> Position {
        let mut position = Position::new(number, page);
        out.last = Some(position.segments());

        match self.quantities.split_tail(text) {
            Some((description, quantities)) => {
                position.description = description.to_string();
                fill(&mut position, quantities, &mut out.warnings);
            }
            None => position.description = text.to_string(),
        }

        trace!("page {}: opened position {}", page, number);
        position
    }

    fn finish(&self, mut position: Position, out: &mut Collected) {
        if self.strip_placeholders {
            position.description = PLACEHOLDER.replace_all(&position.description, " ").into_owned();
        }
        position.description = normalize_whitespace(&position.description);

        debug!(
            "Position {} (level {}): {:?} qty={:?} unit={:?} ep={:?} gp={:?}",
            position.position_number,
            position.level,
            position.description,
            position.quantity,
            position.unit,
            position.unit_price,
            position.total_price
        );
        out.table.push(position);
    }
}

fn append(mut open: Position, line: &str) -> State {
    if !open.description.is_empty() {
        open.description.push(' ');
    }
    open.description.push_str(line);
    State::Accumulating { open }
}

/// Fill unset numeric fields of a position; already set fields are kept.
fn fill(position: &mut Position, quantities: Quantities, warnings: &mut Vec<ExtractionError>) {
    let Quantities {
        quantity,
        unit,
        unit_price,
        total_price,
        rejected,
    } = quantities;

    if position.quantity.is_none() {
        position.quantity = quantity;
    }
    if position.unit.is_none() {
        position.unit = unit;
    }
    if position.unit_price.is_none() {
        position.unit_price = unit_price;
    }
    if position.total_price.is_none() {
        position.total_price = total_price;
    }

    for error in rejected {
        debug!("position {}: {}", position.position_number, error);
        warnings.push(error);
    }
}

impl LvExtractor for PositionExtractor {
    type Output = PositionTable;

    fn extract_with_warnings(&self, pages: &[PageText]) -> (PositionTable, Vec<ExtractionError>) {
        let mut out = Collected::default();
        let mut state = State::Seeking;

        for page in pages {
            for line in page.content_lines() {
                state = self.step(state, line, page.number, &mut out);
            }
        }

        if let State::Accumulating { open } = state {
            self.finish(open, &mut out);
        }

        info!(
            "Extracted {} positions from {} pages ({} warnings)",
            out.table.len(),
            pages.len(),
            out.warnings.len()
        );

        (out.table, out.warnings)
    }
}
