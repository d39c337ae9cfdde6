//! Case-block parser for the HQ4x interpolation pseudocode
//!
//! The reference rules are written as the body of a C-like
//! `switch (pattern) { ... }` block:
//!
//! ```text
//! switch (pattern) {
//! case 0:
//! case 1:
//!     pixel0 = interpolate<2,1,1>(c5,c4,c2);
//!     if (edge(c2, c6)) {
//!         pixel3 = c5;
//!     } else {
//!         //pixel3 = interpolate<3,1>(c5,c6);
//!     }
//!     break;
//! }
//! ```
//!
//! Each `case` label selects the upper 8 bits of a row index. Nested
//! `if (edge(..))` blocks select which of the 16 sub-cases (the lower 4 bits)
//! the assignments apply to. Commented-out `//pixel` assignments are
//! re-activated: they are inert for a C compiler but belong to the table.
//!
//! Lines are first classified into a [`Statement`], then applied by a small
//! state machine ([`ScanState`]).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TableError;
use crate::expr::{
    parse_expr, row_index, CaseExpr, PixelExprTable, Weights, NUM_CASE_LABELS, NUM_ROWS,
    NUM_SUB_PIXELS,
};

/// Line that opens the block of interest.
pub const SWITCH_HEADER: &str = "switch (pattern) {";

/// Prefix of assignments that are commented out in the reference source.
const COMMENTED_PIXEL_PREFIX: &str = "//pixel";

static CASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^case\s+(\S+?)\s*:$").unwrap());

static ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^pixel([0-9a-fA-F])\s*=\s*(.+?)\s*;$").unwrap());

static EDGE_IF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^if\s*\(\s*edge\s*\(\s*(\S+?)\s*,\s*(\S+?)\s*\)\s*\)\s*\{$").unwrap()
});

static ELSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\}\s*else\s*\{$").unwrap());

/// Sub-case bit selected by each `edge(cA, cB)` condition.
const EDGE_BITS: [((usize, usize), usize); 4] =
    [((2, 6), 0), ((6, 8), 1), ((8, 4), 2), ((4, 2), 3)];

/// A classified line of the switch body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `case N:`
    Case(usize),
    /// `pixelX = EXPR;`
    Assign { sub_pixel: usize, weights: Weights },
    /// `if (edge(cA, cB)) {`, carrying the selected sub-case bit
    EdgeIf { bit: usize },
    /// `} else {`
    Else,
    /// `}`
    Close,
    /// `break;`
    Break,
    /// `default:`
    Default,
    /// Blank line or comment
    Blank,
}

/// Classify one trimmed line of the switch body.
///
/// Lines starting with `//pixel` must already have their comment marker
/// removed; any other comment classifies as [`Statement::Blank`].
pub fn classify(line: &str) -> Result<Statement, String> {
    if line.is_empty() || line.starts_with("//") {
        return Ok(Statement::Blank);
    }
    match line {
        "}" => return Ok(Statement::Close),
        "break;" => return Ok(Statement::Break),
        "default:" => return Ok(Statement::Default),
        _ => {}
    }
    if ELSE_RE.is_match(line) {
        return Ok(Statement::Else);
    }
    if let Some(caps) = CASE_RE.captures(line) {
        let label = &caps[1];
        let case = label
            .parse::<usize>()
            .map_err(|_| format!("cannot parse '{}' as a case label", label))?;
        if case >= NUM_CASE_LABELS {
            return Err(format!("case label {} is outside 0..{}", case, NUM_CASE_LABELS));
        }
        return Ok(Statement::Case(case));
    }
    if let Some(caps) = ASSIGN_RE.captures(line) {
        let sub_pixel = usize::from_str_radix(&caps[1], 16)
            .map_err(|_| format!("cannot parse '{}' as a sub-pixel", &caps[1]))?;
        let weights = parse_expr(&caps[2])?;
        return Ok(Statement::Assign { sub_pixel, weights });
    }
    if let Some(caps) = EDGE_IF_RE.captures(line) {
        let pixels = (parse_edge_pixel(&caps[1])?, parse_edge_pixel(&caps[2])?);
        let bit = EDGE_BITS
            .iter()
            .find(|(pair, _)| *pair == pixels)
            .map(|(_, bit)| *bit)
            .ok_or_else(|| format!("unexpected edge(c{}, c{})", pixels.0, pixels.1))?;
        return Ok(Statement::EdgeIf { bit });
    }
    Err("unrecognized statement".to_string())
}

fn parse_edge_pixel(s: &str) -> Result<usize, String> {
    let digits = s.strip_prefix('c').ok_or_else(|| format!("expected 'cN', got '{}'", s))?;
    digits.parse::<usize>().map_err(|_| format!("cannot parse '{}' as a pixel number", digits))
}

/// Position of the scanner relative to the switch block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Before the switch header
    Outside,
    /// Directly inside the switch body
    InSwitch,
    /// Inside the `if` branch of an edge condition
    InIf,
    /// Inside the `else` branch of an edge condition
    InElse,
    /// Inside the trailing `default:` arm
    InDefault,
    /// After the switch body closed
    Done,
}

/// Set of sub-cases, one bit per sub-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubCaseSet(u16);

impl SubCaseSet {
    /// Every sub-case.
    pub const ALL: SubCaseSet = SubCaseSet(u16::MAX);

    /// The sub-cases that have `bit` set.
    pub fn with_bit(bit: usize) -> Self {
        let mut mask = 0u16;
        for sub_case in 0..NUM_SUB_PIXELS {
            if sub_case & (1 << bit) != 0 {
                mask |= 1 << sub_case;
            }
        }
        SubCaseSet(mask)
    }

    pub fn complement(self) -> Self {
        SubCaseSet(!self.0)
    }

    pub fn contains(self, sub_case: usize) -> bool {
        self.0 & (1 << sub_case) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..NUM_SUB_PIXELS).filter(move |&sub_case| self.contains(sub_case))
    }
}

/// Mutable parser state threaded through the statement handlers.
struct Parser {
    state: ScanState,
    cases: Vec<usize>,
    sub_cases: SubCaseSet,
    slots: Vec<[Option<Weights>; NUM_SUB_PIXELS]>,
}

impl Parser {
    fn new() -> Self {
        Self {
            state: ScanState::Outside,
            cases: Vec::new(),
            sub_cases: SubCaseSet::ALL,
            slots: vec![[None; NUM_SUB_PIXELS]; NUM_ROWS],
        }
    }

    /// Feed one trimmed line. Errors are plain messages; the caller adds
    /// line information.
    fn feed(&mut self, line: &str) -> Result<(), String> {
        if self.state == ScanState::Outside {
            if line == SWITCH_HEADER {
                self.state = ScanState::InSwitch;
            }
            return Ok(());
        }

        let line = if line.starts_with(COMMENTED_PIXEL_PREFIX) { &line[2..] } else { line };

        if self.state == ScanState::InDefault {
            if line == "}" {
                self.state = ScanState::Done;
            }
            return Ok(());
        }

        match classify(line)? {
            Statement::Blank => {}
            Statement::Case(case) => self.cases.push(case),
            Statement::Assign { sub_pixel, weights } => {
                if self.cases.is_empty() {
                    return Err("assignment outside of a case group".to_string());
                }
                for &case in &self.cases {
                    for sub_case in self.sub_cases.iter() {
                        self.slots[row_index(case, sub_case)][sub_pixel] = Some(weights);
                    }
                }
            }
            Statement::EdgeIf { bit } => {
                if self.state != ScanState::InSwitch {
                    return Err("nested edge conditions are not supported".to_string());
                }
                self.state = ScanState::InIf;
                self.sub_cases = SubCaseSet::with_bit(bit);
            }
            Statement::Else => {
                if self.state != ScanState::InIf {
                    return Err("'else' without a matching edge condition".to_string());
                }
                self.state = ScanState::InElse;
                self.sub_cases = self.sub_cases.complement();
            }
            Statement::Close => match self.state {
                ScanState::InIf | ScanState::InElse => {
                    self.state = ScanState::InSwitch;
                    self.sub_cases = SubCaseSet::ALL;
                }
                _ => self.state = ScanState::Done,
            },
            Statement::Break => {
                self.cases.clear();
                self.sub_cases = SubCaseSet::ALL;
            }
            Statement::Default => {
                if self.state != ScanState::InSwitch {
                    return Err("'default:' inside an edge condition".to_string());
                }
                self.cases.clear();
                self.state = ScanState::InDefault;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<PixelExprTable, TableError> {
        match self.state {
            ScanState::Done => {}
            ScanState::Outside => {
                return Err(TableError::Structure(format!("no '{}' header found", SWITCH_HEADER)))
            }
            _ => return Err(TableError::Structure("switch block is never closed".to_string())),
        }

        let mut rows = Vec::with_capacity(NUM_ROWS);
        for (index, slots) in self.slots.into_iter().enumerate() {
            let mut expr: CaseExpr = [[0; 16]; NUM_SUB_PIXELS];
            for (sub_pixel, slot) in slots.into_iter().enumerate() {
                expr[sub_pixel] = slot.ok_or(TableError::Incomplete { index, sub_pixel })?;
            }
            rows.push(expr);
        }
        Ok(PixelExprTable::from_rows(rows))
    }
}

/// Parse a sequence of pseudocode lines into a complete table.
///
/// Lines before the switch header are skipped; scanning stops at the brace
/// that closes the switch.
pub fn parse_lines<I, S>(lines: I) -> Result<PixelExprTable, TableError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new();
    for (number, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        parser.feed(line).map_err(|message| TableError::Syntax {
            line: number + 1,
            text: line.to_string(),
            message,
        })?;
        if parser.state == ScanState::Done {
            break;
        }
    }
    parser.finish()
}

/// Parse pseudocode source text into a complete table.
pub fn parse_str(source: &str) -> Result<PixelExprTable, TableError> {
    parse_lines(source.lines())
}
