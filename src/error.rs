//! Error types for table generation

use crate::expr::{Weights, SUB_CASE_BITS};
use thiserror::Error;

/// Error raised while parsing, validating or deriving a pixel expression table.
///
/// Every variant is fatal: the generator either produces complete tables or
/// nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A line of the pseudocode could not be interpreted
    #[error("line {line}: {message}: '{text}'")]
    Syntax { line: usize, text: String, message: String },
    /// The pseudocode ended before the switch block was complete
    #[error("{0}")]
    Structure(String),
    /// A table slot was never assigned an expression
    #[error(
        "row {index} (case {case}, sub-case {sub_case}) has no expression for pixel{sub_pixel:x}",
        case = *index >> SUB_CASE_BITS,
        sub_case = *index & ((1 << SUB_CASE_BITS) - 1)
    )]
    Incomplete { index: usize, sub_pixel: usize },
    /// A weighted sum breaks a structural invariant
    #[error("row {index}, sub-pixel {sub_pixel}: {rule} (weights {weights:?})")]
    InvariantViolation { index: usize, sub_pixel: usize, weights: Weights, rule: String },
    /// A variant reduction mode that has no implementation was requested
    #[error("narrow variants are not supported")]
    UnsupportedVariant,
}
