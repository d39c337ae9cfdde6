//! Table emitters
//!
//! Emitters turn a (usually permuted) pixel expression table into one of the
//! output encodings. They are pure and deterministic: emitting the same table
//! twice yields the same bytes.
//!
//! - [`binary`] - the raw byte tables loaded by the renderer
//! - [`text`] - human-readable reconstructions for regeneration and debugging

pub mod binary;
pub mod text;

pub use binary::{lite_offsets_table, offsets_table, weights_table};
pub use text::{lite_weights_text, offsets_text, switch_statement, weights_text};

use crate::error::TableError;
use crate::expr::{checked_total, Weights};

/// Fixed-point scale of the emitted weights: a full weight is 256.
pub const WEIGHT_SCALE: u32 = 256;

/// Multiplier that scales `weights` to sum to [`WEIGHT_SCALE`].
///
/// The sum must be a power of two that divides the scale, otherwise the
/// weights cannot be represented exactly.
pub fn scale_factor(weights: &Weights, index: usize, sub_pixel: usize) -> Result<u32, TableError> {
    let sum = checked_total(weights).unwrap_or(u32::MAX);
    if sum == 0 || !sum.is_power_of_two() || WEIGHT_SCALE % sum != 0 {
        return Err(TableError::InvariantViolation {
            index,
            sub_pixel,
            weights: *weights,
            rule: format!("sum {} does not divide {}", sum, WEIGHT_SCALE),
        });
    }
    Ok(WEIGHT_SCALE / sum)
}

/// Scale a weight and saturate it to a byte.
pub(crate) fn scaled_byte(weight: u32, factor: u32) -> u8 {
    (weight * factor).min(255) as u8
}
