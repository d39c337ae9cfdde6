//! Structural checks over a parsed pixel expression table
//!
//! Every weighted sum must sum to a power of two (the renderer divides by
//! shifting), use at most three weights, and include the centre when it uses
//! three.
//!
//! Two stricter properties hold for the HQ2x rules but are violated by some
//! of the HQ4x rules. They stay available through [`SanityOptions`] so a
//! corrected rule set can turn them back on:
//!
//! - the centre weight is never zero;
//! - a sub-pixel only depends on the centre and the three neighbours in the
//!   direction of its quadrant.

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::expr::{check_weights, PixelExprTable, Weights, CENTER, NUM_NEIGHBOURS};

/// Neighbours (1-based) a sub-pixel may depend on, per quadrant:
/// top-left, top-right, bottom-left, bottom-right.
const QUADRANT_SUBSETS: [[usize; 4]; 4] = [[5, 4, 2, 1], [5, 6, 2, 3], [5, 4, 8, 7], [5, 6, 8, 9]];

/// Opt-in checks on top of the mandatory invariants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityOptions {
    /// Require a non-zero centre weight in every sum
    #[serde(default)]
    pub center_always_weighted: bool,
    /// Require each sub-pixel to stay within its quadrant's neighbours
    #[serde(default)]
    pub directional_subsets: bool,
}

/// Validate a table with the mandatory checks only.
pub fn sanity_check(table: &PixelExprTable) -> Result<(), TableError> {
    sanity_check_with(table, &SanityOptions::default())
}

/// Validate a table, failing on the first violation.
pub fn sanity_check_with(
    table: &PixelExprTable,
    options: &SanityOptions,
) -> Result<(), TableError> {
    for (index, sub_pixel, weights) in table.iter_weights() {
        check_weights(index, sub_pixel, weights)?;
        if options.center_always_weighted {
            check_center_weighted(index, sub_pixel, weights)?;
        }
        if options.directional_subsets {
            check_directional_subset(index, sub_pixel, weights)?;
        }
    }
    Ok(())
}

fn check_center_weighted(
    index: usize,
    sub_pixel: usize,
    weights: &Weights,
) -> Result<(), TableError> {
    if weights[CENTER] == 0 {
        return Err(TableError::InvariantViolation {
            index,
            sub_pixel,
            weights: *weights,
            rule: "centre weight must be non-zero".to_string(),
        });
    }
    Ok(())
}

/// Quadrant of a sub-pixel in the 4x4 output block.
fn quadrant(sub_pixel: usize) -> usize {
    let (column, row) = (sub_pixel % 4, sub_pixel / 4);
    (row / 2) * 2 + column / 2
}

fn check_directional_subset(
    index: usize,
    sub_pixel: usize,
    weights: &Weights,
) -> Result<(), TableError> {
    let subset = &QUADRANT_SUBSETS[quadrant(sub_pixel)];
    for slot in 0..NUM_NEIGHBOURS {
        if weights[slot] != 0 && !subset.contains(&(slot + 1)) {
            return Err(TableError::InvariantViolation {
                index,
                sub_pixel,
                weights: *weights,
                rule: format!("c{} is outside the quadrant neighbours {:?}", slot + 1, subset),
            });
        }
    }
    Ok(())
}
