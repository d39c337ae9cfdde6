//! Neighbour classification for weighted sums
//!
//! The renderer does not blend nine texels per sub-pixel. It samples the
//! centre plus at most two neighbours, located by their position in the 3x3
//! grid. This module finds those neighbours.

use crate::error::TableError;
use crate::expr::{Weights, CENTER, NUM_NEIGHBOURS};

/// Up to two non-centre neighbour slots, in slot order.
pub type Neighbours = [Option<usize>; 2];

/// Find the non-centre neighbours a weighted sum depends on.
///
/// Returns `[None, None]` for a centre-only blend. More than two non-centre
/// neighbours cannot be encoded and is reported as an invariant violation
/// for `(index, sub_pixel)`.
///
/// # Examples
///
/// ```
/// use hq4gen::expr::parse_expr;
/// use hq4gen::neighbours::compute_neighbours;
///
/// let weights = parse_expr("interpolate<1,1>(c2,c6)").unwrap();
/// assert_eq!(compute_neighbours(&weights, 0, 0).unwrap(), [Some(1), Some(5)]);
/// ```
pub fn compute_neighbours(
    weights: &Weights,
    index: usize,
    sub_pixel: usize,
) -> Result<Neighbours, TableError> {
    let mut found = (0..NUM_NEIGHBOURS).filter(|&slot| slot != CENTER && weights[slot] != 0);
    let neighbours = [found.next(), found.next()];
    if found.next().is_some() {
        return Err(TableError::InvariantViolation {
            index,
            sub_pixel,
            weights: *weights,
            rule: "at most two non-centre neighbours can be encoded".to_string(),
        });
    }
    Ok(neighbours)
}

/// Grid column and row of a neighbour slot; the centre when absent.
pub fn grid_position(slot: Option<usize>) -> (u32, u32) {
    match slot {
        Some(slot) => ((slot % 3) as u32, (slot / 3) as u32),
        None => (1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expr;

    #[test]
    fn test_center_only() {
        let w = parse_expr("c5").unwrap();
        assert_eq!(compute_neighbours(&w, 0, 0).unwrap(), [None, None]);
    }

    #[test]
    fn test_single_neighbour() {
        let w = parse_expr("interpolate<3,1>(c5,c4)").unwrap();
        assert_eq!(compute_neighbours(&w, 0, 0).unwrap(), [Some(3), None]);
        // A lone non-centre reference is still a neighbour.
        let w = parse_expr("c1").unwrap();
        assert_eq!(compute_neighbours(&w, 0, 0).unwrap(), [Some(0), None]);
    }

    #[test]
    fn test_two_neighbours_in_slot_order() {
        let w = parse_expr("interpolate<2,1,1>(c5,c6,c2)").unwrap();
        assert_eq!(compute_neighbours(&w, 0, 0).unwrap(), [Some(1), Some(5)]);
    }

    #[test]
    fn test_three_neighbours_rejected() {
        let w = parse_expr("interpolate<2,1,1>(c1,c2,c3)").unwrap();
        let err = compute_neighbours(&w, 7, 3).unwrap_err();
        assert!(matches!(err, TableError::InvariantViolation { index: 7, sub_pixel: 3, .. }));
    }

    #[test]
    fn test_grid_position() {
        assert_eq!(grid_position(None), (1, 1));
        assert_eq!(grid_position(Some(0)), (0, 0));
        assert_eq!(grid_position(Some(5)), (2, 1));
        assert_eq!(grid_position(Some(7)), (1, 2));
    }
}
