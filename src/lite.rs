//! Two-tap ("lite") reduction of a pixel expression table
//!
//! The lite renderer samples a single bilinear texel pair per sub-pixel, so a
//! blend may only use the centre and one horizontal neighbour (c4 or c6).
//! Reduction folds the top and bottom rows of the neighbourhood into the
//! middle row, then, when both side taps remain, keeps the heavier one and
//! folds the other into the centre. The sum of weights never changes.

use crate::expr::{PixelExprTable, Weights, CENTER, NUM_WEIGHTS};

const LEFT: usize = 3;
const RIGHT: usize = 5;

/// Reduce every weighted sum of `table` in place.
///
/// `prefer_right` lists the sub-pixels that keep the right tap (c6) when both
/// taps weigh the same; all others keep the left tap (c4).
pub fn make_lite(mut table: PixelExprTable, prefer_right: &[usize]) -> PixelExprTable {
    for expr in table.rows_mut() {
        for (sub_pixel, weights) in expr.iter_mut().enumerate() {
            *weights = reduce(weights, prefer_right.contains(&sub_pixel));
        }
    }
    table
}

/// Reduce one weighted sum to at most the centre plus one side tap.
pub fn reduce(weights: &Weights, prefer_right: bool) -> Weights {
    let column =
        |c: usize| weights[c].saturating_add(weights[c + 3]).saturating_add(weights[c + 6]);
    let mut left = column(0);
    let mut center = column(1);
    let mut right = column(2);

    if left != 0 && right != 0 {
        let keep_right = right > left || (right == left && prefer_right);
        if keep_right {
            center = center.saturating_add(left);
            left = 0;
        } else {
            center = center.saturating_add(right);
            right = 0;
        }
    }

    let mut reduced = [0; NUM_WEIGHTS];
    reduced[LEFT] = left;
    reduced[CENTER] = center;
    reduced[RIGHT] = right;
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{parse_expr, total, NUM_SUB_PIXELS};

    #[test]
    fn test_vertical_neighbours_fold_into_center() {
        let w = parse_expr("interpolate<2,1,1>(c5,c2,c8)").unwrap();
        let mut expected = [0; NUM_WEIGHTS];
        expected[CENTER] = 4;
        assert_eq!(reduce(&w, false), expected);
    }

    #[test]
    fn test_diagonals_fold_into_their_column() {
        let w = parse_expr("interpolate<2,1,1>(c5,c1,c4)").unwrap();
        let reduced = reduce(&w, false);
        assert_eq!(reduced[LEFT], 2);
        assert_eq!(reduced[CENTER], 2);
        assert_eq!(reduced[RIGHT], 0);
    }

    #[test]
    fn test_heavier_side_wins() {
        let w = parse_expr("interpolate<1,2,1>(c5,c6,c4)").unwrap();
        let reduced = reduce(&w, false);
        assert_eq!((reduced[LEFT], reduced[CENTER], reduced[RIGHT]), (0, 2, 2));

        // Preferring c6 does not override a heavier c4.
        let w = parse_expr("interpolate<1,2,1>(c5,c4,c6)").unwrap();
        let reduced = reduce(&w, true);
        assert_eq!((reduced[LEFT], reduced[CENTER], reduced[RIGHT]), (2, 2, 0));
    }

    #[test]
    fn test_ties_follow_preference() {
        let w = parse_expr("interpolate<2,1,1>(c5,c4,c6)").unwrap();
        let left = reduce(&w, false);
        assert_eq!((left[LEFT], left[CENTER], left[RIGHT]), (1, 3, 0));
        let right = reduce(&w, true);
        assert_eq!((right[LEFT], right[CENTER], right[RIGHT]), (0, 3, 1));
    }

    #[test]
    fn test_make_lite_preserves_sums() {
        let w = parse_expr("interpolate<2,1,1>(c5,c4,c6)").unwrap();
        let table = PixelExprTable::uniform([w; NUM_SUB_PIXELS]);
        let lite = make_lite(table, &[2, 3]);
        let row = lite.row(0);
        assert_eq!(row[0][LEFT], 1);
        assert_eq!(row[2][RIGHT], 1);
        for weights in row.iter() {
            assert_eq!(total(weights), 4);
        }
    }
}
