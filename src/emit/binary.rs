//! Raw byte tables for the renderer
//!
//! All tables are headerless and row-major: row index, then sub-pixel.
//!
//! | Table        | Bytes per sub-pixel                      |
//! |--------------|------------------------------------------|
//! | offsets      | `x1, y1, x2, y2` for the two neighbours  |
//! | weights      | `w1, w2, w_center`                       |
//! | lite offsets | `x, y` of a single bilinear sample       |
//!
//! Offsets are in 1/128 texel units relative to the top-left neighbour, so
//! 128 is the centre texel. Weights are scaled so that a full weight is 256
//! and saturated to 255.

use crate::error::TableError;
use crate::expr::{PixelExprTable, CENTER, NUM_ROWS, NUM_SUB_PIXELS};
use crate::neighbours::{compute_neighbours, grid_position};

use super::{scale_factor, scaled_byte};

/// Size of the offsets table in bytes.
pub const OFFSETS_LEN: usize = NUM_ROWS * NUM_SUB_PIXELS * 4;

/// Size of the weights table in bytes.
pub const WEIGHTS_LEN: usize = NUM_ROWS * NUM_SUB_PIXELS * 3;

/// Size of the lite offsets table in bytes.
pub const LITE_OFFSETS_LEN: usize = NUM_ROWS * NUM_SUB_PIXELS * 2;

/// Horizontal sample position of each sub-pixel relative to the centre.
const LITE_OFFSET_X: [i32; NUM_SUB_PIXELS] =
    [48, 16, -16, -48, 48, 16, -16, -48, 48, 16, -16, -48, 48, 16, -16, -48];

/// Vertical sample position of each sub-pixel relative to the centre.
const LITE_OFFSET_Y: [i32; NUM_SUB_PIXELS] =
    [48, 48, 48, 48, 16, 16, 16, 16, -16, -16, -16, -16, -48, -48, -48, -48];

/// Slots that must be empty in a lite table.
const LITE_EMPTY_SLOTS: [usize; 6] = [0, 1, 2, 6, 7, 8];

fn grid_byte(coordinate: u32) -> u8 {
    (coordinate * 128).min(255) as u8
}

/// Emit the neighbour offsets of a full-precision table.
pub fn offsets_table(table: &PixelExprTable) -> Result<Vec<u8>, TableError> {
    let mut out = Vec::with_capacity(OFFSETS_LEN);
    for (index, sub_pixel, weights) in table.iter_weights() {
        for neighbour in compute_neighbours(weights, index, sub_pixel)? {
            let (x, y) = grid_position(neighbour);
            out.push(grid_byte(x));
            out.push(grid_byte(y));
        }
    }
    Ok(out)
}

/// Emit the neighbour and centre weights of a full-precision table.
pub fn weights_table(table: &PixelExprTable) -> Result<Vec<u8>, TableError> {
    let mut out = Vec::with_capacity(WEIGHTS_LEN);
    for (index, sub_pixel, weights) in table.iter_weights() {
        let factor = scale_factor(weights, index, sub_pixel)?;
        let [first, second] = compute_neighbours(weights, index, sub_pixel)?;
        for slot in [first, second] {
            out.push(slot.map_or(0, |slot| scaled_byte(weights[slot], factor)));
        }
        out.push(scaled_byte(weights[CENTER], factor));
    }
    Ok(out)
}

/// Emit the sample offsets of a lite table.
///
/// The lite renderer lets bilinear filtering do the blending, so a sub-pixel
/// becomes a single sample point shifted from its base position towards the
/// weighted side tap. Tables that were not reduced with
/// [`make_lite`](crate::lite::make_lite) are rejected.
pub fn lite_offsets_table(table: &PixelExprTable) -> Result<Vec<u8>, TableError> {
    let mut out = Vec::with_capacity(LITE_OFFSETS_LEN);
    for (index, sub_pixel, weights) in table.iter_weights() {
        let violation = |rule: &str| TableError::InvariantViolation {
            index,
            sub_pixel,
            weights: *weights,
            rule: rule.to_string(),
        };
        if LITE_EMPTY_SLOTS.iter().any(|&slot| weights[slot] != 0) {
            return Err(violation("lite weights may only use c4, c5 and c6"));
        }
        if weights[3] != 0 && weights[5] != 0 {
            return Err(violation("lite weights may use only one of c4 and c6"));
        }

        let sum = (super::WEIGHT_SCALE / scale_factor(weights, index, sub_pixel)?) as i32;
        let mut x = LITE_OFFSET_X[sub_pixel] + 128;
        let y = LITE_OFFSET_Y[sub_pixel] + 128;
        if weights[5] == 0 {
            x -= 128 * weights[3] as i32 / sum;
        } else {
            x += 128 * weights[5] as i32 / sum;
        }
        out.push(x.clamp(0, 255) as u8);
        out.push(y.clamp(0, 255) as u8);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{parse_expr, Weights};

    fn uniform(expr: &str) -> PixelExprTable {
        PixelExprTable::uniform([parse_expr(expr).unwrap(); NUM_SUB_PIXELS])
    }

    fn with_sub_pixel(base: &str, sub_pixel: usize, expr: &str) -> PixelExprTable {
        let mut row = [parse_expr(base).unwrap(); NUM_SUB_PIXELS];
        row[sub_pixel] = parse_expr(expr).unwrap();
        PixelExprTable::uniform(row)
    }

    #[test]
    fn test_center_only_tables() {
        let table = uniform("c5");
        let offsets = offsets_table(&table).unwrap();
        assert_eq!(offsets.len(), OFFSETS_LEN);
        assert!(offsets.iter().all(|&b| b == 128));

        let weights = weights_table(&table).unwrap();
        assert_eq!(weights.len(), WEIGHTS_LEN);
        assert!(weights.chunks(3).all(|c| c == [0, 0, 255]));
    }

    #[test]
    fn test_two_neighbour_encoding() {
        let table = uniform("interpolate<1,1>(c2,c6)");
        // c2 is column 1 row 0, c6 is column 2 row 1.
        assert_eq!(&offsets_table(&table).unwrap()[..4], &[128, 0, 255, 128]);
        assert_eq!(&weights_table(&table).unwrap()[..3], &[128, 128, 0]);
    }

    #[test]
    fn test_weighted_blend() {
        let table = uniform("interpolate<6,1,1>(c5,c4,c8)");
        assert_eq!(&offsets_table(&table).unwrap()[..4], &[0, 128, 128, 255]);
        assert_eq!(&weights_table(&table).unwrap()[..3], &[32, 32, 192]);
    }

    #[test]
    fn test_weights_reject_invalid_sum() {
        let table = with_sub_pixel("c5", 5, "interpolate<2,1>(c5,c4)");
        assert!(matches!(
            weights_table(&table),
            Err(TableError::InvariantViolation { index: 0, sub_pixel: 5, .. })
        ));
    }

    #[test]
    fn test_lite_offsets_center_only() {
        let bytes = lite_offsets_table(&uniform("c5")).unwrap();
        assert_eq!(bytes.len(), LITE_OFFSETS_LEN);
        let expected: Vec<u8> = (0..NUM_SUB_PIXELS)
            .flat_map(|p| [(LITE_OFFSET_X[p] + 128) as u8, (LITE_OFFSET_Y[p] + 128) as u8])
            .collect();
        assert_eq!(&bytes[..32], expected.as_slice());
    }

    #[test]
    fn test_lite_offsets_shift_towards_tap() {
        let table = uniform("interpolate<3,1>(c5,c6)");
        let bytes = lite_offsets_table(&table).unwrap();
        // Sub-pixel 0: 176 + 128 / 4.
        assert_eq!(&bytes[..2], &[208, 176]);

        let table = uniform("interpolate<1,1>(c5,c4)");
        let bytes = lite_offsets_table(&table).unwrap();
        // Sub-pixel 1: 144 - 64.
        assert_eq!(&bytes[2..4], &[80, 176]);
    }

    #[test]
    fn test_lite_offsets_clamp() {
        let bytes = lite_offsets_table(&uniform("c4")).unwrap();
        // Sub-pixel 3 would land at 80 - 128.
        assert_eq!(bytes[6], 0);
        let bytes = lite_offsets_table(&uniform("c6")).unwrap();
        assert_eq!(bytes[0], 255);
    }

    #[test]
    fn test_lite_offsets_reject_unreduced_weights() {
        for slot in LITE_EMPTY_SLOTS {
            let mut w: Weights = [0; 16];
            w[4] = 1;
            w[slot] = 1;
            let table = PixelExprTable::uniform([w; NUM_SUB_PIXELS]);
            assert!(lite_offsets_table(&table).is_err(), "slot {} accepted", slot);
        }
        let table = uniform("interpolate<2,1,1>(c5,c4,c6)");
        assert!(lite_offsets_table(&table).is_err());
    }
}
