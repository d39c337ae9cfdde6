//! Weighted-sum expressions and the pixel expression table
//!
//! A weighted sum describes how one output sub-pixel is blended from the 3x3
//! source neighbourhood. Slots are laid out row-major:
//!
//! ```text
//! [0] [1] [2]
//! [3] [4] [5]
//! [6] [7] [8]
//! ```
//!
//! Slot 4 is the centre pixel. The pseudocode refers to slot `n` as `c{n+1}`.
//! The vector is 16 wide so rows stay a fixed, symmetric size; slots 9..15 are
//! always zero.

use crate::error::TableError;

/// Number of weight slots in a weighted sum.
pub const NUM_WEIGHTS: usize = 16;

/// Number of populated neighbourhood slots (3x3).
pub const NUM_NEIGHBOURS: usize = 9;

/// Slot of the centre pixel.
pub const CENTER: usize = 4;

/// Number of output sub-pixels per source pixel (4x4).
pub const NUM_SUB_PIXELS: usize = 16;

/// Number of sub-case bits packed below the case label.
pub const SUB_CASE_BITS: usize = 4;

/// Number of bits in a row index.
pub const INDEX_BITS: usize = 12;

/// Number of rows in a pixel expression table.
pub const NUM_ROWS: usize = 1 << INDEX_BITS;

/// Number of distinct `case` labels (upper bits of the row index).
pub const NUM_CASE_LABELS: usize = NUM_ROWS >> SUB_CASE_BITS;

/// Blend coefficients for one sub-pixel.
pub type Weights = [u32; NUM_WEIGHTS];

/// Weighted sums for all sub-pixels of one row.
pub type CaseExpr = [Weights; NUM_SUB_PIXELS];

/// Pack a case label and sub-case into a row index.
pub fn row_index(case: usize, sub_case: usize) -> usize {
    (case << SUB_CASE_BITS) | sub_case
}

/// Dense table of weighted sums, indexed by row and sub-pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelExprTable {
    rows: Vec<CaseExpr>,
}

impl PixelExprTable {
    /// Wrap a vector of rows. The caller guarantees `rows.len() == NUM_ROWS`.
    pub(crate) fn from_rows(rows: Vec<CaseExpr>) -> Self {
        debug_assert_eq!(rows.len(), NUM_ROWS);
        Self { rows }
    }

    /// Build a table where every row shares the same expression.
    pub fn uniform(expr: CaseExpr) -> Self {
        Self { rows: vec![expr; NUM_ROWS] }
    }

    /// All rows in index order.
    pub fn rows(&self) -> &[CaseExpr] {
        &self.rows
    }

    /// Mutable access for in-place transformations.
    pub(crate) fn rows_mut(&mut self) -> &mut [CaseExpr] {
        &mut self.rows
    }

    /// The row at `index`.
    pub fn row(&self, index: usize) -> &CaseExpr {
        &self.rows[index]
    }

    /// Number of rows (always [`NUM_ROWS`]).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over `(row index, sub-pixel, weights)` triples.
    pub fn iter_weights(&self) -> impl Iterator<Item = (usize, usize, &Weights)> {
        self.rows.iter().enumerate().flat_map(|(index, expr)| {
            expr.iter().enumerate().map(move |(sub_pixel, weights)| (index, sub_pixel, weights))
        })
    }
}

/// Largest factor an interpolation may use. Sums above 16 are invalid, so
/// no single weight can exceed it either.
pub const MAX_FACTOR: u32 = 16;

/// Sum of all weights, saturating at `u32::MAX`.
///
/// A saturated sum is never a valid one, so callers that only compare the
/// result against the allowed sums can use this directly.
pub fn total(weights: &Weights) -> u32 {
    weights.iter().fold(0u32, |sum, &w| sum.saturating_add(w))
}

/// Sum of all weights, or `None` when it does not fit in a `u32`.
pub fn checked_total(weights: &Weights) -> Option<u32> {
    weights.iter().try_fold(0u32, |sum, &w| sum.checked_add(w))
}

/// Number of non-zero weights.
pub fn non_zero_count(weights: &Weights) -> usize {
    weights.iter().filter(|&&w| w != 0).count()
}

/// Parse the right-hand side of a pixel assignment.
///
/// Accepts either a bare neighbour reference (`c5`) or an interpolation
/// (`interpolate<3,1>(c5,c6)`). Errors are returned as plain messages; the
/// parser attaches line information.
///
/// # Examples
///
/// ```
/// use hq4gen::expr::parse_expr;
///
/// let weights = parse_expr("interpolate<1,1>(c2,c6)").unwrap();
/// assert_eq!(weights[1], 1);
/// assert_eq!(weights[5], 1);
/// ```
pub fn parse_expr(expr: &str) -> Result<Weights, String> {
    let expr = expr.trim();
    let mut weights = [0; NUM_WEIGHTS];

    if let Some(rest) = expr.strip_prefix("interpolate") {
        let rest = rest.trim_start();
        let (factors_str, rest) = rest
            .strip_prefix('<')
            .and_then(|r| r.split_once('>'))
            .ok_or_else(|| format!("expected '<factors>' in '{}'", expr))?;
        let pixels_str = rest
            .trim()
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| format!("expected '(pixels)' in '{}'", expr))?;

        let factors: Vec<&str> = factors_str.split(',').map(str::trim).collect();
        let pixels: Vec<&str> = pixels_str.split(',').map(str::trim).collect();
        if factors.len() != pixels.len() {
            return Err(format!(
                "interpolate has {} factors but {} pixels",
                factors.len(),
                pixels.len()
            ));
        }

        for (factor_str, pixel_str) in factors.into_iter().zip(pixels) {
            let factor = factor_str
                .parse::<u32>()
                .map_err(|_| format!("cannot parse '{}' as a weight factor", factor_str))?;
            if factor > MAX_FACTOR {
                return Err(format!("weight factor {} exceeds {}", factor, MAX_FACTOR));
            }
            let slot = parse_pixel_ref(pixel_str)?;
            weights[slot] = factor;
        }
    } else {
        weights[parse_pixel_ref(expr)?] = 1;
    }

    Ok(weights)
}

/// Parse a `cN` neighbour reference into its 0-based slot.
pub fn parse_pixel_ref(s: &str) -> Result<usize, String> {
    let digits = s
        .trim()
        .strip_prefix('c')
        .ok_or_else(|| format!("expected a pixel reference 'cN', got '{}'", s))?;
    let n = digits
        .parse::<usize>()
        .map_err(|_| format!("cannot parse '{}' as a pixel number", digits))?;
    if !(1..=NUM_NEIGHBOURS).contains(&n) {
        return Err(format!("pixel reference 'c{}' is outside c1..c{}", n, NUM_NEIGHBOURS));
    }
    Ok(n - 1)
}

/// Format a weighted sum back into pseudocode.
///
/// A single non-zero weight is written as a bare reference, anything else as
/// an `interpolate<..>(..)` call.
pub fn format_expr(weights: &Weights) -> String {
    let terms: Vec<(usize, u32)> = weights
        .iter()
        .enumerate()
        .filter(|(_, &w)| w != 0)
        .map(|(slot, &w)| (slot + 1, w))
        .collect();

    if let [(pixel, _)] = terms.as_slice() {
        return format!("c{}", pixel);
    }

    let factors: Vec<String> = terms.iter().map(|(_, w)| w.to_string()).collect();
    let pixels: Vec<String> = terms.iter().map(|(p, _)| format!("c{}", p)).collect();
    format!("interpolate<{}>({})", factors.join(","), pixels.join(","))
}

/// Check a weighted sum against the structural invariants every table row
/// must satisfy.
pub(crate) fn check_weights(
    index: usize,
    sub_pixel: usize,
    weights: &Weights,
) -> Result<(), TableError> {
    let violation = |rule: &str| TableError::InvariantViolation {
        index,
        sub_pixel,
        weights: *weights,
        rule: rule.to_string(),
    };

    let Some(sum) = checked_total(weights) else {
        return Err(violation("sum of weights overflows"));
    };
    if !matches!(sum, 1 | 2 | 4 | 8 | 16) {
        return Err(violation("sum of weights must be 1, 2, 4, 8 or 16"));
    }
    let non_zero = non_zero_count(weights);
    if non_zero > 3 {
        return Err(violation("at most 3 weights may be non-zero"));
    }
    if non_zero == 3 && weights[CENTER] == 0 {
        return Err(violation("with 3 non-zero weights the centre must be one of them"));
    }
    if weights[NUM_NEIGHBOURS..].iter().any(|&w| w != 0) {
        return Err(violation("only the 3x3 neighbourhood may be weighted"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights_of(pairs: &[(usize, u32)]) -> Weights {
        let mut w = [0; NUM_WEIGHTS];
        for &(slot, value) in pairs {
            w[slot] = value;
        }
        w
    }

    #[test]
    fn test_parse_bare_reference() {
        assert_eq!(parse_expr("c5").unwrap(), weights_of(&[(4, 1)]));
        assert_eq!(parse_expr(" c1 ").unwrap(), weights_of(&[(0, 1)]));
    }

    #[test]
    fn test_parse_interpolate() {
        let w = parse_expr("interpolate<5,2,1>(c5, c4, c2)").unwrap();
        assert_eq!(w, weights_of(&[(4, 5), (3, 2), (1, 1)]));
    }

    #[test]
    fn test_parse_interpolate_arity_mismatch() {
        let err = parse_expr("interpolate<1,1,2>(c5,c6)").unwrap_err();
        assert!(err.contains("3 factors but 2 pixels"));
    }

    #[test]
    fn test_parse_bad_factor() {
        let err = parse_expr("interpolate<x,1>(c5,c6)").unwrap_err();
        assert!(err.contains("'x'"));
    }

    #[test]
    fn test_parse_factor_too_large() {
        let err = parse_expr("interpolate<4294967295,2>(c5,c4)").unwrap_err();
        assert_eq!(err, "weight factor 4294967295 exceeds 16");
        assert!(parse_expr("interpolate<17,1>(c5,c4)").is_err());
        assert!(parse_expr("interpolate<16>(c5)").is_ok());
    }

    #[test]
    fn test_parse_pixel_out_of_range() {
        assert!(parse_expr("c0").is_err());
        assert!(parse_expr("c10").is_err());
        assert!(parse_expr("d5").is_err());
    }

    #[test]
    fn test_format_single_reference() {
        assert_eq!(format_expr(&weights_of(&[(4, 1)])), "c5");
        // A lone weight is still written as a reference.
        assert_eq!(format_expr(&weights_of(&[(2, 4)])), "c3");
    }

    #[test]
    fn test_format_interpolate() {
        let w = weights_of(&[(1, 1), (4, 6), (5, 1)]);
        assert_eq!(format_expr(&w), "interpolate<1,6,1>(c2,c5,c6)");
        assert_eq!(parse_expr(&format_expr(&w)).unwrap(), w);
    }

    #[test]
    fn test_check_weights() {
        assert!(check_weights(0, 0, &weights_of(&[(4, 1)])).is_ok());
        assert!(check_weights(0, 0, &weights_of(&[(4, 2), (1, 1), (3, 1)])).is_ok());
        assert!(check_weights(0, 0, &weights_of(&[(4, 2), (1, 1)])).is_err());
        assert!(check_weights(0, 0, &weights_of(&[(0, 2), (1, 1), (3, 1)])).is_err());
        assert!(check_weights(0, 0, &weights_of(&[(4, 1), (0, 1), (1, 1), (3, 1)])).is_err());
        assert!(check_weights(0, 0, &[0; NUM_WEIGHTS]).is_err());
    }

    #[test]
    fn test_check_weights_overflowing_sum() {
        // u32::MAX + 2 wraps to 1, which would look like a valid sum.
        let w = weights_of(&[(4, u32::MAX), (3, 2)]);
        assert_eq!(checked_total(&w), None);
        assert_eq!(total(&w), u32::MAX);
        match check_weights(7, 3, &w) {
            Err(TableError::InvariantViolation { index, sub_pixel, rule, .. }) => {
                assert_eq!((index, sub_pixel), (7, 3));
                assert_eq!(rule, "sum of weights overflows");
            }
            other => panic!("expected an invariant violation, got {:?}", other),
        }
    }

    #[test]
    fn test_row_index() {
        assert_eq!(row_index(0, 0), 0);
        assert_eq!(row_index(1, 0), 16);
        assert_eq!(row_index(255, 15), NUM_ROWS - 1);
    }
}
