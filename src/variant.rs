//! Table variants for the different consumers of the generated data
//!
//! A variant is the parsed table, optionally reduced to two taps, with its
//! rows renumbered for a particular consumer. The binary tables read by the
//! renderer and the regenerated switch statement order the 12 row-index bits
//! differently.

use crate::error::TableError;
use crate::expr::{PixelExprTable, INDEX_BITS, NUM_ROWS};
use crate::lite::make_lite;

/// Row-index bit order of the binary lookup tables.
pub const TABLE_LAYOUT: CasePermutation = CasePermutation([5, 0, 4, 6, 3, 10, 11, 2, 1, 9, 8, 7]);

/// Row-index bit order of the regenerated switch statement.
pub const SWITCH_LAYOUT: CasePermutation = CasePermutation([2, 9, 7, 4, 3, 10, 11, 1, 8, 0, 6, 5]);

/// Sub-pixels on the right half of the 4x4 block. In the table layout these
/// keep the right tap when the lite reduction has to choose.
const PREFER_RIGHT_SUB_PIXELS: [usize; 8] = [2, 3, 6, 7, 10, 11, 14, 15];

/// A reordering of the row-index bits.
///
/// Bit `k` of a permuted index is taken from bit `self.0[k]` of the source
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasePermutation(pub [usize; INDEX_BITS]);

impl CasePermutation {
    /// Source row index for the permuted row `index`.
    pub fn source_index(&self, index: usize) -> usize {
        self.0
            .iter()
            .enumerate()
            .map(|(bit, &source_bit)| ((index >> source_bit) & 1) << bit)
            .sum()
    }

    /// The permutation that undoes this one.
    pub fn inverse(&self) -> CasePermutation {
        let mut inverse = [0; INDEX_BITS];
        for (bit, &source_bit) in self.0.iter().enumerate() {
            inverse[source_bit] = bit;
        }
        CasePermutation(inverse)
    }

    /// Whether every bit position appears exactly once.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; INDEX_BITS];
        for &bit in &self.0 {
            if bit >= INDEX_BITS || seen[bit] {
                return false;
            }
            seen[bit] = true;
        }
        true
    }

    /// Renumber the rows of `table`.
    pub fn apply(&self, table: &PixelExprTable) -> PixelExprTable {
        let rows = (0..NUM_ROWS).map(|index| *table.row(self.source_index(index))).collect();
        PixelExprTable::from_rows(rows)
    }
}

/// A derived table and the flags it was built with.
///
/// There is no narrow flag: narrow variants never build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    lite: bool,
    table_layout: bool,
    table: PixelExprTable,
}

impl Variant {
    /// Derive a variant from a validated table. The source is never modified.
    ///
    /// `table_layout` selects the binary table bit order; otherwise the switch
    /// statement order is used. Narrow variants are not implemented and
    /// always fail.
    pub fn build(
        source: &PixelExprTable,
        lite: bool,
        narrow: bool,
        table_layout: bool,
    ) -> Result<Self, TableError> {
        if narrow {
            return Err(TableError::UnsupportedVariant);
        }

        let permutation = if table_layout { TABLE_LAYOUT } else { SWITCH_LAYOUT };
        let table = if lite {
            let prefer_right: &[usize] = if table_layout { &PREFER_RIGHT_SUB_PIXELS } else { &[] };
            permutation.apply(&make_lite(source.clone(), prefer_right))
        } else {
            permutation.apply(source)
        };

        Ok(Self { lite, table_layout, table })
    }

    pub fn is_lite(&self) -> bool {
        self.lite
    }

    pub fn is_table_layout(&self) -> bool {
        self.table_layout
    }

    /// The derived table.
    pub fn table(&self) -> &PixelExprTable {
        &self.table
    }

    /// Short name used in progress output.
    pub fn name(&self) -> String {
        format!(
            "{}-{}",
            if self.lite { "lite" } else { "full" },
            if self.table_layout { "table" } else { "switch" }
        )
    }
}
