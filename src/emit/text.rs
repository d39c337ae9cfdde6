//! Text reconstructions of a table
//!
//! These are not part of the production output. The switch statement can be
//! pasted back into the renderer sources, and the commented tables are handy
//! for diffing two generations of the data.

use std::collections::HashMap;

use crate::error::TableError;
use crate::expr::{format_expr, CaseExpr, PixelExprTable, Weights, CENTER};
use crate::neighbours::{compute_neighbours, grid_position};

use super::{scale_factor, scaled_byte};

/// Regenerate the `switch (pattern)` block for a table.
///
/// Rows with identical expressions share one group of `case` labels. Groups
/// are ordered by their lowest row index.
pub fn switch_statement(table: &PixelExprTable) -> impl Iterator<Item = String> {
    let mut groups: HashMap<&CaseExpr, Vec<usize>> = HashMap::new();
    for (index, expr) in table.rows().iter().enumerate() {
        groups.entry(expr).or_default().push(index);
    }
    let mut groups: Vec<(Vec<usize>, &CaseExpr)> =
        groups.into_iter().map(|(expr, cases)| (cases, expr)).collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let mut lines = vec!["switch (pattern) {".to_string()];
    for (cases, expr) in groups {
        lines.extend(cases.iter().map(|case| format!("case {}:", case)));
        for (sub_pixel, weights) in expr.iter().enumerate() {
            lines.push(format!("\tpixel{:x} = {};", sub_pixel, format_expr(weights)));
        }
        lines.push("\tbreak;".to_string());
    }
    lines.extend(
        [
            "default:",
            "\tassert(false);",
            "\tpixel0 = pixel1 = pixel2 = pixel3 =",
            "\tpixel4 = pixel5 = pixel6 = pixel7 =",
            "\tpixel8 = pixel9 = pixela = pixelb =",
            "\tpixelc = pixeld = pixele = pixelf = 0; // avoid warning",
            "}",
        ]
        .map(String::from),
    );
    lines.into_iter()
}

/// Format one row per sub-pixel under a `// N` header per table row.
fn format_rows<F>(
    table: &PixelExprTable,
    mut format_sub_pixel: F,
) -> Result<Vec<String>, TableError>
where
    F: FnMut(usize, usize, &Weights) -> Result<String, TableError>,
{
    let mut lines = Vec::new();
    for (index, expr) in table.rows().iter().enumerate() {
        lines.push(format!("// {}", index));
        for (sub_pixel, weights) in expr.iter().enumerate() {
            lines.push(format_sub_pixel(index, sub_pixel, weights)?);
        }
    }
    Ok(lines)
}

/// The offsets table as commented C array rows.
pub fn offsets_text(table: &PixelExprTable) -> Result<Vec<String>, TableError> {
    format_rows(table, |index, sub_pixel, weights| {
        let mut line = String::new();
        for neighbour in compute_neighbours(weights, index, sub_pixel)? {
            let (x, y) = grid_position(neighbour);
            line.push_str(&format!(" {:3}, {:3},", (x * 128).min(255), (y * 128).min(255)));
        }
        Ok(line)
    })
}

/// The weights table as commented C array rows.
pub fn weights_text(table: &PixelExprTable) -> Result<Vec<String>, TableError> {
    format_rows(table, |index, sub_pixel, weights| {
        let factor = scale_factor(weights, index, sub_pixel)?;
        let [first, second] = compute_neighbours(weights, index, sub_pixel)?;
        let mut line = String::new();
        for slot in [first, second, Some(CENTER)] {
            let value = slot.map_or(0, |slot| scaled_byte(weights[slot], factor));
            line.push_str(&format!(" {:3},", value));
        }
        Ok(line)
    })
}

/// The c4/c5/c6 weights of a lite table as commented C array rows.
///
/// The lite renderer does not need this table; it is kept for inspecting
/// the reduction.
pub fn lite_weights_text(table: &PixelExprTable) -> Result<Vec<String>, TableError> {
    format_rows(table, |index, sub_pixel, weights| {
        let factor = scale_factor(weights, index, sub_pixel)?;
        let mut line = String::new();
        for slot in 3..=5 {
            line.push_str(&format!(" {:3},", scaled_byte(weights[slot], factor)));
        }
        Ok(line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{parse_expr, NUM_ROWS, NUM_SUB_PIXELS};
    use crate::parser::parse_str;

    fn uniform(expr: &str) -> PixelExprTable {
        PixelExprTable::uniform([parse_expr(expr).unwrap(); NUM_SUB_PIXELS])
    }

    #[test]
    fn test_switch_groups_identical_rows() {
        let center = parse_expr("c5").unwrap();
        let mut rows = vec![[center; NUM_SUB_PIXELS]; NUM_ROWS];
        rows[7][3] = parse_expr("interpolate<3,1>(c5,c6)").unwrap();
        rows[9] = rows[7];
        let table = PixelExprTable::from_rows(rows);

        let lines: Vec<String> = switch_statement(&table).collect();
        assert_eq!(lines[0], "switch (pattern) {");
        // Largest group first because it contains row 0.
        assert_eq!(lines[1], "case 0:");
        let first_group_end = NUM_ROWS - 2;
        assert_eq!(lines[first_group_end], format!("case {}:", NUM_ROWS - 1));
        assert_eq!(lines[first_group_end + 1], "\tpixel0 = c5;");
        assert_eq!(lines[first_group_end + 17], "\tbreak;");
        assert_eq!(lines[first_group_end + 18], "case 7:");
        assert_eq!(lines[first_group_end + 19], "case 9:");
        assert_eq!(lines[first_group_end + 23], "\tpixel3 = interpolate<3,1>(c5,c6);");
        assert_eq!(lines.last().map(String::as_str), Some("}"));
    }

    #[test]
    fn test_switch_output_is_restartable() {
        let table = uniform("c5");
        let first: Vec<String> = switch_statement(&table).collect();
        let second: Vec<String> = switch_statement(&table).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_regenerated_switch_parses_back() {
        // Labels only survive a round trip when they fit in a case label,
        // so regenerate a single-label table and relabel it.
        let table = uniform("interpolate<2,1,1>(c5,c4,c2)");
        let text: Vec<String> = switch_statement(&table)
            .filter(|line| !line.starts_with("case"))
            .collect();
        let mut source = vec![text[0].clone()];
        source.extend((0..256).map(|case| format!("case {}:", case)));
        source.extend(text[1..].iter().cloned());
        assert_eq!(parse_str(&source.join("\n")).unwrap(), table);
    }

    #[test]
    fn test_offsets_text() {
        let lines = offsets_text(&uniform("interpolate<1,1>(c2,c6)")).unwrap();
        assert_eq!(lines.len(), NUM_ROWS * (NUM_SUB_PIXELS + 1));
        assert_eq!(lines[0], "// 0");
        assert_eq!(lines[1], " 128,   0, 255, 128,");
    }

    #[test]
    fn test_weights_text() {
        let lines = weights_text(&uniform("interpolate<6,1,1>(c5,c4,c8)")).unwrap();
        assert_eq!(lines[1], "  32,  32, 192,");
        assert_eq!(lines[17], "// 1");
    }

    #[test]
    fn test_lite_weights_text() {
        let lines = lite_weights_text(&uniform("interpolate<3,1>(c5,c6)")).unwrap();
        assert_eq!(lines[1], "   0, 192,  64,");
    }
}
