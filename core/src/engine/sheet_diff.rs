use crate::alignment::{GridAlignmentResult, align_grids};
use crate::config::CompareConfig;
use crate::diff::{CompareError, SheetDiff};
use crate::dual::{DualValue, IndexPair};
use crate::grid::{CellRecord, Grid};

/// Derive the cell-level differences of two sheets under `alignment`.
///
/// The alignment is checked first, since it may have been edited by hand.
pub fn compare_sheet(
    left: &Grid,
    right: &Grid,
    alignment: &GridAlignmentResult,
) -> Result<SheetDiff, CompareError> {
    alignment
        .validate(left, right)
        .map_err(CompareError::InvalidAlignment)?;
    Ok(build_sheet_diff(left, right, alignment))
}

/// Align and compare two sheets in one step.
pub fn diff_grids(left: &Grid, right: &Grid, config: &CompareConfig) -> SheetDiff {
    let alignment = align_grids(left, right, config);
    build_sheet_diff(left, right, &alignment)
}

pub(crate) fn build_sheet_diff(
    left: &Grid,
    right: &Grid,
    alignment: &GridAlignmentResult,
) -> SheetDiff {
    let redundant_rows = split_redundant(&alignment.row_pairs);
    let redundant_columns = split_redundant(&alignment.column_pairs);

    let columns: Vec<(u32, u32)> = alignment.paired_columns().collect();
    let mut diff_cells = Vec::new();

    for (row_a, row_b) in alignment.paired_rows() {
        for &(col_a, col_b) in &columns {
            let cell_a = left.get(row_a, col_a);
            let cell_b = right.get(row_b, col_b);
            if cell_a.is_none() && cell_b.is_none() {
                continue;
            }

            let a = cell_a
                .cloned()
                .unwrap_or_else(|| CellRecord::empty(row_a, col_a));
            let b = cell_b
                .cloned()
                .unwrap_or_else(|| CellRecord::empty(row_b, col_b));

            if !a.content_equals(&b) || !a.comment_equals(&b) {
                diff_cells.push(DualValue::paired(a, b));
            }
        }
    }

    tracing::trace!(
        redundant_rows_a = redundant_rows.a.as_ref().map_or(0, Vec::len),
        redundant_rows_b = redundant_rows.b.as_ref().map_or(0, Vec::len),
        diff_cells = diff_cells.len(),
        "sheet compared"
    );

    SheetDiff {
        redundant_rows,
        redundant_columns,
        diff_cells,
    }
}

fn split_redundant(pairs: &[IndexPair]) -> DualValue<Vec<u32>> {
    let mut a = Vec::new();
    let mut b = Vec::new();
    for pair in pairs {
        match (pair.a, pair.b) {
            (Some(index), None) => a.push(index),
            (None, Some(index)) => b.push(index),
            _ => {}
        }
    }
    DualValue::paired(a, b)
}
