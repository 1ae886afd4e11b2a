//! Per-row and per-column signatures of a grid.
//!
//! A signature is the ordered content of the non-blank cells along one row
//! (ordered by column) or one column (ordered by row). Row and column
//! alignment compare signatures rather than raw cells.

use crate::edit_distance::levenshtein;
use crate::grid::Grid;
use crate::hashing::hash_tokens;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineSignature<'a> {
    pub(crate) index: u32,
    pub(crate) hash: u64,
    pub(crate) tokens: Vec<&'a str>,
}

impl LineSignature<'_> {
    pub(crate) fn weight(&self) -> f64 {
        self.tokens.len() as f64
    }

    /// No non-blank cell on this line.
    pub(crate) fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn same_as(&self, other: &LineSignature<'_>) -> bool {
        self.hash == other.hash && self.tokens == other.tokens
    }

    /// Token edit distance; identical signatures short-circuit on the hash.
    pub(crate) fn distance(&self, other: &LineSignature<'_>) -> f64 {
        if self.same_as(other) {
            return 0.0;
        }
        levenshtein(&self.tokens, &other.tokens) as f64
    }
}

#[derive(Debug)]
pub(crate) struct GridView<'a> {
    pub(crate) rows: Vec<LineSignature<'a>>,
    pub(crate) cols: Vec<LineSignature<'a>>,
}

impl<'a> GridView<'a> {
    pub(crate) fn from_grid(grid: &'a Grid) -> GridView<'a> {
        let nrows = grid.nrows() as usize;
        let ncols = grid.ncols() as usize;

        let mut row_cells: Vec<Vec<(u32, &'a str)>> = vec![Vec::new(); nrows];
        let mut col_cells: Vec<Vec<(u32, &'a str)>> = vec![Vec::new(); ncols];

        for record in grid.iter() {
            if record.content.is_empty() {
                continue;
            }
            row_cells[record.row as usize].push((record.column, record.content.as_str()));
            col_cells[record.column as usize].push((record.row, record.content.as_str()));
        }

        GridView {
            rows: build_signatures(row_cells),
            cols: build_signatures(col_cells),
        }
    }
}

fn build_signatures<'a>(lines: Vec<Vec<(u32, &'a str)>>) -> Vec<LineSignature<'a>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(index, mut cells)| {
            cells.sort_unstable_by_key(|(position, _)| *position);
            let tokens: Vec<&'a str> = cells.into_iter().map(|(_, content)| content).collect();
            LineSignature {
                index: index as u32,
                hash: hash_tokens(tokens.iter().copied()),
                tokens,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellRecord;

    #[test]
    fn signatures_skip_blank_cells_and_keep_order() {
        let grid = Grid::from_records([
            CellRecord::new(0, 2, "c"),
            CellRecord::new(0, 0, "a"),
            CellRecord::new(0, 1, ""),
            CellRecord::new(2, 1, "z"),
        ])
        .expect("valid grid");
        let view = GridView::from_grid(&grid);

        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.cols.len(), 3);
        assert_eq!(view.rows[0].tokens, vec!["a", "c"]);
        assert!(view.rows[1].tokens.is_empty());
        assert_eq!(view.cols[1].tokens, vec!["z"]);
        assert_eq!(view.cols[1].index, 1);
    }

    #[test]
    fn distance_counts_token_edits() {
        let left = Grid::from_records([
            CellRecord::new(0, 0, "a"),
            CellRecord::new(0, 1, "b"),
            CellRecord::new(0, 2, "c"),
        ])
        .expect("valid grid");
        let right = Grid::from_records([CellRecord::new(0, 0, "a"), CellRecord::new(0, 1, "c")])
            .expect("valid grid");
        let view_left = GridView::from_grid(&left);
        let view_right = GridView::from_grid(&right);

        assert_eq!(view_left.rows[0].distance(&view_right.rows[0]), 1.0);
        assert_eq!(view_left.rows[0].distance(&view_left.rows[0]), 0.0);
        assert_eq!(view_left.rows[0].weight(), 3.0);
    }
}
