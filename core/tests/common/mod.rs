//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use grid_compare::{CellRecord, Grid, InMemoryLoader, Side};

/// Build a grid from row-major text; empty strings are skipped.
pub fn grid_from_rows(rows: &[&[&str]]) -> Grid {
    let mut grid = Grid::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            grid.insert_cell(r as u32, c as u32, *value)
                .unwrap_or_else(|e| panic!("bad fixture cell ({r}, {c}): {e}"));
        }
    }
    grid
}

/// A one-column grid with one value per row.
pub fn column_grid(values: &[&str]) -> Grid {
    Grid::from_records(
        values
            .iter()
            .enumerate()
            .map(|(row, value)| CellRecord::new(row as u32, 0, *value)),
    )
    .expect("distinct rows")
}

/// A numbered table: a header row plus `rows` data rows of `cols` columns.
pub fn numbered_table(rows: u32, cols: u32) -> Grid {
    let mut grid = Grid::new();
    for c in 0..cols {
        grid.insert_cell(0, c, format!("h{c}")).expect("unique coordinate");
    }
    for r in 1..=rows {
        for c in 0..cols {
            grid.insert_cell(r, c, format!("r{r}c{c}"))
                .expect("unique coordinate");
        }
    }
    grid
}

/// Register the same book on both sides with identical sheets.
pub fn mirrored_book(
    loader: InMemoryLoader,
    book: &str,
    sheets: &[(&str, Grid)],
) -> InMemoryLoader {
    loader
        .with_book(
            Side::A,
            book,
            sheets.iter().map(|(name, grid)| (*name, grid.clone())),
        )
        .with_book(
            Side::B,
            book,
            sheets.iter().map(|(name, grid)| (*name, grid.clone())),
        )
}
