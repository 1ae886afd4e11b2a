//! Cell records and the grids built from them.
//!
//! A [`Grid`] is the set of [`CellRecord`]s extracted from one sheet by an
//! external loader. It holds at most one record per `(row, column)`; the
//! grid's extent is one past the largest row and column index present.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error_codes;

/// One labeled cell.
///
/// `content` is never null; an empty string denotes a blank cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRecord {
    pub row: u32,
    pub column: u32,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CellRecord {
    pub fn new(row: u32, column: u32, content: impl Into<String>) -> Self {
        Self {
            row,
            column,
            content: content.into(),
            comment: None,
        }
    }

    /// The synthetic record standing in for an absent coordinate.
    pub fn empty(row: u32, column: u32) -> Self {
        Self::new(row, column, String::new())
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn content_equals(&self, other: &CellRecord) -> bool {
        self.content == other.content
    }

    pub fn comment_equals(&self, other: &CellRecord) -> bool {
        self.comment == other.comment
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_empty() && self.comment.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GridError {
    #[error(
        "[GCMP_GRID_001] duplicate cell at row {row}, column {column}: {first:?} and {second:?}"
    )]
    DuplicateCoordinate {
        row: u32,
        column: u32,
        first: String,
        second: String,
    },
}

impl GridError {
    pub fn code(&self) -> &'static str {
        match self {
            GridError::DuplicateCoordinate { .. } => error_codes::GRID_DUPLICATE_COORDINATE,
        }
    }
}

/// A sparse set of cell records keyed by coordinate.
///
/// # Invariants
///
/// Every stored record's `(row, column)` equals its key, and `nrows`/`ncols`
/// are one past the largest row/column present (zero for an empty grid).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellRecord>", into = "Vec<CellRecord>")]
pub struct Grid {
    cells: FxHashMap<(u32, u32), CellRecord>,
    nrows: u32,
    ncols: u32,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid, rejecting two different records at the same coordinate.
    ///
    /// A record repeated verbatim is kept once.
    pub fn from_records(records: impl IntoIterator<Item = CellRecord>) -> Result<Self, GridError> {
        let mut grid = Grid::new();
        for record in records {
            grid.insert(record)?;
        }
        Ok(grid)
    }

    pub fn insert(&mut self, record: CellRecord) -> Result<(), GridError> {
        let key = (record.row, record.column);
        if let Some(existing) = self.cells.get(&key) {
            if *existing == record {
                return Ok(());
            }
            return Err(GridError::DuplicateCoordinate {
                row: record.row,
                column: record.column,
                first: existing.content.clone(),
                second: record.content,
            });
        }

        self.nrows = self.nrows.max(record.row.saturating_add(1));
        self.ncols = self.ncols.max(record.column.saturating_add(1));
        self.cells.insert(key, record);
        Ok(())
    }

    /// Convenience for tests and loaders: insert a comment-free cell.
    pub fn insert_cell(
        &mut self,
        row: u32,
        column: u32,
        content: impl Into<String>,
    ) -> Result<(), GridError> {
        self.insert(CellRecord::new(row, column, content))
    }

    pub fn get(&self, row: u32, column: u32) -> Option<&CellRecord> {
        self.cells.get(&(row, column))
    }

    pub fn nrows(&self) -> u32 {
        self.nrows
    }

    pub fn ncols(&self) -> u32 {
        self.ncols
    }

    /// `(nrows, ncols)`.
    pub fn extent(&self) -> (u32, u32) {
        (self.nrows, self.ncols)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All records in row-major order.
    pub fn records(&self) -> Vec<&CellRecord> {
        let mut records: Vec<&CellRecord> = self.cells.values().collect();
        records.sort_by_key(|record| (record.row, record.column));
        records
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CellRecord> {
        self.cells.values()
    }
}

impl TryFrom<Vec<CellRecord>> for Grid {
    type Error = GridError;

    fn try_from(records: Vec<CellRecord>) -> Result<Self, Self::Error> {
        Grid::from_records(records)
    }
}

impl From<Grid> for Vec<CellRecord> {
    fn from(grid: Grid) -> Self {
        let mut records: Vec<CellRecord> = grid.cells.into_values().collect();
        records.sort_by_key(|record| (record.row, record.column));
        records
    }
}
