//! Row and column alignment of two grids.
//!
//! Rows and columns are aligned independently. With gaps considered, each
//! dimension runs [`line_alignment`] over line signatures: identical lines
//! and unique anchors first, the order-preserving
//! [`FuzzyMatcher`](crate::matching::FuzzyMatcher) only inside the remaining
//! gaps. Otherwise lines pair by index and the longer side's excess is
//! one-sided.

pub(crate) mod anchor_chain;
pub(crate) mod line_alignment;

use serde::{Deserialize, Serialize};

use crate::column_alignment::align_columns;
use crate::config::CompareConfig;
use crate::dual::{IndexPair, Side};
use crate::grid::Grid;
use crate::grid_view::GridView;
use crate::row_alignment::align_rows;

/// Which dimension of a grid an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridAlignmentResult {
    pub row_pairs: Vec<IndexPair>,
    pub column_pairs: Vec<IndexPair>,
}

/// A structural problem in an alignment, typically one edited by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentDefect {
    OutOfRange {
        axis: Axis,
        side: Side,
        index: u32,
        extent: u32,
    },
    DuplicateIndex {
        axis: Axis,
        side: Side,
        index: u32,
    },
}

impl std::fmt::Display for AlignmentDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentDefect::OutOfRange {
                axis,
                side,
                index,
                extent,
            } => write!(f, "{axis} {index} on side {side} is outside the grid ({extent} {axis}s)"),
            AlignmentDefect::DuplicateIndex { axis, side, index } => {
                write!(f, "{axis} {index} on side {side} is paired more than once")
            }
        }
    }
}

impl GridAlignmentResult {
    pub fn paired_rows(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.row_pairs
            .iter()
            .filter_map(|pair| pair.both().map(|(a, b)| (*a, *b)))
    }

    pub fn paired_columns(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.column_pairs
            .iter()
            .filter_map(|pair| pair.both().map(|(a, b)| (*a, *b)))
    }

    /// Check that every index is inside its grid and used at most once per
    /// side and axis.
    pub fn validate(&self, left: &Grid, right: &Grid) -> Result<(), AlignmentDefect> {
        check_axis(
            &self.row_pairs,
            Axis::Row,
            [left.nrows(), right.nrows()],
        )?;
        check_axis(
            &self.column_pairs,
            Axis::Column,
            [left.ncols(), right.ncols()],
        )
    }
}

fn check_axis(pairs: &[IndexPair], axis: Axis, extents: [u32; 2]) -> Result<(), AlignmentDefect> {
    let mut seen = [
        vec![false; extents[0] as usize],
        vec![false; extents[1] as usize],
    ];

    for pair in pairs {
        for (side, index) in pair.iter() {
            let slot = match side {
                Side::A => 0,
                Side::B => 1,
            };
            let extent = extents[slot];
            if *index >= extent {
                return Err(AlignmentDefect::OutOfRange {
                    axis,
                    side,
                    index: *index,
                    extent,
                });
            }
            let flag = &mut seen[slot][*index as usize];
            if *flag {
                return Err(AlignmentDefect::DuplicateIndex {
                    axis,
                    side,
                    index: *index,
                });
            }
            *flag = true;
        }
    }

    Ok(())
}

/// Align the rows and the columns of `left` against `right`.
pub fn align_grids(left: &Grid, right: &Grid, config: &CompareConfig) -> GridAlignmentResult {
    let view_a = GridView::from_grid(left);
    let view_b = GridView::from_grid(right);

    let row_pairs = align_rows(&view_a, &view_b, config);
    let column_pairs = align_columns(&view_a, &view_b, config);

    tracing::trace!(
        rows_a = left.nrows(),
        rows_b = right.nrows(),
        cols_a = left.ncols(),
        cols_b = right.ncols(),
        row_pairs = row_pairs.len(),
        column_pairs = column_pairs.len(),
        "grids aligned"
    );

    GridAlignmentResult {
        row_pairs,
        column_pairs,
    }
}

/// Pair indices `0..min(len)` with themselves; the longer side's excess is
/// one-sided.
pub(crate) fn positional_pairs(left_len: usize, right_len: usize) -> Vec<IndexPair> {
    let shared = left_len.min(right_len);
    let mut pairs: Vec<IndexPair> = (0..shared)
        .map(|i| IndexPair::paired(i as u32, i as u32))
        .collect();
    pairs.extend((shared..left_len).map(|i| IndexPair::only_a(i as u32)));
    pairs.extend((shared..right_len).map(|j| IndexPair::only_b(j as u32)));
    pairs
}
