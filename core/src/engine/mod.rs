//! Comparison engine.
//!
//! ## Module Structure
//!
//! - `sheet_diff`: cell-level differences of two aligned sheets
//! - `hierarchy`: the [`Comparator`] that pairs and descends trees, directories and books
//! - `results`: computing a result tree from a (possibly hand-edited) comparison tree
//! - `hardening`: cancellation checks and progress throttling

mod hardening;
mod hierarchy;
mod results;
mod sheet_diff;

pub use hierarchy::{ComparisonLevel, Comparator};
pub use results::{
    compute_book_result, compute_directory_result, compute_sheet_result, compute_tree_result,
};
pub use sheet_diff::{compare_sheet, diff_grids};
