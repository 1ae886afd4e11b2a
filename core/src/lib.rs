//! Grid Compare: alignment and comparison of hierarchies of cell grids.
//!
//! This crate provides functionality for:
//! - Pairing two ordered sequences under exact or fuzzy equivalence
//! - Aligning the rows and columns of two grids and deriving changed cells
//! - Comparing books, directories and directory trees through an injected
//!   [`Loader`], with per-child failure isolation
//! - Summarizing result trees and rolling up statistics
//!
//! # Quick Start
//!
//! ```ignore
//! use grid_compare::{Comparator, CompareConfig, DualValue, InMemoryLoader};
//!
//! let loader = InMemoryLoader::new(); // populated elsewhere
//! let comparator = Comparator::new(&loader, CompareConfig::default())?;
//! let books = DualValue::paired("old.xlsx".into(), "new.xlsx".into());
//! let comparison = comparator.compare_books(&books)?;
//! let result = grid_compare::compute_book_result(&comparison, None)?;
//!
//! for summary in grid_compare::summarize(&result) {
//!     println!("{}", summary.summary);
//! }
//! ```

mod aggregate;
pub(crate) mod alignment;
pub(crate) mod column_alignment;
mod config;
mod diff;
mod dual;
mod edit_distance;
mod engine;
pub mod error_codes;
mod grid;
mod grid_view;
pub(crate) mod hashing;
mod loader;
mod matching;
mod progress;
pub(crate) mod row_alignment;
mod tree;

pub use aggregate::{
    CellCounts, ChildStatus, HasDifference, LevelCounts, LevelSummary, NodeSummary, PairCounts,
    Statistics, Summarize, Tally, statistics, summarize,
};
pub use alignment::{AlignmentDefect, Axis, GridAlignmentResult, align_grids};
pub use config::{CompareConfig, CompareConfigBuilder, ConfigError};
pub use diff::{CompareError, SheetDiff};
pub use dual::{DualValue, IndexPair, Side};
pub use edit_distance::{levenshtein, normalized_str_distance, str_distance};
pub use engine::{
    Comparator, ComparisonLevel, compare_sheet, compute_book_result, compute_directory_result,
    compute_sheet_result, compute_tree_result, diff_grids,
};
pub use grid::{CellRecord, Grid, GridError};
pub use loader::{InMemoryLoader, LoadError, Loader};
pub use matching::{
    DEFAULT_FUZZY_THRESHOLD, FuzzyMatcher, IdentityMatcher, ItemMatcher, NameMatcher,
};
pub use progress::{CancelToken, NoProgress, ProgressCallback};
pub use tree::{
    BookComparison, BookResult, Child, ChildEntry, ComparisonNode, DirectoryComparison,
    DirectoryResult, LevelNode, ResultNode, SheetComparison, TreeComparison, TreeResult,
};
