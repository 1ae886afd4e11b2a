//! Sheet-level differences and the engine's error type.
//!
//! - [`SheetDiff`]: redundant (one-sided) rows and columns plus the changed
//!   cells found at paired coordinates
//! - [`CompareError`]: errors surfaced by the comparison APIs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alignment::AlignmentDefect;
use crate::config::ConfigError;
use crate::dual::{DualValue, Side};
use crate::error_codes;
use crate::grid::CellRecord;
use crate::loader::LoadError;

/// The differences between two aligned sheets.
///
/// Both sides of `redundant_rows` and `redundant_columns` are always present
/// (possibly empty). Every `diff_cells` entry holds a record on both sides; an
/// absent coordinate is represented by [`CellRecord::empty`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDiff {
    pub redundant_rows: DualValue<Vec<u32>>,
    pub redundant_columns: DualValue<Vec<u32>>,
    pub diff_cells: Vec<DualValue<CellRecord>>,
}

impl Default for SheetDiff {
    fn default() -> Self {
        Self {
            redundant_rows: DualValue::paired(Vec::new(), Vec::new()),
            redundant_columns: DualValue::paired(Vec::new(), Vec::new()),
            diff_cells: Vec::new(),
        }
    }
}

impl SheetDiff {
    pub fn redundant_rows_on(&self, side: Side) -> &[u32] {
        self.redundant_rows.get(side).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn redundant_columns_on(&self, side: Side) -> &[u32] {
        self.redundant_columns.get(side).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_difference(&self) -> bool {
        Side::BOTH.iter().any(|side| {
            !self.redundant_rows_on(*side).is_empty()
                || !self.redundant_columns_on(*side).is_empty()
        }) || !self.diff_cells.is_empty()
    }
}

/// Errors produced by the comparison APIs.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CompareError {
    #[error("[GCMP_CMP_002] invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("[GCMP_CMP_003] invalid alignment: {0}")]
    InvalidAlignment(AlignmentDefect),

    #[error("[GCMP_CMP_004] {0}")]
    Load(#[from] LoadError),

    #[error("[GCMP_CMP_005] comparison cancelled")]
    Cancelled,
}

impl CompareError {
    pub fn code(&self) -> &'static str {
        match self {
            CompareError::InvalidConfig(_) => error_codes::COMPARE_INVALID_CONFIG,
            CompareError::InvalidAlignment(_) => error_codes::COMPARE_INVALID_ALIGNMENT,
            CompareError::Load(_) => error_codes::COMPARE_LOAD,
            CompareError::Cancelled => error_codes::COMPARE_CANCELLED,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompareError::Cancelled)
    }
}
