//! Turning a comparison tree into a result tree.
//!
//! The result tree has the comparison tree's shape. Present comparisons are
//! computed; unmatched and failed entries carry over unchanged. A present
//! comparison that fails to compute (for instance a hand-edited alignment
//! that no longer fits its grids) becomes [`Child::Failed`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::diff::{CompareError, SheetDiff};
use crate::progress::CancelToken;
use crate::tree::{
    BookComparison, BookResult, Child, ChildEntry, DirectoryComparison, DirectoryResult,
    LevelNode, SheetComparison, TreeComparison, TreeResult,
};

use super::hardening::HardeningController;
use super::sheet_diff::compare_sheet;

pub fn compute_sheet_result(comparison: &SheetComparison) -> Result<SheetDiff, CompareError> {
    compare_sheet(&comparison.left, &comparison.right, &comparison.alignment)
}

pub fn compute_book_result(
    node: &BookComparison,
    cancel: Option<&CancelToken>,
) -> Result<BookResult, CompareError> {
    let hardening = HardeningController::new(cancel.cloned(), None);
    book_result(node, &hardening)
}

pub fn compute_directory_result(
    node: &DirectoryComparison,
    cancel: Option<&CancelToken>,
) -> Result<DirectoryResult, CompareError> {
    let hardening = HardeningController::new(cancel.cloned(), None);
    directory_result(node, &hardening)
}

pub fn compute_tree_result(
    node: &TreeComparison,
    cancel: Option<&CancelToken>,
) -> Result<TreeResult, CompareError> {
    let hardening = HardeningController::new(cancel.cloned(), None);
    map_level(node, &hardening, |directory| directory_result(directory, &hardening))
}

fn book_result(
    node: &BookComparison,
    hardening: &HardeningController<'_>,
) -> Result<BookResult, CompareError> {
    map_level(node, hardening, compute_sheet_result)
}

fn directory_result(
    node: &DirectoryComparison,
    hardening: &HardeningController<'_>,
) -> Result<DirectoryResult, CompareError> {
    map_level(node, hardening, |book| book_result(book, hardening))
}

fn map_level<P, C, T, R, F>(
    node: &LevelNode<P, C, T>,
    hardening: &HardeningController<'_>,
    compute: F,
) -> Result<LevelNode<P, C, R>, CompareError>
where
    P: Clone,
    C: Clone + Send + Sync,
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R, CompareError> + Sync,
{
    hardening.check_cancelled()?;

    let resolve = |entry: &ChildEntry<C, T>| -> Result<ChildEntry<C, R>, CompareError> {
        let comparison = match &entry.comparison {
            Child::Present(comparison) => {
                hardening.check_cancelled()?;
                match compute(comparison) {
                    Ok(result) => Child::Present(result),
                    Err(CompareError::Cancelled) => return Err(CompareError::Cancelled),
                    Err(err) => {
                        tracing::warn!(code = err.code(), error = %err, "child result failed");
                        Child::failed(err.to_string())
                    }
                }
            }
            Child::Unmatched => Child::Unmatched,
            Child::Failed { reason } => Child::failed(reason.clone()),
        };
        Ok(ChildEntry::new(entry.pair.clone(), comparison))
    };

    #[cfg(feature = "parallel")]
    let children = node
        .children
        .par_iter()
        .map(resolve)
        .collect::<Result<Vec<_>, _>>()?;
    #[cfg(not(feature = "parallel"))]
    let children = node
        .children
        .iter()
        .map(resolve)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LevelNode::new(node.parent_pair.clone(), children))
}
