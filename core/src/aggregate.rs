//! Summaries and roll-up statistics over result trees.
//!
//! - [`NodeSummary`] classifies every child of one result node and renders a
//!   one-line overview
//! - [`summarize`] walks a result tree top-down and emits one
//!   [`LevelSummary`] per visited node
//! - [`statistics`] walks a comparison tree alongside its result tree and
//!   counts pairs at every granularity
//!
//! Failed children are counted as failed and never contribute to the totals
//! below them. A failed or unresolved child is never reported as unchanged.

use std::fmt;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::diff::SheetDiff;
use crate::dual::{DualValue, Side};
use crate::tree::{
    BookComparison, Child, ChildEntry, DirectoryComparison, LevelNode, SheetComparison,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    pub paired: u64,
    pub only_a: u64,
    pub only_b: u64,
    pub failed: u64,
}

impl PairCounts {
    fn record_one_sided(&mut self, side: Side) {
        match side {
            Side::A => self.only_a += 1,
            Side::B => self.only_b += 1,
        }
    }

    pub fn one_sided(&self) -> u64 {
        self.only_a + self.only_b
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    /// Coordinates in paired rows and paired columns holding a cell on at
    /// least one side.
    pub compared: u64,
    pub changed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub directories: PairCounts,
    pub books: PairCounts,
    pub sheets: PairCounts,
    pub rows: PairCounts,
    pub columns: PairCounts,
    pub cells: CellCounts,
}

/// Whether a result carries any difference.
pub trait HasDifference {
    fn has_difference(&self) -> bool;
}

impl HasDifference for SheetDiff {
    fn has_difference(&self) -> bool {
        SheetDiff::has_difference(self)
    }
}

impl<P, C, R: HasDifference> HasDifference for LevelNode<P, C, R> {
    fn has_difference(&self) -> bool {
        self.children
            .iter()
            .any(|entry| ChildStatus::of(entry) != ChildStatus::Unchanged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildStatus {
    Unchanged,
    Changed,
    OnlyA,
    OnlyB,
    /// Paired but never compared, e.g. re-paired by hand and not rebuilt.
    Unresolved,
    Failed,
}

impl ChildStatus {
    pub fn of<C, R: HasDifference>(entry: &ChildEntry<C, R>) -> Self {
        match &entry.comparison {
            Child::Present(result) if result.has_difference() => ChildStatus::Changed,
            Child::Present(_) => ChildStatus::Unchanged,
            Child::Failed { .. } => ChildStatus::Failed,
            Child::Unmatched => match entry.pair.single_side() {
                Some(Side::A) => ChildStatus::OnlyA,
                Some(Side::B) => ChildStatus::OnlyB,
                None => ChildStatus::Unresolved,
            },
        }
    }
}

/// Per-child statuses of one result node, in child order, plus their counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub statuses: Vec<ChildStatus>,
    pub unchanged: usize,
    pub changed: usize,
    pub only_a: usize,
    pub only_b: usize,
    pub unresolved: usize,
    pub failed: usize,
}

impl NodeSummary {
    pub fn of<P, C, R: HasDifference>(node: &LevelNode<P, C, R>) -> Self {
        let mut summary = NodeSummary::default();
        for entry in &node.children {
            let status = ChildStatus::of(entry);
            match status {
                ChildStatus::Unchanged => summary.unchanged += 1,
                ChildStatus::Changed => summary.changed += 1,
                ChildStatus::OnlyA => summary.only_a += 1,
                ChildStatus::OnlyB => summary.only_b += 1,
                ChildStatus::Unresolved => summary.unresolved += 1,
                ChildStatus::Failed => summary.failed += 1,
            }
            summary.statuses.push(status);
        }
        summary
    }

    pub fn has_difference(&self) -> bool {
        self.unchanged != self.statuses.len()
    }
}

impl fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} children: {} unchanged, {} changed, {} only in A, {} only in B, {} failed",
            self.statuses.len(),
            self.unchanged,
            self.changed,
            self.only_a,
            self.only_b,
            self.failed
        )?;
        if self.unresolved > 0 {
            write!(f, ", {} unresolved", self.unresolved)?;
        }
        Ok(())
    }
}

/// The summary of one visited node; `depth` is zero at the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub parent_pair: DualValue<PathBuf>,
    pub depth: usize,
    pub summary: NodeSummary,
}

/// Result types that can be walked by [`summarize`].
pub trait Summarize: HasDifference {
    fn collect_summaries(&self, depth: usize, out: &mut Vec<LevelSummary>);
}

impl Summarize for SheetDiff {
    fn collect_summaries(&self, _depth: usize, _out: &mut Vec<LevelSummary>) {}
}

impl<C, R: Summarize> Summarize for LevelNode<PathBuf, C, R> {
    fn collect_summaries(&self, depth: usize, out: &mut Vec<LevelSummary>) {
        out.push(LevelSummary {
            parent_pair: self.parent_pair.clone(),
            depth,
            summary: NodeSummary::of(self),
        });
        for entry in &self.children {
            if let Child::Present(child) = &entry.comparison {
                child.collect_summaries(depth + 1, out);
            }
        }
    }
}

/// One summary per node of `result`, parents before their children.
pub fn summarize<R: Summarize>(result: &R) -> Vec<LevelSummary> {
    let mut out = Vec::new();
    result.collect_summaries(0, &mut out);
    out
}

/// Selects the counters a child of this comparison type is tallied in.
pub trait LevelCounts {
    fn counts(stats: &mut Statistics) -> &mut PairCounts;
}

impl LevelCounts for SheetComparison {
    fn counts(stats: &mut Statistics) -> &mut PairCounts {
        &mut stats.sheets
    }
}

impl LevelCounts for BookComparison {
    fn counts(stats: &mut Statistics) -> &mut PairCounts {
        &mut stats.books
    }
}

impl LevelCounts for DirectoryComparison {
    fn counts(stats: &mut Statistics) -> &mut PairCounts {
        &mut stats.directories
    }
}

/// A comparison that can be tallied together with its result `R`.
pub trait Tally<R> {
    fn tally(&self, result: &R, stats: &mut Statistics);
}

impl Tally<SheetDiff> for SheetComparison {
    fn tally(&self, result: &SheetDiff, stats: &mut Statistics) {
        for pair in &self.alignment.row_pairs {
            match pair.single_side() {
                Some(side) => stats.rows.record_one_sided(side),
                None if pair.is_paired() => stats.rows.paired += 1,
                None => {}
            }
        }
        for pair in &self.alignment.column_pairs {
            match pair.single_side() {
                Some(side) => stats.columns.record_one_sided(side),
                None if pair.is_paired() => stats.columns.paired += 1,
                None => {}
            }
        }
        stats.cells.compared += compared_cells(self);
        stats.cells.changed += result.diff_cells.len() as u64;
    }
}

impl<P, C, T, R> Tally<LevelNode<P, C, R>> for LevelNode<P, C, T>
where
    C: PartialEq,
    T: Tally<R> + LevelCounts,
{
    fn tally(&self, result: &LevelNode<P, C, R>, stats: &mut Statistics) {
        for (index, entry) in result.children.iter().enumerate() {
            match &entry.comparison {
                Child::Present(child_result) => {
                    T::counts(stats).paired += 1;
                    if let Some(Child::Present(child)) = self.comparison_at(index, &entry.pair) {
                        child.tally(child_result, stats);
                    }
                }
                Child::Failed { .. } => T::counts(stats).failed += 1,
                Child::Unmatched => {
                    if let Some(side) = entry.pair.single_side() {
                        T::counts(stats).record_one_sided(side);
                    }
                }
            }
        }
    }
}

impl<P, C: PartialEq, T> LevelNode<P, C, T> {
    fn comparison_at(&self, index: usize, pair: &DualValue<C>) -> Option<&Child<T>> {
        match self.children.get(index) {
            Some(entry) if entry.pair == *pair => Some(&entry.comparison),
            _ => self.comparison_for(pair),
        }
    }
}

/// Roll-up statistics of `result`, computed from `comparison`.
pub fn statistics<T: Tally<R>, R>(comparison: &T, result: &R) -> Statistics {
    let mut stats = Statistics::default();
    comparison.tally(result, &mut stats);
    stats
}

fn compared_cells(sheet: &SheetComparison) -> u64 {
    let rows: FxHashMap<u32, u32> = sheet.alignment.paired_rows().collect();
    let columns: FxHashMap<u32, u32> = sheet.alignment.paired_columns().collect();
    let rows_back: FxHashMap<u32, u32> = rows.iter().map(|(a, b)| (*b, *a)).collect();
    let columns_back: FxHashMap<u32, u32> = columns.iter().map(|(a, b)| (*b, *a)).collect();

    let mut count = 0u64;
    for cell in sheet.left.iter() {
        if rows.contains_key(&cell.row) && columns.contains_key(&cell.column) {
            count += 1;
        }
    }
    for cell in sheet.right.iter() {
        let (Some(row_a), Some(col_a)) = (rows_back.get(&cell.row), columns_back.get(&cell.column))
        else {
            continue;
        };
        if sheet.left.get(*row_a, *col_a).is_none() {
            count += 1;
        }
    }
    count
}
