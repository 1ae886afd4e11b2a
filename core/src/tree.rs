//! Comparison and result trees.
//!
//! Every container level (book, directory, tree) has the same shape: the
//! pair of parent identities and an ordered list of child entries. Each entry
//! holds the paired (or one-sided) child identities and a [`Child`] that says
//! whether a comparison exists for it and, if not, why.
//!
//! These are plain values. A node may be built by hand, edited through
//! [`LevelNode::unpair`] and [`LevelNode::pair`], or deserialized, and then
//! passed to the result computation in place of a computed one.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::alignment::GridAlignmentResult;
use crate::diff::SheetDiff;
use crate::dual::DualValue;
use crate::grid::Grid;

/// The outcome slot for one child entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Child<T> {
    Present(T),
    /// The entry is one-sided, or paired but not yet compared.
    Unmatched,
    /// Loading or comparing the child failed; siblings are unaffected.
    Failed { reason: String },
}

impl<T> Child<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        Child::Failed {
            reason: reason.into(),
        }
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Child::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Child::Present(_))
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Child::Unmatched)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Child::Failed { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Child::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry<C, T> {
    pub pair: DualValue<C>,
    pub comparison: Child<T>,
}

impl<C, T> ChildEntry<C, T> {
    pub fn new(pair: DualValue<C>, comparison: Child<T>) -> Self {
        Self { pair, comparison }
    }

    pub fn unmatched(pair: DualValue<C>) -> Self {
        Self::new(pair, Child::Unmatched)
    }
}

/// One container level: parent identities `P`, child identities `C`, and
/// per-child payload `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelNode<P, C, T> {
    pub parent_pair: DualValue<P>,
    pub children: Vec<ChildEntry<C, T>>,
}

/// A level of the comparison tree; `T` is the next level's comparison.
pub type ComparisonNode<P, C, T> = LevelNode<P, C, T>;

/// A level of the result tree; `T` is the next level's result.
pub type ResultNode<P, C, T> = LevelNode<P, C, T>;

/// Both grids of a paired sheet together with their alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetComparison {
    pub left: Grid,
    pub right: Grid,
    pub alignment: GridAlignmentResult,
}

pub type BookComparison = ComparisonNode<PathBuf, String, SheetComparison>;
pub type DirectoryComparison = ComparisonNode<PathBuf, PathBuf, BookComparison>;
pub type TreeComparison = ComparisonNode<PathBuf, PathBuf, DirectoryComparison>;

pub type BookResult = ResultNode<PathBuf, String, SheetDiff>;
pub type DirectoryResult = ResultNode<PathBuf, PathBuf, BookResult>;
pub type TreeResult = ResultNode<PathBuf, PathBuf, DirectoryResult>;

impl<P, C, T> LevelNode<P, C, T> {
    pub fn new(parent_pair: DualValue<P>, children: Vec<ChildEntry<C, T>>) -> Self {
        Self {
            parent_pair,
            children,
        }
    }

    pub fn child_pairs(&self) -> impl Iterator<Item = &DualValue<C>> {
        self.children.iter().map(|entry| &entry.pair)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The comparison recorded for `pair`, if the pair is one of this
    /// node's children.
    pub fn comparison_for(&self, pair: &DualValue<C>) -> Option<&Child<T>>
    where
        C: PartialEq,
    {
        self.children
            .iter()
            .find(|entry| entry.pair == *pair)
            .map(|entry| &entry.comparison)
    }

    /// Split the paired entry at `index` into an A-only entry followed by a
    /// B-only entry. Returns `false` if the entry is missing or not paired.
    pub fn unpair(&mut self, index: usize) -> bool {
        let Some(entry) = self.children.get(index) else {
            return false;
        };
        if !entry.pair.is_paired() {
            return false;
        }

        let entry = self.children.remove(index);
        let DualValue { a, b } = entry.pair;
        self.children
            .insert(index, ChildEntry::unmatched(DualValue::new(None, b)));
        self.children
            .insert(index, ChildEntry::unmatched(DualValue::new(a, None)));
        true
    }

    /// Join the A-only entry at `a_index` with the B-only entry at `b_index`.
    ///
    /// The joined entry takes the earlier of the two positions and starts out
    /// [`Child::Unmatched`] until rebuilt. Returns its index, or `None` when
    /// either index does not name a one-sided entry on the expected side.
    pub fn pair(&mut self, a_index: usize, b_index: usize) -> Option<usize> {
        let a_ok = self
            .children
            .get(a_index)
            .is_some_and(|entry| entry.pair.is_only_a());
        let b_ok = self
            .children
            .get(b_index)
            .is_some_and(|entry| entry.pair.is_only_b());
        if !a_ok || !b_ok {
            return None;
        }

        let (first, second) = if a_index < b_index {
            (a_index, b_index)
        } else {
            (b_index, a_index)
        };
        let later = self.children.remove(second);
        let earlier = std::mem::replace(
            &mut self.children[first],
            ChildEntry::unmatched(DualValue::neither()),
        );

        let (from_a, from_b) = if a_index < b_index {
            (earlier, later)
        } else {
            (later, earlier)
        };
        self.children[first] = ChildEntry::unmatched(DualValue::new(from_a.pair.a, from_b.pair.b));
        Some(first)
    }
}
