//! Recursive comparison of trees, directories, books and sheets.
//!
//! Every container level runs the same protocol: list the children of each
//! present parent, pair them by name, then descend into the paired children
//! only. A child whose loading or comparison fails is recorded as
//! [`Child::Failed`] and its siblings carry on. Cancellation is checked at
//! every child boundary and always aborts the whole call.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::alignment::align_grids;
use crate::config::CompareConfig;
use crate::diff::CompareError;
use crate::dual::{DualValue, Side};
use crate::grid::Grid;
use crate::loader::{LoadError, Loader};
use crate::matching::NameMatcher;
use crate::progress::{CancelToken, ProgressCallback};
use crate::tree::{
    BookComparison, Child, ChildEntry, ComparisonNode, DirectoryComparison, SheetComparison,
    TreeComparison,
};

use super::hardening::HardeningController;

/// A payload that can sit below a container level of the comparison tree.
///
/// Implemented for [`SheetComparison`] (children of a book),
/// [`BookComparison`] (children of a directory) and [`DirectoryComparison`]
/// (children of a tree).
pub trait ComparisonLevel: Sized + Send {
    /// Identity of a child relative to its parent.
    type Key: Clone + Send + Sync;

    /// Progress phase reported while this level's children are compared.
    const PHASE: &'static str;

    fn list_children<L: Loader>(
        loader: &L,
        side: Side,
        parent: &Path,
    ) -> Result<Vec<Self::Key>, LoadError>;

    /// The text names are matched on.
    fn key_text(key: &Self::Key) -> String;

    /// Build the comparison for a paired child of `parent`.
    fn build<L: Loader>(
        comparator: &Comparator<'_, L>,
        parent: &DualValue<PathBuf>,
        child: &DualValue<Self::Key>,
    ) -> Result<Self, CompareError>;
}

impl ComparisonLevel for SheetComparison {
    type Key = String;
    const PHASE: &'static str = "sheets";

    fn list_children<L: Loader>(
        loader: &L,
        side: Side,
        parent: &Path,
    ) -> Result<Vec<String>, LoadError> {
        loader.list_sheets(side, parent)
    }

    fn key_text(key: &String) -> String {
        key.clone()
    }

    fn build<L: Loader>(
        comparator: &Comparator<'_, L>,
        parent: &DualValue<PathBuf>,
        child: &DualValue<String>,
    ) -> Result<Self, CompareError> {
        comparator.compare_sheets(parent, child)
    }
}

impl ComparisonLevel for BookComparison {
    type Key = PathBuf;
    const PHASE: &'static str = "books";

    fn list_children<L: Loader>(
        loader: &L,
        side: Side,
        parent: &Path,
    ) -> Result<Vec<PathBuf>, LoadError> {
        loader.list_books(side, parent)
    }

    fn key_text(key: &PathBuf) -> String {
        key.display().to_string()
    }

    fn build<L: Loader>(
        comparator: &Comparator<'_, L>,
        parent: &DualValue<PathBuf>,
        child: &DualValue<PathBuf>,
    ) -> Result<Self, CompareError> {
        comparator.compare_level::<SheetComparison>(&join_child(parent, child), false)
    }
}

impl ComparisonLevel for DirectoryComparison {
    type Key = PathBuf;
    const PHASE: &'static str = "directories";

    fn list_children<L: Loader>(
        loader: &L,
        side: Side,
        parent: &Path,
    ) -> Result<Vec<PathBuf>, LoadError> {
        loader.list_directories(side, parent)
    }

    fn key_text(key: &PathBuf) -> String {
        key.display().to_string()
    }

    fn build<L: Loader>(
        comparator: &Comparator<'_, L>,
        parent: &DualValue<PathBuf>,
        child: &DualValue<PathBuf>,
    ) -> Result<Self, CompareError> {
        comparator.compare_level::<BookComparison>(&join_child(parent, child), false)
    }
}

fn join_child(parent: &DualValue<PathBuf>, child: &DualValue<PathBuf>) -> DualValue<PathBuf> {
    let join = |side: Side| -> Option<PathBuf> {
        let parent = parent.get(side)?;
        let child = child.get(side)?;
        if child.as_os_str().is_empty() {
            Some(parent.clone())
        } else {
            Some(parent.join(child))
        }
    };
    DualValue::new(join(Side::A), join(Side::B))
}

/// Drives comparisons over an injected [`Loader`].
///
/// One comparator may serve any number of calls; each call builds a fresh
/// tree.
pub struct Comparator<'a, L: Loader> {
    loader: L,
    config: CompareConfig,
    names: NameMatcher,
    hardening: HardeningController<'a>,
}

impl<'a, L: Loader> Comparator<'a, L> {
    pub fn new(loader: L, config: CompareConfig) -> Result<Self, CompareError> {
        config.validate()?;
        let names = NameMatcher::from_config(&config);
        Ok(Self {
            loader,
            config,
            names,
            hardening: HardeningController::unbounded(),
        })
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.hardening.set_cancel(token);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.hardening.set_progress(progress);
        self
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn compare_trees(
        &self,
        roots: &DualValue<PathBuf>,
    ) -> Result<TreeComparison, CompareError> {
        self.compare_level::<DirectoryComparison>(roots, true)
    }

    pub fn compare_directories(
        &self,
        directories: &DualValue<PathBuf>,
    ) -> Result<DirectoryComparison, CompareError> {
        self.compare_level::<BookComparison>(directories, true)
    }

    pub fn compare_books(
        &self,
        books: &DualValue<PathBuf>,
    ) -> Result<BookComparison, CompareError> {
        self.compare_level::<SheetComparison>(books, true)
    }

    /// Load and align one sheet pair. A side where the book or the sheet is
    /// absent compares as an empty grid.
    pub fn compare_sheets(
        &self,
        book: &DualValue<PathBuf>,
        sheet: &DualValue<String>,
    ) -> Result<SheetComparison, CompareError> {
        let left = self.load_side(Side::A, book, sheet)?;
        let right = self.load_side(Side::B, book, sheet)?;
        let alignment = align_grids(&left, &right, &self.config);
        Ok(SheetComparison {
            left,
            right,
            alignment,
        })
    }

    /// Recompute the comparison of the child at `index`, typically after the
    /// entry was re-paired by hand. Returns `Ok(false)` when there is no
    /// paired entry at `index`.
    pub fn rebuild_child<T: ComparisonLevel>(
        &self,
        node: &mut ComparisonNode<PathBuf, T::Key, T>,
        index: usize,
    ) -> Result<bool, CompareError> {
        let Some(entry) = node.children.get(index) else {
            return Ok(false);
        };
        if !entry.pair.is_paired() {
            return Ok(false);
        }

        self.hardening.check_cancelled()?;
        let comparison = self.resolve_child::<T>(&node.parent_pair, &entry.pair)?;
        node.children[index].comparison = comparison;
        Ok(true)
    }

    fn load_side(
        &self,
        side: Side,
        book: &DualValue<PathBuf>,
        sheet: &DualValue<String>,
    ) -> Result<Grid, CompareError> {
        match (book.get(side), sheet.get(side)) {
            (Some(book), Some(sheet)) => Ok(self.loader.load_sheet(side, book, sheet)?),
            _ => Ok(Grid::new()),
        }
    }

    pub(crate) fn compare_level<T: ComparisonLevel>(
        &self,
        parent: &DualValue<PathBuf>,
        report: bool,
    ) -> Result<ComparisonNode<PathBuf, T::Key, T>, CompareError> {
        self.hardening.check_cancelled()?;

        let listed = parent
            .as_ref()
            .try_map(|side, path| T::list_children(&self.loader, side, path))?;
        let pairs = self.pair_children::<T>(listed);

        let total = pairs.iter().filter(|pair| pair.is_paired()).count();
        tracing::debug!(
            phase = T::PHASE,
            paired = total,
            one_sided = pairs.len() - total,
            "children paired"
        );

        if report {
            self.hardening.progress(T::PHASE, 0.0);
        }
        let done = AtomicUsize::new(0);

        let resolve = |pair: DualValue<T::Key>| -> Result<ChildEntry<T::Key, T>, CompareError> {
            if !pair.is_paired() {
                return Ok(ChildEntry::unmatched(pair));
            }
            self.hardening.check_cancelled()?;
            let comparison = self.resolve_child::<T>(parent, &pair)?;
            if report {
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                self.hardening
                    .progress(T::PHASE, finished as f32 / total as f32);
            }
            Ok(ChildEntry::new(pair, comparison))
        };

        #[cfg(feature = "parallel")]
        let children = pairs
            .into_par_iter()
            .map(resolve)
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let children = pairs
            .into_iter()
            .map(resolve)
            .collect::<Result<Vec<_>, _>>()?;

        if report {
            self.hardening.progress(T::PHASE, 1.0);
        }

        Ok(ComparisonNode::new(parent.clone(), children))
    }

    /// Build one paired child, isolating every failure except cancellation.
    fn resolve_child<T: ComparisonLevel>(
        &self,
        parent: &DualValue<PathBuf>,
        pair: &DualValue<T::Key>,
    ) -> Result<Child<T>, CompareError> {
        match T::build(self, parent, pair) {
            Ok(comparison) => Ok(Child::Present(comparison)),
            Err(CompareError::Cancelled) => Err(CompareError::Cancelled),
            Err(err) => {
                let name = pair.get(Side::A).map(T::key_text).unwrap_or_default();
                tracing::warn!(
                    phase = T::PHASE,
                    child = %name,
                    code = err.code(),
                    error = %err,
                    "child comparison failed; continuing with siblings"
                );
                Ok(Child::failed(err.to_string()))
            }
        }
    }

    fn pair_children<T: ComparisonLevel>(
        &self,
        listed: DualValue<Vec<T::Key>>,
    ) -> Vec<DualValue<T::Key>> {
        match (listed.a, listed.b) {
            (Some(a), Some(b)) => {
                let keys_a = self.match_keys::<T>(Side::A, &a);
                let keys_b = self.match_keys::<T>(Side::B, &b);
                self.names
                    .pair_names(&keys_a, &keys_b)
                    .into_iter()
                    .map(|pair| {
                        pair.map(|side, index| match side {
                            Side::A => a[index as usize].clone(),
                            Side::B => b[index as usize].clone(),
                        })
                    })
                    .collect()
            }
            (Some(a), None) => a.into_iter().map(DualValue::only_a).collect(),
            (None, Some(b)) => b.into_iter().map(DualValue::only_b).collect(),
            (None, None) => Vec::new(),
        }
    }

    fn match_keys<T: ComparisonLevel>(&self, side: Side, children: &[T::Key]) -> Vec<String> {
        let keys: Vec<String> = children
            .iter()
            .map(|child| {
                let text = T::key_text(child);
                if self.config.ignore_name_case {
                    text.to_lowercase()
                } else {
                    text
                }
            })
            .collect();

        {
            let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
            for key in &keys {
                let count = seen.entry(key.as_str()).or_insert(0);
                *count += 1;
                if *count == 2 {
                    tracing::warn!(
                        phase = T::PHASE,
                        side = %side,
                        key = %key,
                        "duplicate child name; pairing proceeds in listing order"
                    );
                }
            }
        }

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryLoader;

    fn one_cell(content: &str) -> Grid {
        let mut grid = Grid::new();
        grid.insert_cell(0, 0, content).expect("unique coordinate");
        grid
    }

    fn books() -> DualValue<PathBuf> {
        DualValue::paired(PathBuf::from("old.xlsx"), PathBuf::from("new.xlsx"))
    }

    #[test]
    fn sheets_pair_by_name_and_one_sided_are_unmatched() {
        let loader = InMemoryLoader::new()
            .with_book(
                Side::A,
                "old.xlsx",
                [("Summary", one_cell("1")), ("Legacy", one_cell("x"))],
            )
            .with_book(
                Side::B,
                "new.xlsx",
                [("Summary", one_cell("2")), ("Appendix", one_cell("y"))],
            );
        let config = CompareConfig::builder()
            .match_names_strictly(true)
            .build()
            .expect("valid config");
        let comparator = Comparator::new(&loader, config).expect("valid config");
        let node = comparator.compare_books(&books()).expect("books listed");

        let summary = DualValue::paired("Summary".to_string(), "Summary".to_string());
        assert!(node.comparison_for(&summary).is_some_and(Child::is_present));
        assert!(
            node.comparison_for(&DualValue::only_a("Legacy".to_string()))
                .is_some_and(Child::is_unmatched)
        );
        assert!(
            node.comparison_for(&DualValue::only_b("Appendix".to_string()))
                .is_some_and(Child::is_unmatched)
        );
    }

    #[test]
    fn failing_sheet_is_isolated() {
        let loader = InMemoryLoader::new()
            .with_book(Side::A, "old.xlsx", [("S1", one_cell("a")), ("S2", one_cell("b"))])
            .with_book(Side::B, "new.xlsx", [("S1", one_cell("a")), ("S2", one_cell("b"))])
            .fail(Side::B, "new.xlsx/S2", "checksum mismatch");
        let comparator = Comparator::new(&loader, CompareConfig::default()).expect("valid config");
        let node = comparator.compare_books(&books()).expect("books listed");

        assert_eq!(node.len(), 2);
        assert!(node.children[0].comparison.is_present());
        let reason = node.children[1]
            .comparison
            .failure_reason()
            .expect("second sheet failed");
        assert!(reason.contains("checksum mismatch"));
    }

    #[test]
    fn top_level_listing_failure_is_an_error() {
        let loader = InMemoryLoader::new().with_book(Side::A, "old.xlsx", [("S", one_cell("a"))]);
        let comparator = Comparator::new(&loader, CompareConfig::default()).expect("valid config");
        let err = comparator.compare_books(&books()).expect_err("side B is missing");
        assert!(matches!(err, CompareError::Load(_)));
    }

    #[test]
    fn one_sided_parent_lists_one_side_only() {
        let loader = InMemoryLoader::new().with_book(Side::A, "old.xlsx", [("S", one_cell("a"))]);
        let comparator = Comparator::new(&loader, CompareConfig::default()).expect("valid config");
        let node = comparator
            .compare_books(&DualValue::only_a(PathBuf::from("old.xlsx")))
            .expect("side A listed");
        assert_eq!(node.children, vec![ChildEntry::unmatched(DualValue::only_a("S".to_string()))]);

        let empty = comparator
            .compare_books(&DualValue::neither())
            .expect("nothing to list");
        assert!(empty.is_empty());
    }

    #[test]
    fn cancelled_before_start() {
        let loader = InMemoryLoader::new();
        let token = CancelToken::new();
        token.cancel();
        let comparator = Comparator::new(&loader, CompareConfig::default())
            .expect("valid config")
            .with_cancel(token);
        assert_eq!(
            comparator.compare_books(&books()).map(|_| ()),
            Err(CompareError::Cancelled)
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CompareConfig {
            row_match_threshold: 2.0,
            ..CompareConfig::default()
        };
        let err = Comparator::new(InMemoryLoader::new(), config)
            .err()
            .expect("threshold out of range");
        assert!(matches!(err, CompareError::InvalidConfig(_)));
    }

    #[test]
    fn case_insensitive_names_pair_exactly() {
        let loader = InMemoryLoader::new()
            .with_book(Side::A, "old.xlsx", [("Totals", one_cell("1"))])
            .with_book(Side::B, "new.xlsx", [("TOTALS", one_cell("1"))]);
        let config = CompareConfig::builder()
            .match_names_strictly(true)
            .ignore_name_case(true)
            .build()
            .expect("valid config");
        let comparator = Comparator::new(&loader, config).expect("valid config");
        let node = comparator.compare_books(&books()).expect("books listed");
        assert_eq!(
            node.children[0].pair,
            DualValue::paired("Totals".to_string(), "TOTALS".to_string())
        );
    }
}
