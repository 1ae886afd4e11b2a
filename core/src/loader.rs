//! The injected loading capability.
//!
//! The engine never touches a file format. Everything it compares arrives
//! through a [`Loader`]: child listings at each container level and the cells
//! of individual sheets. Listings return identities relative to their parent;
//! the engine joins them onto the parent's path before descending.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::dual::Side;
use crate::error_codes;
use crate::grid::Grid;

/// A loader could not produce the listing or grid for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[GCMP_LOAD_001] failed to load {target} on side {side}: {message}")]
pub struct LoadError {
    pub side: Side,
    pub target: String,
    pub message: String,
}

impl LoadError {
    pub fn new(side: Side, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            side,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        error_codes::LOAD_FAILED
    }
}

/// Source of child listings and sheet contents for both sides.
///
/// Implementations must be `Sync`; with the `parallel` feature sibling
/// children are loaded from several threads at once.
pub trait Loader: Sync {
    /// Every directory of the tree rooted at `root`, relative to it. The root
    /// itself is the empty path.
    fn list_directories(&self, side: Side, root: &Path) -> Result<Vec<PathBuf>, LoadError>;

    /// Books directly inside `directory`, relative to it.
    fn list_books(&self, side: Side, directory: &Path) -> Result<Vec<PathBuf>, LoadError>;

    /// Sheet names of `book`, in book order.
    fn list_sheets(&self, side: Side, book: &Path) -> Result<Vec<String>, LoadError>;

    fn load_sheet(&self, side: Side, book: &Path, sheet: &str) -> Result<Grid, LoadError>;
}

impl<L: Loader + ?Sized> Loader for &L {
    fn list_directories(&self, side: Side, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        (**self).list_directories(side, root)
    }

    fn list_books(&self, side: Side, directory: &Path) -> Result<Vec<PathBuf>, LoadError> {
        (**self).list_books(side, directory)
    }

    fn list_sheets(&self, side: Side, book: &Path) -> Result<Vec<String>, LoadError> {
        (**self).list_sheets(side, book)
    }

    fn load_sheet(&self, side: Side, book: &Path, sheet: &str) -> Result<Grid, LoadError> {
        (**self).load_sheet(side, book, sheet)
    }
}

#[derive(Debug, Default)]
struct SideStore {
    directories: FxHashMap<PathBuf, Vec<PathBuf>>,
    books: FxHashMap<PathBuf, Vec<PathBuf>>,
    sheets: FxHashMap<PathBuf, Vec<String>>,
    grids: FxHashMap<(PathBuf, String), Grid>,
    failures: FxHashMap<String, String>,
}

/// A [`Loader`] over in-memory maps, one store per side.
///
/// Anything not registered fails to load. [`InMemoryLoader::fail`] marks an
/// identity (a tree root, directory or book path, or `"book/sheet"`) as
/// explicitly failing with the given message.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    a: SideStore,
    b: SideStore,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, side: Side) -> &SideStore {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    fn store_mut(&mut self, side: Side) -> &mut SideStore {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    pub fn with_directories<I, P>(mut self, side: Side, root: impl Into<PathBuf>, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.store_mut(side)
            .directories
            .insert(root.into(), dirs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_books<I, P>(mut self, side: Side, directory: impl Into<PathBuf>, books: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.store_mut(side)
            .books
            .insert(directory.into(), books.into_iter().map(Into::into).collect());
        self
    }

    /// Register a book's sheets, in order, together with their grids.
    pub fn with_book<I, S>(mut self, side: Side, book: impl Into<PathBuf>, sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, Grid)>,
        S: Into<String>,
    {
        let book = book.into();
        let store = self.store_mut(side);
        let mut names = Vec::new();
        for (name, grid) in sheets {
            let name = name.into();
            store.grids.insert((book.clone(), name.clone()), grid);
            names.push(name);
        }
        store.sheets.insert(book, names);
        self
    }

    pub fn fail(
        mut self,
        side: Side,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.store_mut(side)
            .failures
            .insert(target.into(), message.into());
        self
    }

    fn check_failure(&self, side: Side, target: &str) -> Result<(), LoadError> {
        match self.store(side).failures.get(target) {
            Some(message) => Err(LoadError::new(side, target, message.clone())),
            None => Ok(()),
        }
    }
}

fn missing(side: Side, target: &str, what: &str) -> LoadError {
    LoadError::new(side, target, format!("no such {what}"))
}

fn sheet_target(book: &Path, sheet: &str) -> String {
    format!("{}/{sheet}", book.display())
}

impl Loader for InMemoryLoader {
    fn list_directories(&self, side: Side, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let target = root.display().to_string();
        self.check_failure(side, &target)?;
        self.store(side)
            .directories
            .get(root)
            .cloned()
            .ok_or_else(|| missing(side, &target, "tree"))
    }

    fn list_books(&self, side: Side, directory: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let target = directory.display().to_string();
        self.check_failure(side, &target)?;
        self.store(side)
            .books
            .get(directory)
            .cloned()
            .ok_or_else(|| missing(side, &target, "directory"))
    }

    fn list_sheets(&self, side: Side, book: &Path) -> Result<Vec<String>, LoadError> {
        let target = book.display().to_string();
        self.check_failure(side, &target)?;
        self.store(side)
            .sheets
            .get(book)
            .cloned()
            .ok_or_else(|| missing(side, &target, "book"))
    }

    fn load_sheet(&self, side: Side, book: &Path, sheet: &str) -> Result<Grid, LoadError> {
        let target = sheet_target(book, sheet);
        self.check_failure(side, &target)?;
        self.store(side)
            .grids
            .get(&(book.to_path_buf(), sheet.to_string()))
            .cloned()
            .ok_or_else(|| missing(side, &target, "sheet"))
    }
}
