use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use super::{ItemMatcher, merge_assignment};
use crate::dual::IndexPair;

/// Pairs items that compare equal.
///
/// Each left item, in order, takes the earliest still-unpaired right item equal
/// to it. Items without an equal counterpart stay one-sided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityMatcher;

impl<T: Eq + Hash> ItemMatcher<T> for IdentityMatcher {
    fn pair_indices(&self, left: &[T], right: &[T]) -> Vec<IndexPair> {
        let mut pending: FxHashMap<&T, VecDeque<usize>> = FxHashMap::default();
        for (j, item) in right.iter().enumerate() {
            pending.entry(item).or_default().push_back(j);
        }

        let assignment: Vec<Option<usize>> = left
            .iter()
            .map(|item| pending.get_mut(item).and_then(VecDeque::pop_front))
            .collect();

        merge_assignment(&assignment, right.len())
    }
}
