//! Pairing of two ordered sequences.
//!
//! An [`ItemMatcher`] decides which left item corresponds to which right item.
//! Two strategies exist: [`IdentityMatcher`] pairs equal items, and
//! [`FuzzyMatcher`] pairs items whose weighted distance falls below an
//! acceptance threshold.
//!
//! # Output order
//!
//! Both strategies produce their assignment first and then merge it into one
//! sequence with [`merge_assignment`]: left items appear in their original
//! order (paired or not), and every unpaired right item is emitted just before
//! the first pair whose right index exceeds it. Right items left over at the
//! end follow the last left item. The order is therefore a pure function of
//! the inputs.

mod fuzzy;
mod identity;

pub use fuzzy::{DEFAULT_FUZZY_THRESHOLD, FuzzyMatcher};
pub use identity::IdentityMatcher;

use crate::config::CompareConfig;
use crate::dual::{DualValue, IndexPair};
use crate::edit_distance::str_distance;

pub trait ItemMatcher<T> {
    /// Pair `left` against `right`, returning index correspondences.
    ///
    /// Every index of both inputs appears exactly once in the result.
    fn pair_indices(&self, left: &[T], right: &[T]) -> Vec<IndexPair>;

    /// Pair `left` against `right`, returning the items themselves.
    fn pair(&self, left: &[T], right: &[T]) -> Vec<DualValue<T>>
    where
        T: Clone,
    {
        self.pair_indices(left, right)
            .into_iter()
            .map(|pair| DualValue {
                a: pair.a.map(|i| left[i as usize].clone()),
                b: pair.b.map(|j| right[j as usize].clone()),
            })
            .collect()
    }
}

/// Merge a left-to-right assignment into the ordered pairing described in the
/// module docs. `assignment[i]` is the right index paired with left index `i`.
pub(crate) fn merge_assignment(assignment: &[Option<usize>], right_len: usize) -> Vec<IndexPair> {
    let mut right_used = vec![false; right_len];
    for j in assignment.iter().flatten() {
        right_used[*j] = true;
    }

    let mut out = Vec::with_capacity(assignment.len() + right_len);
    let mut next_right = 0usize;

    for (i, target) in assignment.iter().enumerate() {
        match target {
            Some(j) => {
                while next_right < *j {
                    if !right_used[next_right] {
                        out.push(IndexPair::only_b(next_right as u32));
                    }
                    next_right += 1;
                }
                out.push(IndexPair::paired(i as u32, *j as u32));
            }
            None => out.push(IndexPair::only_a(i as u32)),
        }
    }

    for (j, used) in right_used.iter().enumerate().skip(next_right) {
        if !used {
            out.push(IndexPair::only_b(j as u32));
        }
    }

    out
}

/// The matcher used for child names at every level of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NameMatcher {
    Identity,
    Fuzzy { threshold: f64 },
}

impl NameMatcher {
    pub fn from_config(config: &CompareConfig) -> Self {
        if config.match_names_strictly {
            NameMatcher::Identity
        } else {
            NameMatcher::Fuzzy {
                threshold: config.name_match_threshold,
            }
        }
    }

    pub fn pair_names(&self, left: &[String], right: &[String]) -> Vec<IndexPair> {
        match self {
            NameMatcher::Identity => IdentityMatcher.pair_indices(left, right),
            NameMatcher::Fuzzy { threshold } => {
                FuzzyMatcher::new(name_weight, name_distance)
                    .with_threshold(*threshold)
                    .pair_indices(left, right)
            }
        }
    }
}

fn name_weight(name: &String) -> f64 {
    name.chars().count() as f64
}

fn name_distance(a: &String, b: &String) -> f64 {
    str_distance(a, b) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_interleaves_unpaired_right_items() {
        // left 0 <-> right 1, left 1 unpaired, left 2 <-> right 3
        let merged = merge_assignment(&[Some(1), None, Some(3)], 5);
        assert_eq!(
            merged,
            vec![
                IndexPair::only_b(0),
                IndexPair::paired(0, 1),
                IndexPair::only_a(1),
                IndexPair::only_b(2),
                IndexPair::paired(2, 3),
                IndexPair::only_b(4),
            ]
        );
    }

    #[test]
    fn merge_handles_crossing_pairs() {
        let merged = merge_assignment(&[Some(2), Some(0)], 3);
        assert_eq!(
            merged,
            vec![
                IndexPair::only_b(1),
                IndexPair::paired(0, 2),
                IndexPair::paired(1, 0),
            ]
        );
    }

    #[test]
    fn strict_names_require_equality() {
        let matcher = NameMatcher::Identity;
        let pairs = matcher.pair_names(&names(&["Sheet1", "Data"]), &names(&["Sheet 1", "Data"]));
        assert_eq!(
            pairs,
            vec![
                IndexPair::only_a(0),
                IndexPair::only_b(0),
                IndexPair::paired(1, 1),
            ]
        );
    }

    #[test]
    fn fuzzy_names_tolerate_small_edits() {
        let matcher = NameMatcher::Fuzzy { threshold: 0.5 };
        let pairs = matcher.pair_names(
            &names(&["Sheet1", "Summary"]),
            &names(&["Sheet 1", "Summary", "Appendix"]),
        );
        assert_eq!(
            pairs,
            vec![
                IndexPair::paired(0, 0),
                IndexPair::paired(1, 1),
                IndexPair::only_b(2),
            ]
        );
    }

    #[test]
    fn pair_returns_items() {
        let left = names(&["x", "y"]);
        let right = names(&["y"]);
        let pairs = IdentityMatcher.pair(&left, &right);
        assert_eq!(
            pairs,
            vec![
                DualValue::only_a("x".to_string()),
                DualValue::paired("y".to_string(), "y".to_string()),
            ]
        );
    }
}
