use std::collections::BTreeMap;

use super::{ItemMatcher, merge_assignment};
use crate::dual::IndexPair;

/// Default acceptance threshold on the normalized distance.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.5;

/// Pairs items by distance, nearest first.
///
/// The matcher is built from a weigher (the magnitude of an item, e.g. a name's
/// length) and a symmetric, non-negative distance. A candidate pair's
/// normalized distance is `distance / max(weight_left, weight_right)`; the pair
/// is acceptable when that value is zero or strictly below the threshold.
///
/// Acceptable candidates are committed greedily in ascending normalized
/// distance, ties going to the lower left index and then to the lower right
/// index. Because the acceptable set is always a prefix of that order,
/// lowering the threshold can only remove pairs.
pub struct FuzzyMatcher<W, D> {
    weigher: W,
    distance: D,
    threshold: f64,
    order_preserving: bool,
    window: Option<usize>,
}

impl<W, D> FuzzyMatcher<W, D> {
    pub fn new(weigher: W, distance: D) -> Self {
        Self {
            weigher,
            distance,
            threshold: DEFAULT_FUZZY_THRESHOLD,
            order_preserving: false,
            window: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject candidates that would cross an already committed pair, so the
    /// result is a monotonic alignment.
    pub fn order_preserving(mut self, value: bool) -> Self {
        self.order_preserving = value;
        self
    }

    /// Only compare left index `i` with right indices within `window` of the
    /// position proportional to `i` on the right side.
    pub fn with_window(mut self, window: Option<usize>) -> Self {
        self.window = window;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f64,
    left: usize,
    right: usize,
}

impl<T, W, D> ItemMatcher<T> for FuzzyMatcher<W, D>
where
    W: Fn(&T) -> f64,
    D: Fn(&T, &T) -> f64,
{
    fn pair_indices(&self, left: &[T], right: &[T]) -> Vec<IndexPair> {
        if left.is_empty() || right.is_empty() {
            return merge_assignment(&vec![None; left.len()], right.len());
        }

        let left_weights: Vec<f64> = left.iter().map(&self.weigher).collect();
        let right_weights: Vec<f64> = right.iter().map(&self.weigher).collect();

        let mut candidates = Vec::new();
        for (i, item_left) in left.iter().enumerate() {
            for j in self.candidate_range(i, left.len(), right.len()) {
                let raw = (self.distance)(item_left, &right[j]);
                let score = normalize(raw, left_weights[i].max(right_weights[j]));
                if score == 0.0 || score < self.threshold {
                    candidates.push(Candidate {
                        score,
                        left: i,
                        right: j,
                    });
                }
            }
        }

        candidates.sort_by(|x, y| {
            x.score
                .total_cmp(&y.score)
                .then(x.left.cmp(&y.left))
                .then(x.right.cmp(&y.right))
        });

        let mut assignment: Vec<Option<usize>> = vec![None; left.len()];
        let mut right_taken = vec![false; right.len()];
        let mut committed: BTreeMap<usize, usize> = BTreeMap::new();

        for candidate in candidates {
            if assignment[candidate.left].is_some() || right_taken[candidate.right] {
                continue;
            }
            if self.order_preserving && crosses(&committed, candidate.left, candidate.right) {
                continue;
            }
            assignment[candidate.left] = Some(candidate.right);
            right_taken[candidate.right] = true;
            committed.insert(candidate.left, candidate.right);
        }

        tracing::trace!(
            left = left.len(),
            right = right.len(),
            paired = committed.len(),
            "fuzzy pairing resolved"
        );

        merge_assignment(&assignment, right.len())
    }
}

impl<W, D> FuzzyMatcher<W, D> {
    fn candidate_range(
        &self,
        i: usize,
        left_len: usize,
        right_len: usize,
    ) -> std::ops::Range<usize> {
        match self.window {
            None => 0..right_len,
            Some(window) => {
                let center = if left_len <= 1 {
                    0
                } else {
                    i * (right_len - 1) / (left_len - 1)
                };
                let start = center.saturating_sub(window);
                let end = center.saturating_add(window).saturating_add(1).min(right_len);
                start..end
            }
        }
    }
}

fn normalize(raw: f64, scale: f64) -> f64 {
    if !raw.is_finite() {
        return f64::INFINITY;
    }
    if raw <= 0.0 {
        return 0.0;
    }
    if scale <= 0.0 {
        return f64::INFINITY;
    }
    raw / scale
}

fn crosses(committed: &BTreeMap<usize, usize>, left: usize, right: usize) -> bool {
    if let Some((_, &before)) = committed.range(..left).next_back() {
        if before >= right {
            return true;
        }
    }
    if let Some((_, &after)) = committed.range(left + 1..).next() {
        if after <= right {
            return true;
        }
    }
    false
}
