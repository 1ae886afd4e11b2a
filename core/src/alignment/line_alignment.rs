//! Order-preserving alignment of two line sequences (rows or columns).
//!
//! Lines are aligned gap by gap, starting with the whole sequences:
//!
//! 1. identical leading and trailing lines pair off;
//! 2. the anchor chain of the gap, if any, is committed and every stretch
//!    between two anchors becomes a new gap;
//! 3. a gap without anchors pairs identical lines by LCS when both sides fit
//!    in [`MAX_LCS_GAP_SIZE`], then runs the fuzzy matcher between them;
//! 4. lines still unpaired between two committed pairs pair positionally
//!    when both sides hold the same number of them.
//!
//! Blank lines never enter the fuzzy candidate set; they pair only as
//! identical lines or positionally.

use std::ops::Range;

use super::anchor_chain::{build_anchor_chain, discover_anchors};
use crate::dual::IndexPair;
use crate::grid_view::LineSignature;
use crate::matching::{FuzzyMatcher, ItemMatcher, merge_assignment};

pub(crate) const MAX_LCS_GAP_SIZE: usize = 1500;

/// Above this many candidate pairs an unwindowed fuzzy pass is windowed.
const MAX_FUZZY_CANDIDATES: usize = 1 << 20;
const FALLBACK_WINDOW: usize = 64;

type Gap = (Range<usize>, Range<usize>);

/// Align `old` against `new`. The result is monotonic on both sides and
/// covers every index exactly once.
pub(crate) fn align_lines(
    old: &[LineSignature<'_>],
    new: &[LineSignature<'_>],
    threshold: f64,
    window: Option<usize>,
) -> Vec<IndexPair> {
    let mut aligner = LineAligner {
        old,
        new,
        threshold,
        window,
        assignment: vec![None; old.len()],
    };

    let mut gaps: Vec<Gap> = vec![(0..old.len(), 0..new.len())];
    while let Some((a, b)) = gaps.pop() {
        aligner.align_gap(a, b, &mut gaps);
    }

    tracing::trace!(
        old = old.len(),
        new = new.len(),
        paired = aligner.assignment.iter().flatten().count(),
        "lines aligned"
    );

    merge_assignment(&aligner.assignment, new.len())
}

struct LineAligner<'s, 'a> {
    old: &'s [LineSignature<'a>],
    new: &'s [LineSignature<'a>],
    threshold: f64,
    window: Option<usize>,
    assignment: Vec<Option<usize>>,
}

impl LineAligner<'_, '_> {
    fn align_gap(&mut self, mut a: Range<usize>, mut b: Range<usize>, gaps: &mut Vec<Gap>) {
        let (old, new) = (self.old, self.new);

        while !a.is_empty() && !b.is_empty() && old[a.start].same_as(&new[b.start]) {
            self.commit(a.start, b.start);
            a.start += 1;
            b.start += 1;
        }
        while !a.is_empty() && !b.is_empty() && old[a.end - 1].same_as(&new[b.end - 1]) {
            self.commit(a.end - 1, b.end - 1);
            a.end -= 1;
            b.end -= 1;
        }
        if a.is_empty() || b.is_empty() {
            return;
        }

        let chain = build_anchor_chain(discover_anchors(&old[a.clone()], &new[b.clone()]));
        if !chain.is_empty() {
            let (mut next_a, mut next_b) = (a.start, b.start);
            for anchor in chain {
                let (i, j) = (a.start + anchor.old, b.start + anchor.new);
                self.commit(i, j);
                gaps.push((next_a..i, next_b..j));
                next_a = i + 1;
                next_b = j + 1;
            }
            gaps.push((next_a..a.end, next_b..b.end));
            return;
        }

        if a.len() <= MAX_LCS_GAP_SIZE && b.len() <= MAX_LCS_GAP_SIZE {
            self.align_by_lcs(a, b);
        } else {
            self.align_fuzzy(a, b);
        }
    }

    fn align_by_lcs(&mut self, a: Range<usize>, b: Range<usize>) {
        let (old, new) = (self.old, self.new);
        let matches = lcs_pairs(&old[a.clone()], &new[b.clone()]);

        let (mut next_a, mut next_b) = (a.start, b.start);
        for (i, j) in matches {
            let (i, j) = (a.start + i, b.start + j);
            self.align_fuzzy(next_a..i, next_b..j);
            self.commit(i, j);
            next_a = i + 1;
            next_b = j + 1;
        }
        self.align_fuzzy(next_a..a.end, next_b..b.end);
    }

    fn align_fuzzy(&mut self, a: Range<usize>, b: Range<usize>) {
        if a.is_empty() || b.is_empty() {
            return;
        }
        let (old, new) = (self.old, self.new);
        let old_lines: Vec<&LineSignature<'_>> =
            old[a.clone()].iter().filter(|line| !line.is_blank()).collect();
        let new_lines: Vec<&LineSignature<'_>> =
            new[b.clone()].iter().filter(|line| !line.is_blank()).collect();

        let window = self.window.or_else(|| {
            (old_lines.len().saturating_mul(new_lines.len()) > MAX_FUZZY_CANDIDATES)
                .then_some(FALLBACK_WINDOW)
        });
        let pairs = FuzzyMatcher::new(
            |line: &&LineSignature<'_>| line.weight(),
            |x: &&LineSignature<'_>, y: &&LineSignature<'_>| x.distance(y),
        )
        .with_threshold(self.threshold)
        .order_preserving(true)
        .with_window(window)
        .pair_indices(&old_lines, &new_lines);

        let (mut next_a, mut next_b) = (a.start, b.start);
        for (i, j) in pairs.iter().filter_map(IndexPair::both) {
            let i = old_lines[*i as usize].index as usize;
            let j = new_lines[*j as usize].index as usize;
            self.pair_positionally(next_a..i, next_b..j);
            self.commit(i, j);
            next_a = i + 1;
            next_b = j + 1;
        }
        self.pair_positionally(next_a..a.end, next_b..b.end);
    }

    fn pair_positionally(&mut self, a: Range<usize>, b: Range<usize>) {
        if a.len() == b.len() {
            for (i, j) in a.zip(b) {
                self.commit(i, j);
            }
        }
    }

    fn commit(&mut self, i: usize, j: usize) {
        self.assignment[i] = Some(j);
    }
}

/// Pairs of identical lines forming a longest common subsequence, in order.
fn lcs_pairs(old: &[LineSignature<'_>], new: &[LineSignature<'_>]) -> Vec<(usize, usize)> {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;
    // table[i * width + j]: LCS length of old[i..] and new[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i].same_as(&new[j]) {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[0] as usize);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i].same_as(&new[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::grid_view::GridView;

    fn column(values: &[&str]) -> Grid {
        let mut grid = Grid::new();
        for (row, value) in values.iter().enumerate() {
            if !value.is_empty() {
                grid.insert_cell(row as u32, 0, *value).expect("unique coordinate");
            }
        }
        grid
    }

    fn rows(old: &Grid, new: &Grid) -> Vec<IndexPair> {
        let (old, new) = (GridView::from_grid(old), GridView::from_grid(new));
        align_lines(&old.rows, &new.rows, 0.5, None)
    }

    fn one_sided(pairs: &[IndexPair]) -> (Vec<u32>, Vec<u32>) {
        let a = pairs.iter().filter(|p| p.is_only_a()).filter_map(|p| p.a).collect();
        let b = pairs.iter().filter(|p| p.is_only_b()).filter_map(|p| p.b).collect();
        (a, b)
    }

    #[test]
    fn duplicate_rows_do_not_cross_an_insertion() {
        let longer = column(&["a", "y", "x", "y"]);
        let shorter = column(&["a", "x", "y"]);

        assert_eq!(one_sided(&rows(&longer, &shorter)), (vec![1], vec![]));
        assert_eq!(one_sided(&rows(&shorter, &longer)), (vec![], vec![1]));
    }

    #[test]
    fn duplicates_without_anchors_use_the_lcs() {
        let old = column(&["h", "y", "x", "x", "y"]);
        let new = column(&["h", "x", "y"]);
        let pairs = rows(&old, &new);
        assert_eq!(one_sided(&pairs), (vec![1, 3], vec![]));
        assert!(pairs.contains(&IndexPair::paired(2, 1)));
    }

    #[test]
    fn single_cell_edit_pairs_positionally() {
        let old = column(&["A", "B", "C"]);
        let new = column(&["A", "Z", "C"]);
        assert_eq!(
            rows(&old, &new),
            vec![
                IndexPair::paired(0, 0),
                IndexPair::paired(1, 1),
                IndexPair::paired(2, 2),
            ]
        );
    }

    #[test]
    fn unequal_gaps_stay_one_sided() {
        let old = column(&["A", "B", "C"]);
        let new = column(&["A", "P", "Q", "C"]);
        assert_eq!(one_sided(&rows(&old, &new)), (vec![1], vec![1, 2]));
    }

    #[test]
    fn blank_rows_pair_as_identical_lines() {
        let mut old = column(&["top"]);
        old.insert_cell(50_000, 0, "end").expect("unique coordinate");
        let mut new = column(&["top"]);
        new.insert_cell(50_000, 0, "end2").expect("unique coordinate");

        let pairs = rows(&old, &new);
        assert_eq!(pairs.len(), 50_001);
        assert!(pairs.iter().all(IndexPair::is_paired));
        assert_eq!(pairs[50_000], IndexPair::paired(50_000, 50_000));
    }

    #[test]
    fn lcs_prefers_the_longest_identical_chain() {
        let old_grid = column(&["p", "q", "r", "q"]);
        let new_grid = column(&["q", "r", "p"]);
        let old = GridView::from_grid(&old_grid);
        let new = GridView::from_grid(&new_grid);
        assert_eq!(lcs_pairs(&old.rows, &new.rows), vec![(1, 0), (2, 1)]);
    }
}
