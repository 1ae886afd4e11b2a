//! Unique-line anchors and the longest chain of them that keeps both orders.
//!
//! A line that is non-blank and occurs exactly once on each side is an anchor
//! candidate. Candidates can cross (a line moved up while another moved
//! down); the chain keeps the largest subset whose `old` and `new` positions
//! both increase, so it can split a gap into independent sub-gaps.

use rustc_hash::FxHashMap;

use crate::grid_view::LineSignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub(crate) old: usize,
    pub(crate) new: usize,
}

/// Anchor candidates between two slices, ordered by `new` position.
/// Positions are relative to the slices.
pub(crate) fn discover_anchors(
    old: &[LineSignature<'_>],
    new: &[LineSignature<'_>],
) -> Vec<Anchor> {
    let old_unique = unique_positions(old);
    if old_unique.is_empty() {
        return Vec::new();
    }

    let mut anchors: Vec<Anchor> = unique_positions(new)
        .into_iter()
        .filter_map(|(hash, j)| {
            let i = *old_unique.get(&hash)?;
            old[i].same_as(&new[j]).then_some(Anchor { old: i, new: j })
        })
        .collect();
    anchors.sort_by_key(|anchor| anchor.new);
    anchors
}

fn unique_positions(lines: &[LineSignature<'_>]) -> FxHashMap<u64, usize> {
    let mut seen: FxHashMap<u64, Option<usize>> = FxHashMap::default();
    for (pos, line) in lines.iter().enumerate() {
        if line.is_blank() {
            continue;
        }
        seen.entry(line.hash)
            .and_modify(|slot| *slot = None)
            .or_insert(Some(pos));
    }
    seen.into_iter()
        .filter_map(|(hash, pos)| pos.map(|pos| (hash, pos)))
        .collect()
}

/// The longest subsequence of `anchors` increasing on both sides.
pub(crate) fn build_anchor_chain(mut anchors: Vec<Anchor>) -> Vec<Anchor> {
    anchors.sort_by_key(|anchor| anchor.new);
    longest_increasing(&anchors, |anchor| anchor.old)
        .into_iter()
        .map(|idx| anchors[idx])
        .collect()
}

/// Patience-style LIS; returns indices into `items`.
fn longest_increasing<T>(items: &[T], key: impl Fn(&T) -> usize) -> Vec<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; items.len()];

    for (idx, item) in items.iter().enumerate() {
        let k = key(item);
        let pos = tails.partition_point(|&tail| key(&items[tail]) < k);
        if pos > 0 {
            prev[idx] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(idx);
        } else {
            tails[pos] = idx;
        }
    }

    let mut chain = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(idx) = cursor {
        chain.push(idx);
        cursor = prev[idx];
    }
    chain.reverse();
    chain
}
