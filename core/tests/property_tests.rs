use std::collections::BTreeMap;

use grid_compare::{
    CellRecord, CompareConfig, FuzzyMatcher, Grid, IdentityMatcher, IndexPair, ItemMatcher, Side,
    align_grids, diff_grids, str_distance,
};
use proptest::prelude::*;

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{0,4}", 0..8)
}

fn grids() -> impl Strategy<Value = Grid> {
    prop::collection::vec((0u32..6, 0u32..4, "[a-c]{0,2}", prop::option::of("[xy]")), 0..20)
        .prop_map(|cells| {
            let mut unique = BTreeMap::new();
            for (row, column, content, comment) in cells {
                unique.entry((row, column)).or_insert((content, comment));
            }
            Grid::from_records(unique.into_iter().map(|((row, column), (content, comment))| {
                let record = CellRecord::new(row, column, content);
                match comment {
                    Some(comment) => record.with_comment(comment),
                    None => record,
                }
            }))
            .expect("coordinates are unique")
        })
}

fn configs() -> impl Strategy<Value = CompareConfig> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(rows, columns, fast)| {
        CompareConfig::builder()
            .consider_row_gaps(rows)
            .consider_column_gaps(columns)
            .prioritize_speed(fast)
            .fast_mode_window(2)
            .build()
            .expect("valid config")
    })
}

fn name_matcher(threshold: f64) -> impl ItemMatcher<String> {
    FuzzyMatcher::new(
        |s: &String| s.chars().count() as f64,
        |a: &String, b: &String| str_distance(a, b) as f64,
    )
    .with_threshold(threshold)
}

/// Every index of both sides appears exactly once.
fn covers(pairs: &[IndexPair], left_len: usize, right_len: usize) -> bool {
    let mut seen_a = vec![0usize; left_len];
    let mut seen_b = vec![0usize; right_len];
    for pair in pairs {
        if pair.is_empty() {
            return false;
        }
        if let Some(i) = pair.a {
            match seen_a.get_mut(i as usize) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
        if let Some(j) = pair.b {
            match seen_b.get_mut(j as usize) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
    }
    seen_a.iter().chain(seen_b.iter()).all(|count| *count == 1)
}

fn paired_count(pairs: &[IndexPair]) -> usize {
    pairs.iter().filter(|pair| pair.is_paired()).count()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn matchers_are_deterministic_and_total(
        left in names(),
        right in names(),
        threshold in 0.0f64..=1.0,
    ) {
        let identity_first = IdentityMatcher.pair_indices(&left, &right);
        let identity_second = IdentityMatcher.pair_indices(&left, &right);
        prop_assert_eq!(&identity_first, &identity_second);
        prop_assert!(covers(&identity_first, left.len(), right.len()));

        let fuzzy_first = name_matcher(threshold).pair_indices(&left, &right);
        let fuzzy_second = name_matcher(threshold).pair_indices(&left, &right);
        prop_assert_eq!(&fuzzy_first, &fuzzy_second);
        prop_assert!(covers(&fuzzy_first, left.len(), right.len()));
    }

    #[test]
    fn identity_pairs_a_sequence_with_itself(items in names()) {
        let pairs = IdentityMatcher.pair_indices(&items, &items);
        prop_assert_eq!(pairs.len(), items.len());
        for (index, pair) in pairs.iter().enumerate() {
            prop_assert_eq!(*pair, IndexPair::paired(index as u32, index as u32));
        }
    }

    #[test]
    fn stricter_threshold_never_pairs_more(
        left in names(),
        right in names(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (strict, loose) = if a <= b { (a, b) } else { (b, a) };
        let strict_pairs = name_matcher(strict).pair_indices(&left, &right);
        let loose_pairs = name_matcher(loose).pair_indices(&left, &right);
        prop_assert!(paired_count(&strict_pairs) <= paired_count(&loose_pairs));
    }

    #[test]
    fn alignment_covers_every_row_and_column(
        left in grids(),
        right in grids(),
        config in configs(),
    ) {
        let alignment = align_grids(&left, &right, &config);
        let (rows, columns) = (alignment.row_pairs.as_slice(), alignment.column_pairs.as_slice());
        prop_assert!(covers(rows, left.nrows() as usize, right.nrows() as usize));
        prop_assert!(covers(columns, left.ncols() as usize, right.ncols() as usize));
        prop_assert!(alignment.validate(&left, &right).is_ok());
    }

    #[test]
    fn reported_cells_always_differ(left in grids(), right in grids(), config in configs()) {
        let diff = diff_grids(&left, &right, &config);
        for pair in &diff.diff_cells {
            let (a, b) = pair.both().expect("both sides are always populated");
            prop_assert!(!a.content_equals(b) || !a.comment_equals(b));
        }
    }

    #[test]
    fn a_copied_row_inserted_anywhere_is_one_redundant_row(
        values in prop::collection::vec("[a-c]{1,2}", 1..12),
        at in 0usize..12,
        pick in 0usize..12,
    ) {
        let at = at % (values.len() + 1);
        let mut longer = values.clone();
        longer.insert(at, values[pick % values.len()].clone());

        let column = |values: &[String]| {
            Grid::from_records(
                values
                    .iter()
                    .enumerate()
                    .map(|(row, value)| CellRecord::new(row as u32, 0, value.as_str())),
            )
            .expect("distinct rows")
        };
        let diff = diff_grids(&column(&values), &column(&longer), &CompareConfig::default());
        prop_assert!(diff.redundant_rows_on(Side::A).is_empty());
        prop_assert_eq!(diff.redundant_rows_on(Side::B).len(), 1);
        prop_assert!(diff.diff_cells.is_empty());
    }

    #[test]
    fn a_grid_equals_its_copy(grid in grids()) {
        for config in [CompareConfig::default(), CompareConfig::most_precise()] {
            let diff = diff_grids(&grid, &grid.clone(), &config);
            prop_assert!(!diff.has_difference());
        }
    }
}
