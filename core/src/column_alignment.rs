use crate::alignment::line_alignment::align_lines;
use crate::alignment::positional_pairs;
use crate::config::CompareConfig;
use crate::dual::IndexPair;
use crate::grid_view::GridView;

/// Align the columns of two grid views.
///
/// Mirrors [`align_rows`](crate::row_alignment::align_rows) over column
/// signatures, gated by `consider_column_gaps`.
pub(crate) fn align_columns(
    old: &GridView<'_>,
    new: &GridView<'_>,
    config: &CompareConfig,
) -> Vec<IndexPair> {
    if !config.consider_column_gaps {
        return positional_pairs(old.cols.len(), new.cols.len());
    }

    align_lines(
        &old.cols,
        &new.cols,
        config.column_match_threshold,
        config.alignment_window(),
    )
}
