use crate::alignment::line_alignment::align_lines;
use crate::alignment::positional_pairs;
use crate::config::CompareConfig;
use crate::dual::IndexPair;
use crate::grid_view::GridView;

/// Align the rows of two grid views.
///
/// Rows pair by index when row gaps are not considered; otherwise row
/// signatures go through the gap-by-gap line alignment, with a windowed
/// fuzzy pass when speed is prioritized.
pub(crate) fn align_rows(
    old: &GridView<'_>,
    new: &GridView<'_>,
    config: &CompareConfig,
) -> Vec<IndexPair> {
    if !config.consider_row_gaps {
        return positional_pairs(old.rows.len(), new.rows.len());
    }

    align_lines(
        &old.rows,
        &new.rows,
        config.row_match_threshold,
        config.alignment_window(),
    )
}
