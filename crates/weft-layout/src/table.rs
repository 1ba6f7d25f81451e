#![forbid(unsafe_code)]

//! Table layout: which rows and columns are visible, how wide the columns
//! are, and where the scroll offsets end up.
//!
//! The solver is independent of how cells store or measure their text. It
//! reads cells through [`TableMetrics`] and returns a [`TableLayout`].
//!
//! Every column is followed by a one-cell separator. With borders, the
//! table gets an extra left border column and every row takes two screen
//! lines (a separator line above the content line).

use weft_core::debug;

/// Measurements of one populated cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMetrics {
    /// Display width of the cell text (tags excluded).
    pub width: u16,
    /// Upper bound on the column width this cell asks for; 0 = unbounded.
    pub max_width: u16,
    /// Share of leftover width; 0 = none.
    pub expansion: u16,
    pub selectable: bool,
}

impl CellMetrics {
    /// Width this cell contributes to its column.
    pub fn clipped_width(&self) -> u16 {
        if self.max_width > 0 {
            self.width.min(self.max_width)
        } else {
            self.width
        }
    }
}

/// Read access to a sparse cell grid.
pub trait TableMetrics {
    fn row_count(&self) -> usize;
    /// One past the right-most column that has a cell in any row.
    fn column_count(&self) -> usize;
    /// `None` for unset cells.
    fn cell(&self, row: usize, column: usize) -> Option<CellMetrics>;
}

/// Everything the solver needs besides the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableLayoutInput {
    pub width: u16,
    pub height: u16,
    pub fixed_rows: usize,
    pub fixed_columns: usize,
    pub rows_selectable: bool,
    pub columns_selectable: bool,
    /// `(row, column)` of the current selection.
    pub selected: (usize, usize),
    pub row_offset: usize,
    pub column_offset: usize,
    pub track_end: bool,
    pub borders: bool,
    /// Measure columns over every row instead of only the visible ones.
    pub evaluate_all_rows: bool,
}

/// A visible column and its resolved width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub index: usize,
    pub width: u16,
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableLayout {
    /// Visible row indices, fixed rows first.
    pub rows: Vec<usize>,
    /// Visible columns, fixed columns first. The last one may be clipped.
    pub columns: Vec<ColumnSpan>,
    pub row_offset: usize,
    pub column_offset: usize,
    pub track_end: bool,
    /// Selection after skipping unselectable cells; `None` if selection is
    /// disabled or no cell can be selected.
    pub selected: Option<(usize, usize)>,
    /// Cells used horizontally, separators and border included.
    pub table_width: u32,
}

/// Table rows that fit in `height` screen lines.
pub const fn row_capacity(height: u16, borders: bool) -> usize {
    if borders {
        height as usize / 2
    } else {
        height as usize
    }
}

/// Walk forward in row-major order from `start` to the first populated,
/// selectable cell, wrapping around once.
pub fn next_selectable(metrics: &dyn TableMetrics, start: (usize, usize)) -> Option<(usize, usize)> {
    let rows = metrics.row_count();
    let columns = metrics.column_count();
    if rows == 0 || columns == 0 {
        return None;
    }
    let (row, column) = if start.0 >= rows {
        (rows - 1, 0)
    } else {
        (start.0, start.1.min(columns - 1))
    };
    let total = rows * columns;
    let first = row * columns + column;
    (0..total)
        .map(|step| (first + step) % total)
        .map(|i| (i / columns, i % columns))
        .find(|&(r, c)| metrics.cell(r, c).is_some_and(|m| m.selectable))
}

/// Lay out a table.
pub fn solve(input: &TableLayoutInput, metrics: &dyn TableMetrics) -> TableLayout {
    let row_count = metrics.row_count();
    let column_count = metrics.column_count();
    let selecting = input.rows_selectable || input.columns_selectable;

    let selected = if selecting {
        next_selectable(metrics, input.selected)
    } else {
        None
    };

    // Rows.
    let capacity = row_capacity(input.height, input.borders);
    let fixed_rows = input.fixed_rows.min(row_count);
    let scrollable_rows = row_count - fixed_rows;
    let window = capacity.saturating_sub(fixed_rows);
    let mut row_offset = input.row_offset;
    let mut track_end = input.track_end;

    if window > 0 && scrollable_rows.saturating_sub(row_offset) < window {
        track_end = true;
    }
    if track_end {
        row_offset = scrollable_rows.saturating_sub(window);
    }
    if input.rows_selectable
        && let Some((row, _)) = selected
        && row >= fixed_rows
    {
        if row < fixed_rows + row_offset {
            row_offset = row - fixed_rows;
            track_end = false;
        }
        if window > 0 && row >= fixed_rows + row_offset + window {
            row_offset = row + 1 - fixed_rows - window;
            track_end = false;
        }
    }
    row_offset = row_offset.min(scrollable_rows.saturating_sub(window));

    let rows: Vec<usize> = (0..fixed_rows)
        .chain(fixed_rows + row_offset..row_count)
        .take(capacity)
        .collect();

    if rows.is_empty() || input.width == 0 {
        return TableLayout {
            rows,
            row_offset,
            column_offset: input.column_offset,
            track_end,
            selected,
            ..TableLayout::default()
        };
    }

    // Columns.
    let fixed_columns = input.fixed_columns.min(column_count);
    let mut column_offset = input.column_offset;
    if input.columns_selectable
        && let Some((_, column)) = selected
        && column >= fixed_columns
        && column < fixed_columns + column_offset
    {
        column_offset = column - fixed_columns;
    }

    let width = u32::from(input.width);
    let mut columns: Vec<(ColumnSpan, u16)> = Vec::new();
    let mut used: u32 = u32::from(input.borders);
    let mut skipped = 0usize;
    let all_rows: Vec<usize>;
    let evaluated: &[usize] = if input.evaluate_all_rows {
        all_rows = (0..row_count).collect();
        &all_rows
    } else {
        &rows
    };

    'columns: for column in 0..=column_count {
        while used > width {
            if column <= fixed_columns {
                break 'columns;
            }
            match selected {
                Some((_, sel)) if input.columns_selectable => {
                    if sel == fixed_columns + skipped {
                        // The selection would be evicted next.
                        break 'columns;
                    }
                    if skipped >= column_offset && sel + 1 < column {
                        // Offset reached and the selection is not the clipped last column.
                        break 'columns;
                    }
                }
                _ => {
                    if skipped >= column_offset {
                        break 'columns;
                    }
                }
            }
            if columns.len() <= fixed_columns {
                break 'columns;
            }
            let (evicted, _) = columns.remove(fixed_columns);
            skipped += 1;
            used -= u32::from(evicted.width) + 1;
        }
        if column == column_count {
            break;
        }

        let mut col_width = 0u16;
        let mut expansion = 0u16;
        for &row in evaluated {
            if let Some(cell) = metrics.cell(row, column) {
                col_width = col_width.max(cell.clipped_width());
                expansion = expansion.max(cell.expansion);
            }
        }
        columns.push((
            ColumnSpan {
                index: column,
                width: col_width,
            },
            expansion,
        ));
        used += u32::from(col_width) + 1;
    }

    // Leftover width, shared by expansion weight.
    if used < width {
        let mut left = width - used;
        let mut weight_total: u32 = columns.iter().map(|(_, e)| u32::from(*e)).sum();
        for (span, expansion) in &mut columns {
            if weight_total == 0 {
                break;
            }
            let weight = u32::from(*expansion);
            let extra = left * weight / weight_total;
            span.width = span.width.saturating_add(extra as u16);
            left -= extra;
            weight_total -= weight;
        }
        used = width - left;
    }

    debug!(
        rows = rows.len(),
        columns = columns.len(),
        row_offset,
        column_offset = skipped,
        "table layout solved"
    );

    TableLayout {
        rows,
        columns: columns.into_iter().map(|(span, _)| span).collect(),
        row_offset,
        column_offset: skipped,
        track_end,
        selected,
        table_width: used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dense grid of `(width, selectable)` with optional holes.
    struct Grid {
        cells: Vec<Vec<Option<CellMetrics>>>,
    }

    impl Grid {
        fn uniform(rows: usize, columns: usize, width: u16) -> Self {
            let cell = CellMetrics {
                width,
                selectable: true,
                ..Default::default()
            };
            Self {
                cells: vec![vec![Some(cell); columns]; rows],
            }
        }

        fn with_widths(widths: &[u16]) -> Self {
            let row = widths
                .iter()
                .map(|&width| {
                    Some(CellMetrics {
                        width,
                        selectable: true,
                        ..Default::default()
                    })
                })
                .collect();
            Self { cells: vec![row] }
        }

        fn set(&mut self, row: usize, column: usize, f: impl FnOnce(&mut CellMetrics)) {
            if let Some(cell) = self.cells[row][column].as_mut() {
                f(cell);
            }
        }
    }

    impl TableMetrics for Grid {
        fn row_count(&self) -> usize {
            self.cells.len()
        }

        fn column_count(&self) -> usize {
            self.cells.iter().map(Vec::len).max().unwrap_or(0)
        }

        fn cell(&self, row: usize, column: usize) -> Option<CellMetrics> {
            self.cells.get(row)?.get(column).copied().flatten()
        }
    }

    fn widths(layout: &TableLayout) -> Vec<(usize, u16)> {
        layout.columns.iter().map(|c| (c.index, c.width)).collect()
    }

    #[test]
    fn empty_grid_yields_empty_layout() {
        let grid = Grid { cells: Vec::new() };
        let layout = solve(
            &TableLayoutInput {
                width: 10,
                height: 5,
                rows_selectable: true,
                ..Default::default()
            },
            &grid,
        );
        assert!(layout.rows.is_empty());
        assert!(layout.columns.is_empty());
        assert_eq!(layout.selected, None);
    }

    #[test]
    fn zero_area_is_valid() {
        let grid = Grid::uniform(3, 3, 2);
        let layout = solve(&TableLayoutInput::default(), &grid);
        assert!(layout.rows.is_empty());
        assert!(layout.columns.is_empty());
    }

    #[test]
    fn column_width_is_max_over_rows_clipped_by_max_width() {
        let mut grid = Grid::uniform(2, 2, 3);
        grid.set(1, 0, |c| c.width = 8);
        grid.set(1, 1, |c| {
            c.width = 20;
            c.max_width = 5;
        });
        let layout = solve(
            &TableLayoutInput {
                width: 40,
                height: 5,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(widths(&layout), vec![(0, 8), (1, 5)]);
        assert_eq!(layout.table_width, 15);
    }

    #[test]
    fn leftover_width_follows_expansion_weights() {
        let mut grid = Grid::with_widths(&[2, 2, 2]);
        grid.set(0, 1, |c| c.expansion = 1);
        grid.set(0, 2, |c| c.expansion = 2);
        let layout = solve(
            &TableLayoutInput {
                width: 18,
                height: 1,
                ..Default::default()
            },
            &grid,
        );
        // 9 cells used, 9 left: 3 for weight 1, 6 for weight 2.
        assert_eq!(widths(&layout), vec![(0, 2), (1, 5), (2, 8)]);
        assert_eq!(layout.table_width, 18);
    }

    #[test]
    fn visible_rows_start_with_fixed_rows() {
        let grid = Grid::uniform(10, 1, 1);
        let layout = solve(
            &TableLayoutInput {
                width: 5,
                height: 4,
                fixed_rows: 1,
                row_offset: 3,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.rows, vec![0, 4, 5, 6]);
        assert!(!layout.track_end);
    }

    #[test]
    fn borders_halve_row_capacity() {
        let grid = Grid::uniform(10, 1, 1);
        let layout = solve(
            &TableLayoutInput {
                width: 5,
                height: 7,
                borders: true,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.rows, vec![0, 1, 2]);
        assert_eq!(row_capacity(7, true), 3);
    }

    #[test]
    fn offset_past_end_turns_on_track_end() {
        let grid = Grid::uniform(10, 1, 1);
        let layout = solve(
            &TableLayoutInput {
                width: 5,
                height: 4,
                row_offset: 9,
                ..Default::default()
            },
            &grid,
        );
        assert!(layout.track_end);
        assert_eq!(layout.row_offset, 6);
        assert_eq!(layout.rows, vec![6, 7, 8, 9]);
    }

    #[test]
    fn selection_below_window_scrolls_minimally() {
        let grid = Grid::uniform(20, 1, 1);
        let layout = solve(
            &TableLayoutInput {
                width: 5,
                height: 5,
                fixed_rows: 1,
                rows_selectable: true,
                selected: (9, 0),
                ..Default::default()
            },
            &grid,
        );
        // One fixed row plus four scrolling rows; row 9 must be the last.
        assert_eq!(layout.row_offset, 5);
        assert_eq!(layout.rows, vec![0, 6, 7, 8, 9]);
    }

    #[test]
    fn selection_above_window_scrolls_up() {
        let grid = Grid::uniform(20, 1, 1);
        let layout = solve(
            &TableLayoutInput {
                width: 5,
                height: 5,
                fixed_rows: 2,
                rows_selectable: true,
                selected: (4, 0),
                row_offset: 10,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.row_offset, 2);
        assert_eq!(layout.rows, vec![0, 1, 4, 5, 6]);
    }

    #[test]
    fn selection_wins_over_track_end() {
        let grid = Grid::uniform(30, 1, 1);
        let layout = solve(
            &TableLayoutInput {
                width: 5,
                height: 5,
                rows_selectable: true,
                selected: (0, 0),
                track_end: true,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.row_offset, 0);
        assert!(!layout.track_end);
    }

    #[test]
    fn unselectable_selection_advances_row_major() {
        let mut grid = Grid::uniform(5, 3, 1);
        grid.set(2, 0, |c| c.selectable = false);
        let layout = solve(
            &TableLayoutInput {
                width: 20,
                height: 10,
                fixed_rows: 2,
                rows_selectable: true,
                columns_selectable: true,
                selected: (2, 0),
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.selected, Some((2, 1)));
    }

    #[test]
    fn selection_skips_holes_and_wraps() {
        let mut grid = Grid::uniform(2, 2, 1);
        grid.cells[1][1] = None;
        grid.set(1, 0, |c| c.selectable = false);
        assert_eq!(next_selectable(&grid, (1, 0)), Some((0, 0)));
    }

    #[test]
    fn nothing_selectable_clears_selection() {
        let mut grid = Grid::uniform(2, 2, 1);
        for r in 0..2 {
            for c in 0..2 {
                grid.set(r, c, |m| m.selectable = false);
            }
        }
        assert_eq!(next_selectable(&grid, (0, 0)), None);
    }

    #[test]
    fn selection_beyond_grid_is_clamped() {
        let grid = Grid::uniform(3, 3, 1);
        assert_eq!(next_selectable(&grid, (10, 10)), Some((2, 0)));
        assert_eq!(next_selectable(&grid, (1, 10)), Some((1, 2)));
    }

    #[test]
    fn column_offset_evicts_left_most_scrollable_column() {
        let grid = Grid::with_widths(&[4, 4, 4, 4, 4]);
        let layout = solve(
            &TableLayoutInput {
                width: 12,
                height: 1,
                fixed_columns: 1,
                column_offset: 2,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.column_offset, 2);
        assert_eq!(layout.columns[0].index, 0);
        assert_eq!(layout.columns[1].index, 3);
    }

    #[test]
    fn column_offset_is_clamped_when_everything_fits() {
        let grid = Grid::with_widths(&[2, 2]);
        let layout = solve(
            &TableLayoutInput {
                width: 20,
                height: 1,
                column_offset: 5,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.column_offset, 0);
        assert_eq!(layout.columns.len(), 2);
    }

    #[test]
    fn selected_column_is_scrolled_into_view() {
        let grid = Grid::with_widths(&[4, 4, 4, 4, 4, 4]);
        let layout = solve(
            &TableLayoutInput {
                width: 10,
                height: 1,
                columns_selectable: true,
                selected: (0, 4),
                ..Default::default()
            },
            &grid,
        );
        let visible: Vec<usize> = layout.columns.iter().map(|c| c.index).collect();
        assert!(visible.contains(&4), "visible columns: {visible:?}");
        let pos = visible.iter().position(|&c| c == 4).unwrap_or(0);
        let start: u32 = layout.columns[..pos].iter().map(|c| u32::from(c.width) + 1).sum();
        assert!(start + 4 <= 10, "selected column must be fully visible");
    }

    #[test]
    fn selected_column_left_of_offset_pulls_offset_back() {
        let grid = Grid::with_widths(&[4, 4, 4, 4, 4, 4]);
        let layout = solve(
            &TableLayoutInput {
                width: 10,
                height: 1,
                fixed_columns: 1,
                columns_selectable: true,
                selected: (0, 2),
                column_offset: 4,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(layout.column_offset, 1);
        assert_eq!(layout.columns[1].index, 2);
    }

    #[test]
    fn fixed_columns_alone_overflowing_stop_the_solver() {
        let grid = Grid::with_widths(&[8, 8, 8]);
        let layout = solve(
            &TableLayoutInput {
                width: 10,
                height: 1,
                fixed_columns: 2,
                column_offset: 1,
                ..Default::default()
            },
            &grid,
        );
        let visible: Vec<usize> = layout.columns.iter().map(|c| c.index).collect();
        assert_eq!(visible, vec![0, 1]);
        assert_eq!(layout.column_offset, 0);
    }

    #[test]
    fn evaluate_all_rows_measures_hidden_rows() {
        let mut grid = Grid::uniform(10, 1, 2);
        grid.set(9, 0, |c| c.width = 7);
        let visible_only = solve(
            &TableLayoutInput {
                width: 20,
                height: 3,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(visible_only.columns[0].width, 2);
        let all = solve(
            &TableLayoutInput {
                width: 20,
                height: 3,
                evaluate_all_rows: true,
                ..Default::default()
            },
            &grid,
        );
        assert_eq!(all.columns[0].width, 7);
    }
}
