//! Property tests for the flex distributor and the table solver.

use proptest::prelude::*;
use weft_layout::table::{self, CellMetrics, TableLayoutInput, TableMetrics, row_capacity};
use weft_layout::{FlexSize, distribute};

fn arb_flex_size() -> impl Strategy<Value = FlexSize> {
    prop_oneof![
        (1u16..40).prop_map(FlexSize::Fixed),
        (1u16..10).prop_map(FlexSize::Proportional),
    ]
}

#[derive(Debug)]
struct Grid(Vec<Vec<Option<CellMetrics>>>);

impl TableMetrics for Grid {
    fn row_count(&self) -> usize {
        self.0.len()
    }

    fn column_count(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> Option<CellMetrics> {
        self.0.get(row)?.get(column).copied().flatten()
    }
}

fn arb_cell() -> impl Strategy<Value = Option<CellMetrics>> {
    prop::option::weighted(
        0.85,
        (0u16..12, 0u16..6, 0u16..3, prop::bool::weighted(0.8)).prop_map(
            |(width, max_width, expansion, selectable)| CellMetrics {
                width,
                max_width,
                expansion,
                selectable,
            },
        ),
    )
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (0usize..12, 0usize..8)
        .prop_flat_map(|(rows, cols)| prop::collection::vec(prop::collection::vec(arb_cell(), cols), rows))
        .prop_map(Grid)
}

fn arb_input() -> impl Strategy<Value = TableLayoutInput> {
    (
        (0u16..60, 0u16..20, 0usize..4, 0usize..3),
        (any::<bool>(), any::<bool>(), 0usize..15, 0usize..10),
        (0usize..20, 0usize..10, any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(
            |(
                (width, height, fixed_rows, fixed_columns),
                (rows_selectable, columns_selectable, sel_row, sel_col),
                (row_offset, column_offset, track_end, borders, evaluate_all_rows),
            )| TableLayoutInput {
                width,
                height,
                fixed_rows,
                fixed_columns,
                rows_selectable,
                columns_selectable,
                selected: (sel_row, sel_col),
                row_offset,
                column_offset,
                track_end,
                borders,
                evaluate_all_rows,
            },
        )
}

proptest! {
    #[test]
    fn flex_sizes_sum_to_available(
        items in prop::collection::vec(arb_flex_size(), 1..12),
        available in 0u16..500,
    ) {
        let sizes = distribute(&items, available);
        prop_assert_eq!(sizes.len(), items.len());
        let fixed: u32 = items.iter().map(|i| match i { FlexSize::Fixed(f) => u32::from(*f), _ => 0 }).sum();
        let has_flexible = items.iter().any(|i| matches!(i, FlexSize::Proportional(_)));
        let total: u32 = sizes.iter().map(|&s| u32::from(s)).sum();
        if has_flexible && u32::from(available) >= fixed {
            prop_assert_eq!(total, u32::from(available));
        }
        prop_assert!(total <= u32::from(available));
    }

    #[test]
    fn flex_fixed_items_get_their_size_when_room(
        items in prop::collection::vec(arb_flex_size(), 1..8),
    ) {
        let fixed: u32 = items.iter().map(|i| match i { FlexSize::Fixed(f) => u32::from(*f), _ => 0 }).sum();
        let sizes = distribute(&items, fixed.min(u32::from(u16::MAX)) as u16);
        for (item, size) in items.iter().zip(&sizes) {
            match item {
                FlexSize::Fixed(f) => prop_assert_eq!(f, size),
                FlexSize::Proportional(_) => prop_assert_eq!(*size, 0),
            }
        }
    }

    #[test]
    fn table_selection_is_always_selectable(grid in arb_grid(), input in arb_input()) {
        let layout = table::solve(&input, &grid);
        if let Some((row, column)) = layout.selected {
            let cell = grid.cell(row, column);
            prop_assert!(cell.is_some_and(|c| c.selectable));
        }
        let selectable_exists = (0..grid.row_count()).any(|r| {
            (0..grid.column_count()).any(|c| grid.cell(r, c).is_some_and(|m| m.selectable))
        });
        if (input.rows_selectable || input.columns_selectable) && selectable_exists {
            prop_assert!(layout.selected.is_some());
        }
    }

    #[test]
    fn table_rows_fit_capacity_and_are_valid(grid in arb_grid(), input in arb_input()) {
        let layout = table::solve(&input, &grid);
        prop_assert!(layout.rows.len() <= row_capacity(input.height, input.borders));
        prop_assert!(layout.rows.iter().all(|&r| r < grid.row_count()));
        let fixed = input.fixed_rows.min(grid.row_count());
        let window = row_capacity(input.height, input.borders).saturating_sub(fixed);
        prop_assert!(layout.row_offset <= (grid.row_count() - fixed).saturating_sub(window));
    }

    #[test]
    fn table_selected_row_is_visible(grid in arb_grid(), input in arb_input()) {
        let layout = table::solve(&input, &grid);
        let capacity = row_capacity(input.height, input.borders);
        if input.rows_selectable
            && let Some((row, _)) = layout.selected
            && capacity > input.fixed_rows.min(grid.row_count())
        {
            prop_assert!(layout.rows.contains(&row), "row {} not in {:?}", row, layout.rows);
        }
    }

    #[test]
    fn table_selected_column_is_visible(grid in arb_grid(), input in arb_input()) {
        let layout = table::solve(&input, &grid);
        let Some((_, column)) = layout.selected else {
            return Ok(());
        };
        if !input.columns_selectable || layout.rows.is_empty() || input.width == 0 {
            return Ok(());
        }
        let evaluated: Vec<usize> = if input.evaluate_all_rows {
            (0..grid.row_count()).collect()
        } else {
            layout.rows.clone()
        };
        let fixed = input.fixed_columns.min(grid.column_count());
        let fixed_width: u32 = (0..fixed)
            .map(|c| {
                let widest = evaluated
                    .iter()
                    .filter_map(|&r| grid.cell(r, c))
                    .map(|m| m.clipped_width())
                    .max()
                    .unwrap_or(0);
                u32::from(widest) + 1
            })
            .sum::<u32>()
            + u32::from(input.borders);
        if fixed_width <= u32::from(input.width) {
            prop_assert!(
                layout.columns.iter().any(|c| c.index == column),
                "column {} not in {:?}",
                column,
                layout.columns
            );
        }
    }

    #[test]
    fn table_columns_are_ordered_and_unique(grid in arb_grid(), input in arb_input()) {
        let layout = table::solve(&input, &grid);
        let indices: Vec<usize> = layout.columns.iter().map(|c| c.index).collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]), "{:?}", indices);
        prop_assert!(indices.iter().all(|&c| c < grid.column_count()));
    }

    #[test]
    fn table_width_matches_columns(grid in arb_grid(), input in arb_input()) {
        let layout = table::solve(&input, &grid);
        if layout.columns.is_empty() {
            return Ok(());
        }
        let total: u32 = layout.columns.iter().map(|c| u32::from(c.width) + 1).sum::<u32>()
            + u32::from(input.borders);
        prop_assert_eq!(layout.table_width, total);
        let has_expansion = layout.columns.iter().any(|c| {
            layout.rows.iter().any(|&r| grid.cell(r, c.index).is_some_and(|m| m.expansion > 0))
        });
        if has_expansion && !input.evaluate_all_rows && total < u32::from(input.width) {
            prop_assert!(false, "leftover width {} was not distributed", u32::from(input.width) - total);
        }
    }
}
