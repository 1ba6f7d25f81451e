#![forbid(unsafe_code)]

//! A scrollable grid of text cells.
//!
//! Cells are stored sparsely, row by row. Rows and columns at the top and
//! left can be fixed so they stay visible while the rest scrolls. Column
//! widths come from the widest cell in each column, measured over the rows
//! on screen (or all rows, see [`Table::set_evaluate_all_rows`]).
//!
//! Rows, columns, or single cells can be made selectable. Without
//! selection the arrow keys scroll the table instead.

use std::sync::{Arc, RwLock, Weak};

use weft_core::event::{KeyCode, KeyEvent, MouseAction, MouseEvent};
use weft_core::geometry::Rect;
use weft_layout::table::{next_selectable, row_capacity, solve};
use weft_layout::{
    Alignment, CellMetrics, ColumnSpan, ScrollBarVisibility, ScrollWindow, TableLayout,
    TableLayoutInput, TableMetrics,
};
use weft_render::{CellGrid, CellStyle, PackedRgba, StyleFlags};
use weft_style::{BorderGlyphs, Theme};
use weft_text::{PrintOptions, print, tagged_width};

use crate::block::{Block, text_style};
use crate::scrollbar::ScrollBar;
use crate::{Primitive, PrimitiveRef, read, write};

/// Called with `(row, column)`.
pub type SelectionFn = Arc<dyn Fn(usize, usize) + Send + Sync>;
/// Called with the key that ended interaction with the table.
pub type DoneFn = Arc<dyn Fn(KeyCode) + Send + Sync>;

/// One cell of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Text, possibly with style tags.
    pub text: String,
    pub align: Alignment,
    /// Upper bound on the column width this cell asks for; 0 = unbounded.
    pub max_width: u16,
    /// Share of leftover table width given to this cell's column.
    pub expansion: u16,
    pub color: PackedRgba,
    /// Transparent keeps the table background.
    pub background: PackedRgba,
    pub attrs: StyleFlags,
    pub not_selectable: bool,
    /// `(x, y, width)` where the cell was last drawn.
    drawn: Option<(u16, u16, u16)>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            text: String::new(),
            align: Alignment::Left,
            max_width: 0,
            expansion: 0,
            color: Theme::current().primary_text,
            background: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
            not_selectable: false,
            drawn: None,
        }
    }
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn max_width(mut self, max_width: u16) -> Self {
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub fn expansion(mut self, expansion: u16) -> Self {
        self.expansion = expansion;
        self
    }

    #[must_use]
    pub fn color(mut self, color: PackedRgba) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn background(mut self, color: PackedRgba) -> Self {
        self.background = color;
        self
    }

    #[must_use]
    pub fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.not_selectable = !selectable;
        self
    }

    /// `(x, y, width)` of the last draw, `None` if the cell was never on
    /// screen.
    pub fn last_position(&self) -> Option<(u16, u16, u16)> {
        self.drawn
    }

    fn metrics(&self) -> CellMetrics {
        CellMetrics {
            width: u16::try_from(tagged_width(&self.text)).unwrap_or(u16::MAX),
            max_width: self.max_width,
            expansion: self.expansion,
            selectable: !self.not_selectable,
        }
    }
}

type Rows = Vec<Vec<Option<TableCell>>>;

/// The cell store as the layout solver sees it.
struct Cells<'a>(&'a Rows);

impl TableMetrics for Cells<'_> {
    fn row_count(&self) -> usize {
        self.0.len()
    }

    fn column_count(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> Option<CellMetrics> {
        self.0.get(row)?.get(column)?.as_ref().map(TableCell::metrics)
    }
}

struct TableState {
    rows: Rows,
    borders: bool,
    border_glyphs: BorderGlyphs,
    border_color: PackedRgba,
    separator: char,
    fixed_rows: usize,
    fixed_columns: usize,
    rows_selectable: bool,
    columns_selectable: bool,
    selected: (usize, usize),
    selected_style: Option<CellStyle>,
    window: ScrollWindow,
    evaluate_all_rows: bool,
    scroll_bar: ScrollBarVisibility,
    ellipsis: char,
    layout: TableLayout,
    on_selection_changed: Option<SelectionFn>,
    on_selected: Option<SelectionFn>,
    on_done: Option<DoneFn>,
}

impl TableState {
    fn selecting(&self) -> bool {
        self.rows_selectable || self.columns_selectable
    }

    fn selection(&self) -> Option<(usize, usize)> {
        self.selecting().then_some(self.selected)
    }

    fn column_count(&self) -> usize {
        Cells(&self.rows).column_count()
    }

    fn is_selectable(&self, row: usize, column: usize) -> bool {
        Cells(&self.rows)
            .cell(row, column)
            .is_some_and(|m| m.selectable)
    }

    fn row_accepts(&self, row: usize) -> bool {
        if self.columns_selectable {
            self.is_selectable(row, self.selected.1)
        } else {
            (0..self.column_count()).any(|c| self.is_selectable(row, c))
        }
    }

    fn column_accepts(&self, column: usize) -> bool {
        if self.rows_selectable {
            self.is_selectable(self.selected.0, column)
        } else {
            (0..self.rows.len()).any(|r| self.is_selectable(r, column))
        }
    }

    /// Move the selected row to `target`, or the nearest acceptable row
    /// from there in the direction of travel.
    fn move_row(&mut self, target: usize, forward: bool) {
        let Some(last) = self.rows.len().checked_sub(1) else {
            return;
        };
        let start = target.min(last);
        let found = if forward {
            (start..=last).find(|&r| self.row_accepts(r))
        } else {
            (0..=start).rev().find(|&r| self.row_accepts(r))
        };
        if let Some(row) = found {
            self.selected.0 = row;
        }
    }

    fn move_column(&mut self, target: usize, forward: bool) {
        let Some(last) = self.column_count().checked_sub(1) else {
            return;
        };
        let start = target.min(last);
        let found = if forward {
            (start..=last).find(|&c| self.column_accepts(c))
        } else {
            (0..=start).rev().find(|&c| self.column_accepts(c))
        };
        if let Some(column) = found {
            self.selected.1 = column;
        }
    }

    /// Scrollable rows on one screen.
    fn page(&self) -> usize {
        self.window
            .visible_rows
            .saturating_sub(self.fixed_rows)
            .max(1)
    }

    fn layout_input(&self, width: u16, height: u16) -> TableLayoutInput {
        TableLayoutInput {
            width,
            height,
            fixed_rows: self.fixed_rows,
            fixed_columns: self.fixed_columns,
            rows_selectable: self.rows_selectable,
            columns_selectable: self.columns_selectable,
            selected: self.selected,
            row_offset: self.window.row_offset,
            column_offset: self.window.column_offset,
            track_end: self.window.track_end,
            borders: self.borders,
            evaluate_all_rows: self.evaluate_all_rows,
        }
    }

    fn apply_layout(&mut self, layout: TableLayout) {
        self.window.row_offset = layout.row_offset;
        self.window.column_offset = layout.column_offset;
        self.window.track_end = layout.track_end;
        self.window.visible_rows = layout.rows.len();
        self.window.visible_columns = layout.columns.iter().map(|c| c.index).collect();
        self.window.column_widths = layout.columns.iter().map(|c| c.width).collect();
        if let Some(selected) = layout.selected {
            self.selected = selected;
        }
        self.layout = layout;
    }
}

/// A table of text cells.
pub struct Table {
    block: Block,
    state: RwLock<TableState>,
}

impl Table {
    pub fn new() -> Arc<Self> {
        let theme = Theme::current();
        Arc::new_cyclic(|me: &Weak<Self>| {
            let table = Self {
                block: Block::default(),
                state: RwLock::new(TableState {
                    rows: Vec::new(),
                    borders: false,
                    border_glyphs: theme.borders,
                    border_color: theme.graphics,
                    separator: ' ',
                    fixed_rows: 0,
                    fixed_columns: 0,
                    rows_selectable: false,
                    columns_selectable: false,
                    selected: (0, 0),
                    selected_style: None,
                    window: ScrollWindow::default(),
                    evaluate_all_rows: false,
                    scroll_bar: ScrollBarVisibility::Auto,
                    ellipsis: theme.ellipsis,
                    layout: TableLayout::default(),
                    on_selection_changed: None,
                    on_selected: None,
                    on_done: None,
                }),
            };
            let owner: Weak<dyn Primitive> = me.clone();
            table.block.bind(owner);
            table
        })
    }

    /// Put `cell` at `(row, column)`, growing the grid as needed.
    pub fn set_cell(&self, row: usize, column: usize, cell: TableCell) {
        let mut s = write(&self.state);
        if s.rows.len() <= row {
            s.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut s.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, None);
        }
        cells[column] = Some(cell);
    }

    /// Set a cell with default attributes.
    pub fn set_cell_text(&self, row: usize, column: usize, text: impl Into<String>) {
        self.set_cell(row, column, TableCell::new(text));
    }

    /// A copy of the cell at `(row, column)`; a fresh default cell for
    /// positions that were never set.
    pub fn cell(&self, row: usize, column: usize) -> TableCell {
        read(&self.state)
            .rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(Clone::clone)
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        read(&self.state).rows.len()
    }

    /// One past the right-most column holding a cell in any row.
    pub fn column_count(&self) -> usize {
        read(&self.state).column_count()
    }

    /// Insert an empty row before `row`. Rows past the end are ignored.
    pub fn insert_row(&self, row: usize) {
        let mut s = write(&self.state);
        if row < s.rows.len() {
            s.rows.insert(row, Vec::new());
        }
    }

    pub fn remove_row(&self, row: usize) {
        let mut s = write(&self.state);
        if row < s.rows.len() {
            s.rows.remove(row);
        }
    }

    /// Insert an empty column before `column` in every row that reaches it.
    pub fn insert_column(&self, column: usize) {
        let mut s = write(&self.state);
        for cells in s.rows.iter_mut().filter(|cells| column < cells.len()) {
            cells.insert(column, None);
        }
    }

    pub fn remove_column(&self, column: usize) {
        let mut s = write(&self.state);
        for cells in s.rows.iter_mut().filter(|cells| column < cells.len()) {
            cells.remove(column);
        }
    }

    /// Remove all cells and reset scrolling.
    pub fn clear(&self) {
        let mut s = write(&self.state);
        s.rows.clear();
        s.window = ScrollWindow::default();
        s.layout = TableLayout::default();
    }

    /// Draw box-drawing lines around and between cells. Every row then
    /// takes two screen lines.
    pub fn set_borders(&self, borders: bool) {
        write(&self.state).borders = borders;
    }

    pub fn set_border_glyphs(&self, glyphs: BorderGlyphs) {
        write(&self.state).border_glyphs = glyphs;
    }

    pub fn set_border_color(&self, color: PackedRgba) {
        write(&self.state).border_color = color;
    }

    /// Column separator used without borders.
    pub fn set_separator(&self, separator: char) {
        write(&self.state).separator = separator;
    }

    /// Rows at the top and columns at the left that never scroll.
    pub fn set_fixed(&self, rows: usize, columns: usize) {
        let mut s = write(&self.state);
        s.fixed_rows = rows;
        s.fixed_columns = columns;
    }

    /// Rows only, columns only, single cells (both), or nothing.
    pub fn set_selectable(&self, rows: bool, columns: bool) {
        let mut s = write(&self.state);
        s.rows_selectable = rows;
        s.columns_selectable = columns;
    }

    /// Select `(row, column)`. Unselectable targets move to the next
    /// selectable cell on the next draw.
    pub fn select(&self, row: usize, column: usize) {
        let changed = {
            let mut s = write(&self.state);
            let before = s.selection();
            s.selected = (row, column);
            (before != s.selection()).then(|| s.on_selection_changed.clone())
        };
        if let Some(Some(callback)) = changed {
            callback(row, column);
        }
    }

    /// Current selection, `None` while nothing is selectable.
    pub fn selection(&self) -> Option<(usize, usize)> {
        read(&self.state).selection()
    }

    /// Style of selected cells. Without one, selected cells are reversed.
    pub fn set_selected_style(&self, style: CellStyle) {
        write(&self.state).selected_style = Some(style);
    }

    pub fn offset(&self) -> (usize, usize) {
        let s = read(&self.state);
        (s.window.row_offset, s.window.column_offset)
    }

    pub fn set_offset(&self, row: usize, column: usize) {
        let mut s = write(&self.state);
        s.window.track_end = false;
        s.window.row_offset = row;
        s.window.column_offset = column;
    }

    /// Measure column widths over all rows instead of the visible ones.
    /// Widths then stay put while scrolling, at the cost of a full pass.
    pub fn set_evaluate_all_rows(&self, all: bool) {
        write(&self.state).evaluate_all_rows = all;
    }

    pub fn scroll_to_beginning(&self) {
        write(&self.state).window.scroll_to_beginning();
    }

    /// Show the last rows and keep following the end as rows are added.
    pub fn scroll_to_end(&self) {
        write(&self.state).window.scroll_to_end();
    }

    pub fn set_scroll_bar_visibility(&self, visibility: ScrollBarVisibility) {
        write(&self.state).scroll_bar = visibility;
    }

    pub fn set_selection_changed_fn(&self, f: impl Fn(usize, usize) + Send + Sync + 'static) {
        write(&self.state).on_selection_changed = Some(Arc::new(f));
    }

    /// Called when Enter is pressed on a selection.
    pub fn set_selected_fn(&self, f: impl Fn(usize, usize) + Send + Sync + 'static) {
        write(&self.state).on_selected = Some(Arc::new(f));
    }

    /// Called with Escape, Tab or Backtab, and with Enter when nothing is
    /// selectable.
    pub fn set_done_fn(&self, f: impl Fn(KeyCode) + Send + Sync + 'static) {
        write(&self.state).on_done = Some(Arc::new(f));
    }

    /// The result of the last layout pass.
    pub fn layout(&self) -> TableLayout {
        read(&self.state).layout.clone()
    }

    /// The cell drawn at screen position `(x, y)` by the last draw.
    pub fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let inner = self.inner_rect();
        if !inner.contains(x, y) {
            return None;
        }
        let s = read(&self.state);
        let line = usize::from(y - inner.y);
        let index = if s.borders {
            if line % 2 == 0 {
                return None;
            }
            line / 2
        } else {
            line
        };
        let row = *s.layout.rows.get(index)?;

        let mut left = u32::from(inner.x) + u32::from(s.borders);
        for span in &s.layout.columns {
            let right = left + u32::from(span.width);
            if u32::from(x) < left {
                return None;
            }
            if u32::from(x) < right {
                return Some((row, span.index));
            }
            left = right + 1;
        }
        None
    }

    /// Solve the layout for an area of `width` by `height`.
    fn solve_layout(s: &TableState, width: u16, height: u16) -> TableLayout {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "table_layout",
            rows = s.rows.len(),
            width = width,
            height = height
        )
        .entered();

        solve(&s.layout_input(width, height), &Cells(&s.rows))
    }
}

/// Border glyphs and column spans copied out of the state so grid lines
/// can be drawn without holding the lock.
struct GridFrame {
    glyphs: BorderGlyphs,
    color: PackedRgba,
    columns: Vec<ColumnSpan>,
    table_width: u32,
    left: u16,
    right: u16,
}

impl GridFrame {
    fn style(&self) -> CellStyle {
        CellStyle::default().fg(self.color)
    }

    fn draw_line(&self, grid: &mut dyn CellGrid, y: u16, position: LinePosition) {
        let g = self.glyphs;
        let style = self.style();
        let (first, middle, last) = match position {
            LinePosition::Top => (g.top_left, g.top_t, g.top_right),
            LinePosition::Middle => (g.left_t, g.cross, g.right_t),
            LinePosition::Bottom => (g.bottom_left, g.bottom_t, g.bottom_right),
        };
        let (left, right) = (self.left, self.right);
        let end = u32::from(left) + self.table_width;
        for x in left..right.min(u16::try_from(end).unwrap_or(u16::MAX)) {
            grid.set_content(x, y, g.horizontal, &[], style);
        }
        let mut x = u32::from(left);
        let count = self.columns.len();
        for (i, span) in std::iter::once(None)
            .chain(self.columns.iter().map(Some))
            .enumerate()
        {
            if let Some(span) = span {
                x += u32::from(span.width) + 1;
            }
            if x >= u32::from(right) {
                break;
            }
            let glyph = if i == 0 {
                first
            } else if i == count {
                last
            } else {
                middle
            };
            grid.set_content(x as u16, y, glyph, &[], style);
        }
    }
}

/// One step of a table draw, recorded under the lock and painted after.
enum Paint {
    Line(u16, LinePosition),
    Glyph(u16, u16, char),
    Cell {
        x: u16,
        y: u16,
        width: u16,
        text: String,
        align: Alignment,
        style: CellStyle,
        selected: bool,
    },
}

#[derive(Debug, Clone, Copy)]
enum LinePosition {
    Top,
    Middle,
    Bottom,
}

impl Primitive for Table {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, grid: &mut dyn CellGrid) {
        if !self.is_visible() {
            return;
        }
        let focused = self.has_focus();
        let inner = self.inner_rect();

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Table",
            x = inner.x,
            y = inner.y,
            w = inner.width,
            h = inner.height
        )
        .entered();

        self.block.draw_frame(grid, focused);
        if inner.is_empty() {
            return;
        }
        let background = self.block.background();

        let (paints, frame, ellipsis, bar, changed) = {
            let mut s = write(&self.state);
            let before = s.selection();

            let capacity = row_capacity(inner.height, s.borders);
            let bar = ScrollBar::new(s.scroll_bar).focused(focused);
            let show_bar = bar.is_shown(
                s.rows.len(),
                u16::try_from(capacity).unwrap_or(u16::MAX),
            );
            let width = inner.width - u16::from(show_bar && inner.width > 1);
            let layout = Self::solve_layout(&s, width, inner.height);
            s.apply_layout(layout);

            let frame = GridFrame {
                glyphs: s.border_glyphs,
                color: s.border_color,
                columns: s.layout.columns.clone(),
                table_width: s.layout.table_width,
                left: inner.x,
                right: inner.x + width,
            };
            let (left, right) = (frame.left, frame.right);
            let mut xs = Vec::with_capacity(frame.columns.len());
            let mut x = u32::from(left) + u32::from(s.borders);
            for span in &frame.columns {
                xs.push(x);
                x += u32::from(span.width) + 1;
            }

            let mut paints = Vec::new();
            let selection = s.selection();
            let (rows_selectable, columns_selectable) = (s.rows_selectable, s.columns_selectable);
            let visible_rows = s.layout.rows.clone();
            for (i, &row) in visible_rows.iter().enumerate() {
                let y = if s.borders {
                    let line = inner.y + 2 * i as u16;
                    let position = if i == 0 {
                        LinePosition::Top
                    } else {
                        LinePosition::Middle
                    };
                    paints.push(Paint::Line(line, position));
                    paints.push(Paint::Glyph(left, line + 1, s.border_glyphs.vertical));
                    line + 1
                } else {
                    inner.y + i as u16
                };

                for (j, span) in frame.columns.iter().enumerate() {
                    let x = xs[j];
                    if x >= u32::from(right) {
                        break;
                    }
                    let x = x as u16;
                    let width = span.width.min(right - x);
                    let separator_x = u32::from(x) + u32::from(span.width);
                    let is_last = j + 1 == frame.columns.len();
                    if separator_x < u32::from(right) {
                        if s.borders {
                            paints.push(Paint::Glyph(
                                separator_x as u16,
                                y,
                                s.border_glyphs.vertical,
                            ));
                        } else if !is_last {
                            paints.push(Paint::Glyph(separator_x as u16, y, s.separator));
                        }
                    }

                    let selected = selection.is_some_and(|(r, c)| {
                        (!rows_selectable || r == row) && (!columns_selectable || c == span.index)
                    });
                    let selected_style = s.selected_style;
                    let Some(cell) = s
                        .rows
                        .get_mut(row)
                        .and_then(|cells| cells.get_mut(span.index))
                        .and_then(Option::as_mut)
                    else {
                        continue;
                    };
                    cell.drawn = Some((x, y, width));

                    let bg = if cell.background.is_default() {
                        background
                    } else {
                        cell.background
                    };
                    let mut style = text_style(cell.color, bg).attrs(cell.attrs);
                    if selected {
                        style = selected_style
                            .unwrap_or_else(|| style.attrs(style.attrs | StyleFlags::REVERSE));
                    }
                    paints.push(Paint::Cell {
                        x,
                        y,
                        width,
                        text: cell.text.clone(),
                        align: cell.align,
                        style,
                        selected,
                    });
                }
            }

            if s.borders && !visible_rows.is_empty() {
                let line = inner.y + 2 * visible_rows.len() as u16;
                if line < inner.bottom() {
                    paints.push(Paint::Line(line, LinePosition::Bottom));
                }
            }

            let bar = show_bar.then(|| {
                let items = s.rows.len();
                let cursor = match s.selection() {
                    Some((row, _)) if s.rows_selectable => row,
                    _ => {
                        let max = items.saturating_sub(s.window.visible_rows);
                        if max == 0 {
                            0
                        } else {
                            (items - 1) * s.window.row_offset / max
                        }
                    }
                };
                let area = Rect::new(inner.right() - 1, inner.y, 1, inner.height);
                (bar, area, items, cursor)
            });

            let after = s.selection();
            let changed = (before != after)
                .then(|| s.on_selection_changed.clone().zip(after))
                .flatten();
            (paints, frame, s.ellipsis, bar, changed)
        };

        for paint in paints {
            match paint {
                Paint::Line(y, position) => frame.draw_line(grid, y, position),
                Paint::Glyph(x, y, ch) => grid.set_content(x, y, ch, &[], frame.style()),
                Paint::Cell {
                    x,
                    y,
                    width,
                    text,
                    align,
                    style,
                    selected,
                } => {
                    if selected {
                        grid.fill(Rect::new(x, y, width, 1), ' ', style);
                    }
                    let options = PrintOptions::new(x, y, width)
                        .align(align)
                        .style(style)
                        .ellipsis(ellipsis);
                    print(grid, &text, &options);
                }
            }
        }
        if let Some((bar, area, items, cursor)) = bar {
            bar.draw(grid, area, items, cursor);
        }
        if let Some((callback, (row, column))) = changed {
            callback(row, column);
        }
    }

    fn key_event(&self, event: KeyEvent, _set_focus: &mut dyn FnMut(PrimitiveRef)) {
        enum Outcome {
            Done(DoneFn, KeyCode),
            Selected(SelectionFn, usize, usize),
            Changed(SelectionFn, usize, usize),
            Nothing,
        }

        let outcome = {
            let mut s = write(&self.state);
            let selecting = s.selecting();
            let key = event.code;
            if matches!(key, KeyCode::Escape | KeyCode::Tab | KeyCode::BackTab)
                || (key == KeyCode::Enter && !selecting)
            {
                match s.on_done.clone() {
                    Some(f) => Outcome::Done(f, key),
                    None => Outcome::Nothing,
                }
            } else if key == KeyCode::Enter {
                let selected = next_selectable(&Cells(&s.rows), s.selected);
                match (s.on_selected.clone(), selected) {
                    (Some(f), Some((row, column))) => Outcome::Selected(f, row, column),
                    _ => Outcome::Nothing,
                }
            } else {
                let before = s.selection();
                let (row, column) = s.selected;
                let page = s.page();
                let rows = s.rows_selectable;
                let columns = s.columns_selectable;
                match key {
                    KeyCode::Up | KeyCode::Char('k') if rows => {
                        if let Some(target) = row.checked_sub(1) {
                            s.move_row(target, false);
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') if rows => s.move_row(row + 1, true),
                    KeyCode::Left | KeyCode::Char('h') if columns => {
                        if let Some(target) = column.checked_sub(1) {
                            s.move_column(target, false);
                        }
                    }
                    KeyCode::Right | KeyCode::Char('l') if columns => {
                        s.move_column(column + 1, true);
                    }
                    KeyCode::PageDown if rows => s.move_row(row + page, true),
                    KeyCode::PageUp if rows => s.move_row(row.saturating_sub(page), false),
                    KeyCode::Home | KeyCode::Char('g') if selecting => {
                        s.move_row(0, true);
                        s.move_column(0, true);
                    }
                    KeyCode::End | KeyCode::Char('G') if selecting => {
                        let last_row = s.rows.len().saturating_sub(1);
                        let last_column = s.column_count().saturating_sub(1);
                        s.move_row(last_row, false);
                        s.move_column(last_column, false);
                    }
                    KeyCode::Up | KeyCode::Char('k') => s.window.scroll_rows(-1),
                    KeyCode::Down | KeyCode::Char('j') => s.window.scroll_rows(1),
                    KeyCode::Left | KeyCode::Char('h') => s.window.scroll_columns(-1),
                    KeyCode::Right | KeyCode::Char('l') => s.window.scroll_columns(1),
                    KeyCode::PageDown => s.window.scroll_rows(page as isize),
                    KeyCode::PageUp => s.window.scroll_rows(-(page as isize)),
                    KeyCode::Home | KeyCode::Char('g') => s.window.scroll_to_beginning(),
                    KeyCode::End | KeyCode::Char('G') => s.window.scroll_to_end(),
                    _ => {}
                }
                match (s.selection(), s.on_selection_changed.clone()) {
                    (Some((row, column)), Some(f)) if s.selection() != before => {
                        Outcome::Changed(f, row, column)
                    }
                    _ => Outcome::Nothing,
                }
            }
        };

        match outcome {
            Outcome::Done(f, key) => f(key),
            Outcome::Selected(f, row, column) | Outcome::Changed(f, row, column) => f(row, column),
            Outcome::Nothing => {}
        }
    }

    fn mouse_event(
        &self,
        action: MouseAction,
        event: MouseEvent,
        set_focus: &mut dyn FnMut(PrimitiveRef),
    ) -> (bool, Option<PrimitiveRef>) {
        if !self.block.in_rect(event.x, event.y) {
            return (false, None);
        }
        match action {
            MouseAction::LeftDown => self.block.focus_on_click(action, event, set_focus),
            MouseAction::LeftClick => {
                let selecting = read(&self.state).selecting();
                if selecting && let Some((row, column)) = self.cell_at(event.x, event.y) {
                    let selectable = read(&self.state).is_selectable(row, column);
                    if selectable {
                        self.select(row, column);
                    }
                }
                if let Some(owner) = self.block.owner() {
                    set_focus(owner);
                }
                (true, None)
            }
            MouseAction::ScrollUp => {
                write(&self.state).window.scroll_rows(-1);
                (true, None)
            }
            MouseAction::ScrollDown => {
                write(&self.state).window.scroll_rows(1);
                (true, None)
            }
            MouseAction::ScrollLeft => {
                write(&self.state).window.scroll_columns(-1);
                (true, None)
            }
            MouseAction::ScrollRight => {
                write(&self.state).window.scroll_columns(1);
                (true, None)
            }
            _ => (false, None),
        }
    }
}

/// First selectable cell at or after `(row, column)` in reading order.
pub fn first_selectable(table: &Table, row: usize, column: usize) -> Option<(usize, usize)> {
    let s = read(&table.state);
    next_selectable(&Cells(&s.rows), (row, column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use weft_core::event::{MouseButton, MouseEventKind};
    use weft_render::Buffer;

    fn table_with(rows: usize, columns: usize) -> Arc<Table> {
        let table = Table::new();
        table.set_scroll_bar_visibility(ScrollBarVisibility::Never);
        for r in 0..rows {
            for c in 0..columns {
                table.set_cell_text(r, c, format!("{r}{c}"));
            }
        }
        table
    }

    fn render(table: &Table, w: u16, h: u16) -> Buffer {
        table.set_rect(Rect::new(0, 0, w, h));
        let mut buf = Buffer::new(w, h);
        table.draw(&mut buf);
        buf
    }

    fn press(table: &Table, code: KeyCode) {
        table.handle_key(KeyEvent::new(code), &mut |_| {});
    }

    #[test]
    fn unset_cells_are_fresh_defaults() {
        let table = table_with(1, 1);
        assert_eq!(table.cell(5, 5).text, "");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn sparse_cells_extend_the_grid() {
        let table = Table::new();
        table.set_cell_text(2, 3, "x");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.cell(2, 3).text, "x");
        assert_eq!(table.cell(0, 0), TableCell::default());
    }

    #[test]
    fn draws_rows_and_columns_with_separator() {
        let table = table_with(2, 2);
        table.set_separator('|');
        let buf = render(&table, 8, 2);
        assert_eq!(buf.row_text(0), "00|01   ");
        assert_eq!(buf.row_text(1), "10|11   ");
        assert_eq!(table.cell(1, 1).last_position(), Some((3, 1, 2)));
    }

    #[test]
    fn borders_take_two_lines_per_row() {
        let table = table_with(2, 2);
        table.set_borders(true);
        table.set_border_glyphs(BorderGlyphs::ASCII);
        let buf = render(&table, 8, 5);
        let g = BorderGlyphs::ASCII;
        let top: String = [g.top_left, g.horizontal, g.horizontal, g.top_t]
            .into_iter()
            .chain([g.horizontal, g.horizontal, g.top_right])
            .collect();
        assert_eq!(&buf.row_text(0)[..7], top);
        let v = g.vertical;
        assert_eq!(&buf.row_text(1)[..7], format!("{v}00{v}01{v}"));
        assert_eq!(buf.get(0, 2).map(|c| c.ch), Some(g.left_t));
        assert_eq!(buf.get(3, 2).map(|c| c.ch), Some(g.cross));
        assert_eq!(buf.get(0, 4).map(|c| c.ch), Some(g.bottom_left));
        assert_eq!(buf.get(6, 4).map(|c| c.ch), Some(g.bottom_right));
    }

    #[test]
    fn cells_are_aligned_and_truncated() {
        let table = Table::new();
        table.set_scroll_bar_visibility(ScrollBarVisibility::Never);
        table.set_cell(0, 0, TableCell::new("abcdef").max_width(4));
        table.set_cell(1, 0, TableCell::new("ab").align(Alignment::Right));
        let buf = render(&table, 5, 2);
        let row0: Vec<char> = buf.row_text(0).chars().collect();
        assert_eq!(row0[..3], ['a', 'b', 'c']);
        assert_eq!(row0[3], table.read_ellipsis());
        assert_eq!(buf.row_text(1), "  ab ");
    }

    #[test]
    fn selection_skips_unselectable_cells() {
        let table = table_with(5, 3);
        table.set_fixed(2, 0);
        table.set_selectable(true, true);
        table.set_cell(2, 0, TableCell::new("no").selectable(false));
        table.select(2, 0);
        render(&table, 20, 5);
        assert_eq!(table.selection(), Some((2, 1)));
    }

    #[test]
    fn selection_is_cleared_when_nothing_can_be_selected() {
        let table = Table::new();
        table.set_cell(0, 0, TableCell::new("a").selectable(false));
        table.set_selectable(true, false);
        render(&table, 5, 2);
        assert_eq!(table.layout().selected, None);
    }

    #[test]
    fn selected_row_is_reversed() {
        let table = table_with(3, 2);
        table.set_selectable(true, false);
        table.select(1, 0);
        let buf = render(&table, 6, 3);
        let attrs = |x, y| buf.get(x, y).map(|c| c.style.attrs);
        assert!(attrs(0, 1).is_some_and(|a| a.contains(StyleFlags::REVERSE)));
        assert!(attrs(3, 1).is_some_and(|a| a.contains(StyleFlags::REVERSE)));
        assert!(attrs(0, 0).is_some_and(|a| !a.contains(StyleFlags::REVERSE)));
    }

    #[test]
    fn arrow_keys_move_the_selection() {
        let table = table_with(4, 3);
        table.set_selectable(true, true);
        table.set_cell(1, 1, TableCell::new("x").selectable(false));
        table.select(0, 1);
        press(&table, KeyCode::Down);
        assert_eq!(table.selection(), Some((2, 1)));
        press(&table, KeyCode::Char('k'));
        assert_eq!(table.selection(), Some((0, 1)));
        press(&table, KeyCode::Right);
        assert_eq!(table.selection(), Some((0, 2)));
        press(&table, KeyCode::Right);
        assert_eq!(table.selection(), Some((0, 2)));
        press(&table, KeyCode::Char('G'));
        assert_eq!(table.selection(), Some((3, 2)));
        press(&table, KeyCode::Home);
        assert_eq!(table.selection(), Some((0, 0)));
    }

    #[test]
    fn page_keys_move_by_visible_rows() {
        let table = table_with(20, 1);
        table.set_selectable(true, false);
        render(&table, 4, 5);
        press(&table, KeyCode::PageDown);
        assert_eq!(table.selection(), Some((5, 0)));
        press(&table, KeyCode::PageUp);
        assert_eq!(table.selection(), Some((0, 0)));
    }

    #[test]
    fn keys_scroll_without_selection() {
        let table = table_with(20, 1);
        render(&table, 4, 5);
        press(&table, KeyCode::Down);
        press(&table, KeyCode::Char('j'));
        render(&table, 4, 5);
        assert_eq!(table.offset().0, 2);
        press(&table, KeyCode::End);
        let buf = render(&table, 4, 5);
        assert_eq!(table.offset().0, 15);
        assert_eq!(buf.row_text(4), "190 ");
        press(&table, KeyCode::Char('g'));
        render(&table, 4, 5);
        assert_eq!(table.offset(), (0, 0));
    }

    #[test]
    fn track_end_follows_new_rows() {
        let table = table_with(10, 1);
        table.scroll_to_end();
        render(&table, 4, 3);
        assert_eq!(table.offset().0, 7);
        table.set_cell_text(10, 0, "new");
        let buf = render(&table, 4, 3);
        assert_eq!(table.offset().0, 8);
        assert_eq!(buf.row_text(2), "new ");
    }

    #[test]
    fn fixed_rows_stay_on_top() {
        let table = table_with(10, 1);
        table.set_fixed(1, 0);
        table.set_offset(5, 0);
        let buf = render(&table, 3, 3);
        assert_eq!(buf.row_text(0), "00 ");
        assert_eq!(buf.row_text(1), "60 ");
    }

    #[test]
    fn callbacks_fire() {
        let table = table_with(3, 1);
        table.set_selectable(true, false);
        let log = Arc::new(Mutex::new(Vec::new()));
        let changed = log.clone();
        table.set_selection_changed_fn(move |r, c| {
            changed.lock().unwrap().push(format!("changed {r},{c}"));
        });
        let selected = log.clone();
        table.set_selected_fn(move |r, c| {
            selected.lock().unwrap().push(format!("selected {r},{c}"));
        });
        let done = log.clone();
        table.set_done_fn(move |key| done.lock().unwrap().push(format!("done {key:?}")));

        press(&table, KeyCode::Down);
        press(&table, KeyCode::Enter);
        press(&table, KeyCode::Escape);
        assert_eq!(
            *log.lock().unwrap(),
            ["changed 1,0", "selected 1,0", "done Escape"]
        );
    }

    #[test]
    fn enter_with_nothing_selectable_selects_nothing() {
        let table = table_with(2, 2);
        for r in 0..2 {
            for c in 0..2 {
                table.set_cell(r, c, TableCell::new("x").selectable(false));
            }
        }
        table.set_selectable(true, true);
        let log = Arc::new(Mutex::new(Vec::new()));
        let selected = log.clone();
        table.set_selected_fn(move |r, c| selected.lock().unwrap().push((r, c)));
        render(&table, 6, 2);
        assert_eq!(table.layout().selected, None);
        press(&table, KeyCode::Enter);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn enter_reports_the_solved_selection() {
        let table = table_with(2, 2);
        table.set_cell(0, 0, TableCell::new("x").selectable(false));
        table.set_selectable(true, true);
        let log = Arc::new(Mutex::new(Vec::new()));
        let selected = log.clone();
        table.set_selected_fn(move |r, c| selected.lock().unwrap().push((r, c)));
        press(&table, KeyCode::Enter);
        assert_eq!(*log.lock().unwrap(), [(0, 1)]);
    }

    #[test]
    fn enter_without_selection_is_done() {
        let table = table_with(1, 1);
        let log = Arc::new(Mutex::new(Vec::new()));
        let done = log.clone();
        table.set_done_fn(move |key| done.lock().unwrap().push(key));
        press(&table, KeyCode::Enter);
        assert_eq!(*log.lock().unwrap(), [KeyCode::Enter]);
    }

    #[test]
    fn click_selects_the_cell_under_the_pointer() {
        let table = table_with(3, 3);
        table.set_selectable(true, true);
        render(&table, 12, 3);
        assert_eq!(table.cell_at(4, 2), Some((2, 1)));
        assert_eq!(table.cell_at(2, 2), None);

        let mut focus = Vec::new();
        let click = MouseEvent::new(MouseEventKind::Up(MouseButton::Left), 4, 2);
        let (consumed, _) =
            table.handle_mouse(MouseAction::LeftClick, click, &mut |p| focus.push(p));
        assert!(consumed);
        assert_eq!(focus.len(), 1);
        assert_eq!(table.selection(), Some((2, 1)));
    }

    #[test]
    fn wheel_scrolls() {
        let table = table_with(10, 1);
        render(&table, 3, 3);
        let wheel = MouseEvent::new(MouseEventKind::ScrollDown, 0, 0);
        table.handle_mouse(MouseAction::ScrollDown, wheel, &mut |_| {});
        table.handle_mouse(MouseAction::ScrollDown, wheel, &mut |_| {});
        render(&table, 3, 3);
        assert_eq!(table.offset().0, 2);
        let wheel = MouseEvent::new(MouseEventKind::ScrollUp, 0, 0);
        table.handle_mouse(MouseAction::ScrollUp, wheel, &mut |_| {});
        render(&table, 3, 3);
        assert_eq!(table.offset().0, 1);
    }

    #[test]
    fn insert_and_remove_rows_and_columns() {
        let table = table_with(2, 2);
        table.insert_row(1);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(2, 0).text, "10");
        table.remove_row(1);
        assert_eq!(table.cell(1, 0).text, "10");

        table.insert_column(0);
        assert_eq!(table.cell(0, 1).text, "00");
        assert_eq!(table.column_count(), 3);
        table.remove_column(0);
        assert_eq!(table.cell(0, 0).text, "00");

        table.clear();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn expansion_shares_leftover_width() {
        let table = Table::new();
        table.set_scroll_bar_visibility(ScrollBarVisibility::Never);
        table.set_cell(0, 0, TableCell::new("a").expansion(1));
        table.set_cell(0, 1, TableCell::new("b").expansion(1));
        render(&table, 10, 1);
        let widths: Vec<u16> = table.layout().columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, [4, 4]);
    }

    #[test]
    fn scrollbar_takes_the_last_column() {
        let table = table_with(10, 1);
        table.set_scroll_bar_visibility(ScrollBarVisibility::Auto);
        let buf = render(&table, 4, 3);
        let glyphs = Theme::current().scroll_bar_glyphs;
        assert_eq!(buf.get(3, 0).map(|c| c.ch), Some(glyphs.handle));
        assert_eq!(buf.get(3, 1).map(|c| c.ch), Some(glyphs.area));
    }

    #[test]
    fn first_selectable_scans_in_reading_order() {
        let table = table_with(2, 2);
        table.set_cell(0, 1, TableCell::new("x").selectable(false));
        assert_eq!(first_selectable(&table, 0, 1), Some((1, 0)));
    }

    impl Table {
        fn read_ellipsis(&self) -> char {
            read(&self.state).ellipsis
        }
    }
}
