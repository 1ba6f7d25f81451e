#![forbid(unsafe_code)]

//! In-memory cell grid.

use weft_core::geometry::Rect;

use crate::cell::{Cell, CellStyle};
use crate::grid::CellGrid;

/// A row-major grid of [`Cell`]s.
///
/// Index math is `y * width + x`. Out-of-bounds writes are dropped so that
/// widgets may draw partially off-screen without checking every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// A blank buffer.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// The cell at `(x, y)`.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable cell at `(x, y)`.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Replace the cell at `(x, y)`.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Reset every cell to a blank default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Row `y` as a string of leading runes plus combining runes.
    ///
    /// Mostly useful in tests and snapshots.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(Cell::symbol)
            .collect()
    }

    /// Every row joined by `'\n'`.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl CellGrid for Buffer {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn set_content(&mut self, x: u16, y: u16, main: char, combining: &[char], style: CellStyle) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.ch = main;
            cell.combining.clear();
            cell.combining.extend_from_slice(combining);
            cell.style = style;
        }
    }

    fn content(&self, x: u16, y: u16) -> Option<(char, CellStyle)> {
        self.get(x, y).map(|cell| (cell.ch, cell.style))
    }
}
