#![forbid(unsafe_code)]

//! The minimal backend surface widgets draw through.

use crate::cell::CellStyle;

/// A writable character-cell grid.
///
/// This is the only capability widgets need from a terminal backend.
/// Writes outside the grid are ignored; reads outside it return `None`.
pub trait CellGrid {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    /// Write a leading rune, its combining runes and a style at `(x, y)`.
    fn set_content(&mut self, x: u16, y: u16, main: char, combining: &[char], style: CellStyle);

    /// Read back the leading rune and style at `(x, y)`.
    ///
    /// The printer uses this to blend text with a background painted by an
    /// earlier draw pass.
    fn content(&self, x: u16, y: u16) -> Option<(char, CellStyle)>;

    /// Paint every cell of `rect` with `ch` in `style`, clipped to the grid.
    fn fill(&mut self, rect: weft_core::geometry::Rect, ch: char, style: CellStyle) {
        let (w, h) = self.size();
        let clipped = rect.intersection(&weft_core::geometry::Rect::from_size(w, h));
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set_content(x, y, ch, &[], style);
            }
        }
    }
}
