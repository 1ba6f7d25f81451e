#![forbid(unsafe_code)]

//! Vertical scrollbar drawn along the right edge of scrollable widgets.

use weft_core::geometry::Rect;
use weft_layout::{ScrollBarVisibility, scrollbar_thumb};
use weft_render::{CellGrid, CellStyle};
use weft_style::{ScrollBarGlyphs, Theme};

/// A one-column scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBar {
    visibility: ScrollBarVisibility,
    glyphs: ScrollBarGlyphs,
    style: CellStyle,
    focused: bool,
}

impl Default for ScrollBar {
    fn default() -> Self {
        let theme = Theme::current();
        Self {
            visibility: ScrollBarVisibility::default(),
            glyphs: theme.scroll_bar_glyphs,
            style: CellStyle::default().fg(theme.scroll_bar),
            focused: false,
        }
    }
}

impl ScrollBar {
    pub fn new(visibility: ScrollBarVisibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn glyphs(mut self, glyphs: ScrollBarGlyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[must_use]
    pub fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    /// Draw with the focused glyphs.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Whether the bar takes a column for `items` rows in `height` rows.
    pub fn is_shown(&self, items: usize, height: u16) -> bool {
        self.visibility.is_shown(items, usize::from(height))
    }

    /// Draw the bar in the first column of `area`. `cursor` is the
    /// position within `items` the handle should reflect.
    pub fn draw(&self, grid: &mut dyn CellGrid, area: Rect, items: usize, cursor: usize) {
        if area.is_empty() || !self.is_shown(items, area.height) {
            return;
        }
        let thumb = scrollbar_thumb(usize::from(area.height), items, cursor);
        let (area_glyph, handle_glyph) = if self.focused {
            (self.glyphs.area_focused, self.glyphs.handle_focused)
        } else {
            (self.glyphs.area, self.glyphs.handle)
        };
        for row in 0..area.height {
            let glyph = if usize::from(row) == thumb {
                handle_glyph
            } else {
                area_glyph
            };
            grid.set_content(area.x, area.y + row, glyph, &[], self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_render::Buffer;

    fn column(buf: &Buffer, x: u16) -> String {
        (0..buf.height())
            .filter_map(|y| buf.get(x, y))
            .map(|c| c.ch)
            .collect()
    }

    fn glyphs() -> ScrollBarGlyphs {
        ScrollBarGlyphs {
            area: '.',
            area_focused: ':',
            handle: '#',
            handle_focused: '@',
        }
    }

    #[test]
    fn auto_hides_when_content_fits() {
        let bar = ScrollBar::new(ScrollBarVisibility::Auto).glyphs(glyphs());
        let mut buf = Buffer::new(1, 4);
        bar.draw(&mut buf, Rect::new(0, 0, 1, 4), 4, 0);
        assert_eq!(column(&buf, 0), "    ");
        assert!(!bar.is_shown(4, 4));
        assert!(bar.is_shown(5, 4));
    }

    #[test]
    fn always_draws_with_handle_at_top_when_content_fits() {
        let bar = ScrollBar::new(ScrollBarVisibility::Always).glyphs(glyphs());
        let mut buf = Buffer::new(1, 3);
        bar.draw(&mut buf, Rect::new(0, 0, 1, 3), 2, 1);
        assert_eq!(column(&buf, 0), "#..");
    }

    #[test]
    fn handle_follows_cursor() {
        let bar = ScrollBar::new(ScrollBarVisibility::Auto).glyphs(glyphs());
        let mut buf = Buffer::new(2, 5);
        let area = Rect::new(1, 0, 1, 5);
        bar.draw(&mut buf, area, 100, 0);
        assert_eq!(column(&buf, 1), "#....");
        bar.draw(&mut buf, area, 100, 99);
        assert_eq!(column(&buf, 1), "....#");
        bar.draw(&mut buf, area, 100, 50);
        assert_eq!(column(&buf, 1), "..#..");
    }

    #[test]
    fn focused_glyphs() {
        let bar = ScrollBar::new(ScrollBarVisibility::Always)
            .glyphs(glyphs())
            .focused(true);
        let mut buf = Buffer::new(1, 2);
        bar.draw(&mut buf, Rect::new(0, 0, 1, 2), 10, 9);
        assert_eq!(column(&buf, 0), ":@");
    }

    #[test]
    fn never_draws_nothing() {
        let bar = ScrollBar::new(ScrollBarVisibility::Never).glyphs(glyphs());
        let mut buf = Buffer::new(1, 2);
        bar.draw(&mut buf, Rect::new(0, 0, 1, 2), 10, 0);
        assert_eq!(column(&buf, 0), "  ");
    }
}
