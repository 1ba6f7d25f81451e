#![forbid(unsafe_code)]

//! Scroll windows and scrollbar placement.

/// When to draw a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollBarVisibility {
    Never,
    /// Only when the content does not fit.
    #[default]
    Auto,
    Always,
}

impl ScrollBarVisibility {
    /// Whether a bar is drawn for `items` rows in a `height`-row viewport.
    pub const fn is_shown(self, items: usize, height: usize) -> bool {
        match self {
            Self::Never => false,
            Self::Auto => items > height,
            Self::Always => true,
        }
    }
}

/// Row of the scrollbar handle: `floor((height - 1) * cursor / (items - 1))`.
///
/// With everything on screen (`items <= height`) the handle sits at the top.
pub fn scrollbar_thumb(height: usize, items: usize, cursor: usize) -> usize {
    if height == 0 || items <= height || items < 2 {
        return 0;
    }
    let cursor = cursor.min(items - 1);
    (height - 1) * cursor / (items - 1)
}

/// The visible part of scrollable content along with the last layout.
///
/// Offsets stay in `[0, content - visible]`. While `track_end` is set the
/// row offset instead follows the last page as content grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollWindow {
    pub row_offset: usize,
    pub column_offset: usize,
    pub track_end: bool,
    /// Rows shown by the last layout pass.
    pub visible_rows: usize,
    /// Column indices shown by the last layout pass.
    pub visible_columns: Vec<usize>,
    /// Widths matching `visible_columns`.
    pub column_widths: Vec<u16>,
}

impl ScrollWindow {
    /// Clamp the row offset for `content` rows in a `visible`-row viewport.
    pub fn clamp_rows(&mut self, content: usize, visible: usize) {
        let max = content.saturating_sub(visible);
        if self.track_end || self.row_offset > max {
            self.row_offset = max;
        }
        self.visible_rows = visible.min(content.saturating_sub(self.row_offset));
    }

    /// Clamp the column offset for `content` columns in a `visible`-column viewport.
    pub fn clamp_columns(&mut self, content: usize, visible: usize) {
        self.column_offset = self.column_offset.min(content.saturating_sub(visible));
    }

    /// Scroll rows by `delta`. Scrolling up releases `track_end`.
    pub fn scroll_rows(&mut self, delta: isize) {
        if delta < 0 {
            self.track_end = false;
        }
        self.row_offset = self.row_offset.saturating_add_signed(delta);
    }

    /// Scroll columns by `delta`, stopping at zero.
    pub fn scroll_columns(&mut self, delta: isize) {
        self.column_offset = self.column_offset.saturating_add_signed(delta);
    }

    pub fn scroll_to_beginning(&mut self) {
        self.track_end = false;
        self.row_offset = 0;
        self.column_offset = 0;
    }

    /// Pin the last page. The row offset is resolved by the next clamp.
    pub fn scroll_to_end(&mut self) {
        self.track_end = true;
        self.column_offset = 0;
    }
}
