#![forbid(unsafe_code)]

//! A scrollable view of tagged text.
//!
//! Text can be replaced, appended, or streamed in through
//! [`std::io::Write`]. Style tags are honored unless dynamic colors are
//! turned off; region tags mark spans that can be highlighted by id.
//!
//! With wrapping on, lines are word-wrapped to the view width. Without
//! it, long lines are cut and the view scrolls horizontally.

use std::io;
use std::sync::{Arc, RwLock, Weak};

use weft_core::event::{KeyCode, KeyEvent, MouseAction, MouseEvent};
use weft_core::geometry::Rect;
use weft_layout::{Alignment, ScrollBarVisibility, ScrollWindow};
use weft_render::CellGrid;
use weft_style::Theme;
use weft_text::{
    Decomposed, PrintOptions, TagOptions, WrappedLine, clusters, decompose, print, strip_tags,
    wrap_decomposed,
};

use crate::block::{Block, text_style};
use crate::scrollbar::ScrollBar;
use crate::{Primitive, PrimitiveRef, read, write};

/// Called after the text changed.
pub type ChangedFn = Arc<dyn Fn() + Send + Sync>;
/// Called with the key that ended interaction with the view.
pub type DoneFn = Arc<dyn Fn(KeyCode) + Send + Sync>;

struct TextViewState {
    text: String,
    /// Bytes written through `io::Write` that do not form a whole
    /// character yet.
    pending: Vec<u8>,
    dynamic_colors: bool,
    regions: bool,
    wrap: bool,
    align: Alignment,
    text_color: weft_render::PackedRgba,
    highlighted: Vec<String>,
    window: ScrollWindow,
    scroll_bar: ScrollBarVisibility,
    /// Lines and height of the last draw, for paging.
    line_count: usize,
    page_height: usize,
    on_changed: Option<ChangedFn>,
    on_done: Option<DoneFn>,
}

impl TextViewState {
    fn tag_options(&self) -> TagOptions {
        TagOptions {
            colors: self.dynamic_colors,
            regions: self.regions,
        }
    }
}

/// What a draw needs, copied out so printing runs without the lock.
struct DrawSnapshot {
    text: String,
    tags: TagOptions,
    wrap: bool,
    align: Alignment,
    text_color: weft_render::PackedRgba,
    scroll_bar: ScrollBarVisibility,
    highlighted: Vec<String>,
}

/// Lines of `text` at `width`, or split at newlines only.
fn lines(text: &Decomposed<'_>, wrap: bool, width: u16) -> Vec<WrappedLine> {
    if wrap {
        wrap_decomposed(text, usize::from(width))
    } else {
        wrap_decomposed(text, usize::MAX)
    }
}

/// Multi-line text display.
pub struct TextView {
    block: Block,
    state: RwLock<TextViewState>,
}

impl TextView {
    pub fn new() -> Arc<Self> {
        let theme = Theme::current();
        Arc::new_cyclic(|me: &Weak<Self>| {
            let view = Self {
                block: Block::default(),
                state: RwLock::new(TextViewState {
                    text: String::new(),
                    pending: Vec::new(),
                    dynamic_colors: true,
                    regions: false,
                    wrap: true,
                    align: Alignment::Left,
                    text_color: theme.primary_text,
                    highlighted: Vec::new(),
                    window: ScrollWindow::default(),
                    scroll_bar: ScrollBarVisibility::Auto,
                    line_count: 0,
                    page_height: 0,
                    on_changed: None,
                    on_done: None,
                }),
            };
            let owner: Weak<dyn Primitive> = me.clone();
            view.block.bind(owner);
            view
        })
    }

    /// Replace the text and scroll back to the top, unless the view is
    /// following the end.
    pub fn set_text(&self, text: impl Into<String>) {
        let changed = {
            let mut s = write(&self.state);
            s.text = text.into();
            s.pending.clear();
            if !s.window.track_end {
                s.window.row_offset = 0;
                s.window.column_offset = 0;
            }
            s.on_changed.clone()
        };
        if let Some(f) = changed {
            f();
        }
    }

    pub fn append(&self, text: &str) {
        let changed = {
            let mut s = write(&self.state);
            s.text.push_str(text);
            s.on_changed.clone()
        };
        if let Some(f) = changed {
            f();
        }
    }

    pub fn clear(&self) {
        self.set_text(String::new());
    }

    /// The text as set, tags included.
    pub fn text(&self) -> String {
        read(&self.state).text.clone()
    }

    /// The text without any tags.
    pub fn stripped_text(&self) -> String {
        strip_tags(&read(&self.state).text)
    }

    /// Honor `[fg:bg:attrs]` tags. When off they are printed as is.
    pub fn set_dynamic_colors(&self, enabled: bool) {
        write(&self.state).dynamic_colors = enabled;
    }

    /// Honor `["id"]` region tags.
    pub fn set_regions(&self, enabled: bool) {
        write(&self.state).regions = enabled;
    }

    pub fn set_wrap(&self, wrap: bool) {
        write(&self.state).wrap = wrap;
    }

    pub fn set_text_align(&self, align: Alignment) {
        write(&self.state).align = align;
    }

    pub fn set_text_color(&self, color: weft_render::PackedRgba) {
        write(&self.state).text_color = color;
    }

    /// Highlight exactly the regions with the given ids.
    pub fn highlight<I, S>(&self, regions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        write(&self.state).highlighted = regions.into_iter().map(Into::into).collect();
    }

    pub fn clear_highlights(&self) {
        write(&self.state).highlighted.clear();
    }

    pub fn highlighted_regions(&self) -> Vec<String> {
        read(&self.state).highlighted.clone()
    }

    pub fn offset(&self) -> (usize, usize) {
        let s = read(&self.state);
        (s.window.row_offset, s.window.column_offset)
    }

    pub fn scroll_to(&self, row: usize, column: usize) {
        let mut s = write(&self.state);
        s.window.track_end = false;
        s.window.row_offset = row;
        s.window.column_offset = column;
    }

    pub fn scroll_to_beginning(&self) {
        write(&self.state).window.scroll_to_beginning();
    }

    /// Show the last lines and keep following the end as text is added.
    pub fn scroll_to_end(&self) {
        write(&self.state).window.scroll_to_end();
    }

    pub fn set_scroll_bar_visibility(&self, visibility: ScrollBarVisibility) {
        write(&self.state).scroll_bar = visibility;
    }

    pub fn set_changed_fn(&self, f: impl Fn() + Send + Sync + 'static) {
        write(&self.state).on_changed = Some(Arc::new(f));
    }

    /// Called with Escape, Enter, Tab or Backtab.
    pub fn set_done_fn(&self, f: impl Fn(KeyCode) + Send + Sync + 'static) {
        write(&self.state).on_done = Some(Arc::new(f));
    }

    /// Lines at the last draw.
    pub fn line_count(&self) -> usize {
        read(&self.state).line_count
    }
}

impl io::Write for &TextView {
    /// Append UTF-8 bytes. Characters split across writes are joined;
    /// invalid bytes become U+FFFD.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let changed = {
            let mut s = write(&self.state);
            s.pending.extend_from_slice(buf);
            let complete = match std::str::from_utf8(&s.pending) {
                Ok(_) => s.pending.len(),
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(_) => s.pending.len(),
            };
            let bytes: Vec<u8> = s.pending.drain(..complete).collect();
            s.text.push_str(&String::from_utf8_lossy(&bytes));
            s.on_changed.clone()
        };
        if let Some(f) = changed {
            f();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Primitive for TextView {
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
            widget = "TextView",
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

        let snapshot = {
            let s = read(&self.state);
            DrawSnapshot {
                text: s.text.clone(),
                tags: s.tag_options(),
                wrap: s.wrap,
                align: s.align,
                text_color: s.text_color,
                scroll_bar: s.scroll_bar,
                highlighted: s.highlighted.clone(),
            }
        };
        let text = snapshot.text.as_str();
        let decomposed = decompose(text, snapshot.tags);

        let bar = ScrollBar::new(snapshot.scroll_bar).focused(focused);
        let mut width = inner.width;
        let mut wrapped = lines(&decomposed, snapshot.wrap, width);
        let show_bar = width > 1 && bar.is_shown(wrapped.len(), inner.height);
        if show_bar {
            width -= 1;
            if snapshot.wrap {
                wrapped = lines(&decomposed, true, width);
            }
        }

        let height = usize::from(inner.height);
        let (row_offset, column_offset) = {
            let mut s = write(&self.state);
            s.window.clamp_rows(wrapped.len(), height);
            if !snapshot.wrap {
                let widest = wrapped.iter().map(|l| l.width).max().unwrap_or(0);
                s.window.clamp_columns(widest, usize::from(width));
            } else {
                s.window.column_offset = 0;
            }
            s.line_count = wrapped.len();
            s.page_height = height;
            (s.window.row_offset, s.window.column_offset)
        };

        let style = text_style(snapshot.text_color, background);
        for (i, line) in wrapped.iter().skip(row_offset).take(height).enumerate() {
            let (start, state) = if column_offset > 0 {
                let skip = clusters(&decomposed.stripped()[line.stripped.clone()])
                    .scan(0, |seen, cluster| {
                        *seen += cluster.width;
                        Some((cluster.end(), *seen))
                    })
                    .find(|&(_, seen)| seen >= column_offset)
                    .map_or(line.stripped.end, |(end, _)| line.stripped.start + end);
                (decomposed.source_offset(skip), decomposed.state_at(skip))
            } else {
                (line.source.start, line.state.clone())
            };
            let options = PrintOptions::new(inner.x, inner.y + i as u16, width)
                .align(snapshot.align)
                .style(style)
                .tags(snapshot.tags)
                .state(state)
                .highlighted(&snapshot.highlighted);
            print(grid, &text[start.min(line.source.end)..line.source.end], &options);
        }

        if show_bar {
            let max = wrapped.len().saturating_sub(height);
            let cursor = if max == 0 {
                0
            } else {
                (wrapped.len() - 1) * row_offset / max
            };
            let area = Rect::new(inner.right() - 1, inner.y, 1, inner.height);
            bar.draw(grid, area, wrapped.len(), cursor);
        }
    }

    fn key_event(&self, event: KeyEvent, _set_focus: &mut dyn FnMut(PrimitiveRef)) {
        let done = {
            let mut s = write(&self.state);
            let page = s.page_height.max(1) as isize;
            match event.code {
                KeyCode::Escape | KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab => {
                    s.on_done.clone()
                }
                code => {
                    match code {
                        KeyCode::Home | KeyCode::Char('g') => s.window.scroll_to_beginning(),
                        KeyCode::End | KeyCode::Char('G') => s.window.scroll_to_end(),
                        KeyCode::Up | KeyCode::Char('k') => s.window.scroll_rows(-1),
                        KeyCode::Down | KeyCode::Char('j') => s.window.scroll_rows(1),
                        KeyCode::Left | KeyCode::Char('h') => s.window.scroll_columns(-1),
                        KeyCode::Right | KeyCode::Char('l') => s.window.scroll_columns(1),
                        KeyCode::PageDown => s.window.scroll_rows(page),
                        KeyCode::PageUp => s.window.scroll_rows(-page),
                        KeyCode::Char('f') if event.ctrl() => s.window.scroll_rows(page),
                        KeyCode::Char('b') if event.ctrl() => s.window.scroll_rows(-page),
                        _ => {}
                    }
                    None
                }
            }
        };
        if let Some(f) = done {
            f(event.code);
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
            MouseAction::LeftDown | MouseAction::LeftClick => {
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
            _ => (false, None),
        }
    }
}
