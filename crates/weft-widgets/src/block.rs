#![forbid(unsafe_code)]

//! The base state every widget embeds: rectangle, border, padding, title,
//! background, visibility, focus, and input capture hooks.
//!
//! A [`Block`] is also a widget on its own. It draws a filled rectangle
//! with an optional border and title, which makes it useful as a spacer or
//! a frame around content drawn elsewhere.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use weft_core::event::{KeyEvent, MouseAction, MouseEvent};
use weft_core::geometry::{Rect, Sides};
use weft_layout::{Alignment, inner_rect};
use weft_render::{CellGrid, CellStyle, PackedRgba, StyleFlags};
use weft_style::{BorderGlyphs, Theme};
use weft_text::{PrintOptions, print};

use crate::{Primitive, PrimitiveRef, read, write};

/// Hook run before a widget's own key handling. Returning `None` swallows
/// the event; returning an event (possibly a different one) passes it on.
pub type KeyCapture = Arc<dyn Fn(KeyEvent) -> Option<KeyEvent> + Send + Sync>;

/// Hook run before a widget's own mouse handling, with the same contract
/// as [`KeyCapture`].
pub type MouseCapture =
    Arc<dyn Fn(MouseAction, MouseEvent) -> Option<(MouseAction, MouseEvent)> + Send + Sync>;

#[derive(Clone)]
struct BlockState {
    rect: Rect,
    /// Recomputed whenever rect, border or padding change.
    inner: Rect,
    padding: Sides,
    border: bool,
    border_style: CellStyle,
    borders: BorderGlyphs,
    focused_borders: BorderGlyphs,
    title: String,
    title_align: Alignment,
    title_style: CellStyle,
    background: PackedRgba,
    ellipsis: char,
    visible: bool,
    focused: bool,
    input_capture: Option<KeyCapture>,
    mouse_capture: Option<MouseCapture>,
    owner: Option<Weak<dyn Primitive>>,
}

impl BlockState {
    fn relayout(&mut self) {
        self.inner = inner_rect(self.rect, self.border, self.padding);
    }
}

/// Base widget state.
///
/// Colors and glyphs are taken from [`Theme::current`] when the block is
/// created and can be overridden per instance afterwards.
pub struct Block {
    state: RwLock<BlockState>,
}

impl Default for Block {
    /// An unbound block for embedding in another widget.
    fn default() -> Self {
        let theme = Theme::current();
        Self {
            state: RwLock::new(BlockState {
                rect: Rect::default(),
                inner: Rect::default(),
                padding: Sides::default(),
                border: false,
                border_style: CellStyle::default().fg(theme.border),
                borders: theme.borders,
                focused_borders: theme.focused_borders,
                title: String::new(),
                title_align: Alignment::Center,
                title_style: CellStyle::default().fg(theme.title),
                background: theme.primitive_background,
                ellipsis: theme.ellipsis,
                visible: true,
                focused: false,
                input_capture: None,
                mouse_capture: None,
                owner: None,
            }),
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = read(&self.state);
        f.debug_struct("Block")
            .field("rect", &s.rect)
            .field("inner", &s.inner)
            .field("border", &s.border)
            .field("title", &s.title)
            .field("visible", &s.visible)
            .field("focused", &s.focused)
            .finish_non_exhaustive()
    }
}

impl Block {
    /// A standalone block, ready to be added to a container.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let block = Self::default();
            let owner: Weak<dyn Primitive> = me.clone();
            block.bind(owner);
            block
        })
    }

    /// Set the widget this block belongs to. The block hands it to
    /// `set_focus` when clicked.
    pub fn bind(&self, owner: Weak<dyn Primitive>) {
        write(&self.state).owner = Some(owner);
    }

    /// The widget this block belongs to, if it is still alive.
    pub fn owner(&self) -> Option<PrimitiveRef> {
        read(&self.state).owner.as_ref().and_then(Weak::upgrade)
    }

    pub fn rect(&self) -> Rect {
        read(&self.state).rect
    }

    pub fn set_rect(&self, rect: Rect) {
        let mut s = write(&self.state);
        s.rect = rect;
        s.relayout();
    }

    /// The content area inside border and padding.
    pub fn inner_rect(&self) -> Rect {
        read(&self.state).inner
    }

    pub fn has_border(&self) -> bool {
        read(&self.state).border
    }

    pub fn set_border(&self, border: bool) {
        let mut s = write(&self.state);
        s.border = border;
        s.relayout();
    }

    pub fn padding(&self) -> Sides {
        read(&self.state).padding
    }

    pub fn set_padding(&self, padding: impl Into<Sides>) {
        let mut s = write(&self.state);
        s.padding = padding.into();
        s.relayout();
    }

    pub fn set_border_style(&self, style: CellStyle) {
        write(&self.state).border_style = style;
    }

    /// Glyph sets for the unfocused and focused border.
    pub fn set_border_glyphs(&self, normal: BorderGlyphs, focused: BorderGlyphs) {
        let mut s = write(&self.state);
        s.borders = normal;
        s.focused_borders = focused;
    }

    pub fn title(&self) -> String {
        read(&self.state).title.clone()
    }

    /// Title drawn in the top border. It may contain style tags.
    pub fn set_title(&self, title: impl Into<String>) {
        write(&self.state).title = title.into();
    }

    pub fn set_title_align(&self, align: Alignment) {
        write(&self.state).title_align = align;
    }

    pub fn set_title_style(&self, style: CellStyle) {
        write(&self.state).title_style = style;
    }

    pub fn background(&self) -> PackedRgba {
        read(&self.state).background
    }

    pub fn set_background(&self, color: PackedRgba) {
        write(&self.state).background = color;
    }

    /// Glyph written where text is cut off.
    pub fn ellipsis(&self) -> char {
        read(&self.state).ellipsis
    }

    pub fn is_visible(&self) -> bool {
        read(&self.state).visible
    }

    pub fn set_visible(&self, visible: bool) {
        write(&self.state).visible = visible;
    }

    pub fn is_focused(&self) -> bool {
        read(&self.state).focused
    }

    pub fn set_focused(&self, focused: bool) {
        write(&self.state).focused = focused;
    }

    /// Whether `(x, y)` lies within the outer rectangle.
    pub fn in_rect(&self, x: u16, y: u16) -> bool {
        read(&self.state).rect.contains(x, y)
    }

    pub fn set_input_capture(
        &self,
        capture: impl Fn(KeyEvent) -> Option<KeyEvent> + Send + Sync + 'static,
    ) {
        write(&self.state).input_capture = Some(Arc::new(capture));
    }

    pub fn clear_input_capture(&self) {
        write(&self.state).input_capture = None;
    }

    pub fn set_mouse_capture(
        &self,
        capture: impl Fn(MouseAction, MouseEvent) -> Option<(MouseAction, MouseEvent)>
        + Send
        + Sync
        + 'static,
    ) {
        write(&self.state).mouse_capture = Some(Arc::new(capture));
    }

    pub fn clear_mouse_capture(&self) {
        write(&self.state).mouse_capture = None;
    }

    /// Run the input capture hook, if any.
    pub fn capture_key(&self, event: KeyEvent) -> Option<KeyEvent> {
        let hook = read(&self.state).input_capture.clone();
        match hook {
            Some(hook) => hook(event),
            None => Some(event),
        }
    }

    /// Run the mouse capture hook, if any.
    pub fn capture_mouse(
        &self,
        action: MouseAction,
        event: MouseEvent,
    ) -> Option<(MouseAction, MouseEvent)> {
        let hook = read(&self.state).mouse_capture.clone();
        match hook {
            Some(hook) => hook(action, event),
            None => Some((action, event)),
        }
    }

    /// Default mouse behavior: a left press inside the rectangle focuses
    /// the owning widget.
    pub fn focus_on_click(
        &self,
        action: MouseAction,
        event: MouseEvent,
        set_focus: &mut dyn FnMut(PrimitiveRef),
    ) -> (bool, Option<PrimitiveRef>) {
        if action != MouseAction::LeftDown
            || !self.is_visible()
            || !self.in_rect(event.x, event.y)
        {
            return (false, None);
        }
        if let Some(owner) = self.owner() {
            set_focus(owner);
        }
        (true, None)
    }

    /// Fill the background and draw border and title. `focused` selects
    /// the border glyphs; containers pass their computed focus.
    pub fn draw_frame(&self, grid: &mut dyn CellGrid, focused: bool) {
        let s = read(&self.state);
        if !s.visible || s.rect.is_empty() {
            return;
        }
        let r = s.rect;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Block",
            x = r.x,
            y = r.y,
            w = r.width,
            h = r.height
        )
        .entered();

        grid.fill(r, ' ', CellStyle::default().bg(s.background));
        if !s.border || r.width < 2 || r.height < 2 {
            return;
        }

        let g = if focused { s.focused_borders } else { s.borders };
        let style = s.border_style.bg(s.background);
        let (right, bottom) = (r.right() - 1, r.bottom() - 1);
        for x in r.x + 1..right {
            grid.set_content(x, r.y, g.horizontal, &[], style);
            grid.set_content(x, bottom, g.horizontal, &[], style);
        }
        for y in r.y + 1..bottom {
            grid.set_content(r.x, y, g.vertical, &[], style);
            grid.set_content(right, y, g.vertical, &[], style);
        }
        grid.set_content(r.x, r.y, g.top_left, &[], style);
        grid.set_content(right, r.y, g.top_right, &[], style);
        grid.set_content(r.x, bottom, g.bottom_left, &[], style);
        grid.set_content(right, bottom, g.bottom_right, &[], style);

        if !s.title.is_empty() && r.width > 2 {
            let options = PrintOptions::new(r.x + 1, r.y, r.width - 2)
                .align(s.title_align)
                .style(s.title_style.bg(s.background))
                .ellipsis(s.ellipsis);
            print(grid, &s.title, &options);
        }
    }
}

impl Primitive for Block {
    fn block(&self) -> &Block {
        self
    }

    fn draw(&self, grid: &mut dyn CellGrid) {
        self.draw_frame(grid, self.is_focused());
    }
}

/// Style for text drawn by a widget: `fg` over the widget's background.
pub(crate) fn text_style(fg: PackedRgba, background: PackedRgba) -> CellStyle {
    CellStyle::new(fg, background, StyleFlags::empty())
}
