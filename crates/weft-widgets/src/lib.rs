#![forbid(unsafe_code)]

//! Widgets for weft.
//!
//! Every widget implements [`Primitive`]: it has a rectangle, draws itself
//! into a [`CellGrid`], takes part in focus, and reacts to key and mouse
//! input. Widgets are shared as [`PrimitiveRef`]s so containers and the
//! [`Dispatcher`] can hold on to them while the application keeps its own
//! handle for configuration.
//!
//! All widget methods take `&self`. State sits behind per-widget locks, so
//! a widget can be configured from one thread while another draws it.

pub mod block;
pub mod flex;
pub mod focus;
pub mod scrollbar;
pub mod table;
pub mod text_view;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use block::{Block, KeyCapture, MouseCapture};
pub use flex::{Flex, FlexItem};
pub use focus::Dispatcher;
pub use table::{Table, TableCell};
pub use text_view::TextView;

use weft_core::event::{KeyEvent, MouseAction, MouseEvent};
use weft_core::geometry::Rect;
use weft_render::CellGrid;

/// A shared handle to any widget.
pub type PrimitiveRef = Arc<dyn Primitive>;

/// The interface every widget implements.
///
/// Implementors provide [`block`](Primitive::block) and
/// [`draw`](Primitive::draw); geometry, visibility and leaf focus default
/// to the embedded [`Block`]. Containers override the focus methods to
/// delegate to a child.
///
/// Event handlers receive a `set_focus` callback. Calling it asks the
/// dispatcher to move focus once the handler returns.
pub trait Primitive: Send + Sync {
    /// The base state shared by all widgets.
    fn block(&self) -> &Block;

    /// Paint the widget into `grid` within its rectangle.
    fn draw(&self, grid: &mut dyn CellGrid);

    fn rect(&self) -> Rect {
        self.block().rect()
    }

    fn set_rect(&self, rect: Rect) {
        self.block().set_rect(rect);
    }

    /// The area left for content after border and padding.
    fn inner_rect(&self) -> Rect {
        self.block().inner_rect()
    }

    fn is_visible(&self) -> bool {
        self.block().is_visible()
    }

    fn set_visible(&self, visible: bool) {
        self.block().set_visible(visible);
    }

    /// Take focus, or pass it on by calling `delegate` with another widget.
    fn focus(&self, delegate: &mut dyn FnMut(PrimitiveRef)) {
        let _ = delegate;
        self.block().set_focused(true);
    }

    fn blur(&self) {
        self.block().set_focused(false);
    }

    fn has_focus(&self) -> bool {
        self.block().is_focused()
    }

    /// Widget-specific key handling, after the input capture hook.
    fn key_event(&self, event: KeyEvent, set_focus: &mut dyn FnMut(PrimitiveRef)) {
        let _ = (event, set_focus);
    }

    /// Widget-specific mouse handling, after the mouse capture hook.
    ///
    /// Returns whether the event was consumed and, optionally, a widget
    /// that should receive all mouse events until it releases them.
    /// By default a left press inside the widget focuses it.
    fn mouse_event(
        &self,
        action: MouseAction,
        event: MouseEvent,
        set_focus: &mut dyn FnMut(PrimitiveRef),
    ) -> (bool, Option<PrimitiveRef>) {
        self.block().focus_on_click(action, event, set_focus)
    }

    /// Entry point for key events: the input capture hook runs first and
    /// may rewrite or swallow the event.
    fn handle_key(&self, event: KeyEvent, set_focus: &mut dyn FnMut(PrimitiveRef)) {
        if let Some(event) = self.block().capture_key(event) {
            self.key_event(event, set_focus);
        }
    }

    /// Entry point for mouse events: the mouse capture hook runs first.
    /// A swallowed event counts as consumed.
    fn handle_mouse(
        &self,
        action: MouseAction,
        event: MouseEvent,
        set_focus: &mut dyn FnMut(PrimitiveRef),
    ) -> (bool, Option<PrimitiveRef>) {
        match self.block().capture_mouse(action, event) {
            Some((action, event)) => self.mouse_event(action, event, set_focus),
            None => (true, None),
        }
    }
}

/// Read a widget lock, recovering the data if a writer panicked.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write a widget lock, recovering the data if a writer panicked.
pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
