#![forbid(unsafe_code)]

//! A container that lays out its children in a row or a column.
//!
//! Each item has a fixed size or a proportion of what the fixed items
//! leave over. Items can be empty (`None`) to reserve space.
//!
//! Focus goes to the item flagged as a focus attractor, else to the child
//! that was focused last, else to the first child. Hidden children are
//! skipped for focus and mouse events. The container itself only takes
//! focus when it has no visible children.

use std::sync::{Arc, RwLock, Weak};

use weft_core::event::{KeyEvent, MouseAction, MouseEvent};
use weft_core::geometry::Rect;
use weft_layout::{Direction, FlexSize, distribute};
use weft_render::CellGrid;

use crate::block::Block;
use crate::{Primitive, PrimitiveRef, read, write};

/// One slot of a [`Flex`].
#[derive(Clone)]
pub struct FlexItem {
    /// The widget in this slot; `None` leaves the space empty.
    pub item: Option<PrimitiveRef>,
    /// Size along the main axis; 0 makes the item flexible.
    pub fixed_size: u16,
    /// Share of the space left by fixed items.
    pub proportion: u16,
    /// Receive focus when the container is focused.
    pub focus: bool,
}

impl FlexItem {
    fn size(&self) -> FlexSize {
        FlexSize::new(self.fixed_size, self.proportion)
    }

    fn holds(&self, primitive: &PrimitiveRef) -> bool {
        self.item.as_ref().is_some_and(|p| Arc::ptr_eq(p, primitive))
    }

    /// The widget in this slot if it is shown.
    fn visible(&self) -> Option<&PrimitiveRef> {
        self.item.as_ref().filter(|p| p.is_visible())
    }
}

#[derive(Default)]
struct FlexState {
    items: Vec<FlexItem>,
    direction: Direction,
    full_screen: bool,
    /// Index of the child seen holding focus most recently.
    last_focused: Option<usize>,
}

/// Row or column container.
pub struct Flex {
    block: Block,
    state: RwLock<FlexState>,
}

impl Flex {
    /// An empty horizontal container.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let flex = Self {
                block: Block::default(),
                state: RwLock::new(FlexState::default()),
            };
            let owner: Weak<dyn Primitive> = me.clone();
            flex.block.bind(owner);
            flex
        })
    }

    pub fn direction(&self) -> Direction {
        read(&self.state).direction
    }

    pub fn set_direction(&self, direction: Direction) {
        write(&self.state).direction = direction;
    }

    /// Cover the whole grid, ignoring the rectangle set by the parent.
    pub fn set_full_screen(&self, full_screen: bool) {
        write(&self.state).full_screen = full_screen;
    }

    /// Append an item.
    ///
    /// # Panics
    ///
    /// If both `fixed_size` and `proportion` are 0.
    pub fn add_item(
        &self,
        item: Option<PrimitiveRef>,
        fixed_size: u16,
        proportion: u16,
        focus: bool,
    ) {
        let len = read(&self.state).items.len();
        self.insert_item(len, item, fixed_size, proportion, focus);
    }

    /// Insert an item at `index`, clamped to the item count.
    ///
    /// # Panics
    ///
    /// If both `fixed_size` and `proportion` are 0.
    pub fn insert_item(
        &self,
        index: usize,
        item: Option<PrimitiveRef>,
        fixed_size: u16,
        proportion: u16,
        focus: bool,
    ) {
        assert!(
            fixed_size > 0 || proportion > 0,
            "flexible item needs a proportion > 0"
        );
        let mut s = write(&self.state);
        let index = index.min(s.items.len());
        s.items.insert(
            index,
            FlexItem {
                item,
                fixed_size,
                proportion,
                focus,
            },
        );
        s.last_focused = None;
    }

    /// Remove every item holding `primitive`.
    pub fn remove_item(&self, primitive: &PrimitiveRef) {
        let mut s = write(&self.state);
        s.items.retain(|item| !item.holds(primitive));
        s.last_focused = None;
    }

    /// Change the size of every item holding `primitive`.
    ///
    /// # Panics
    ///
    /// If both `fixed_size` and `proportion` are 0.
    pub fn resize_item(&self, primitive: &PrimitiveRef, fixed_size: u16, proportion: u16) {
        assert!(
            fixed_size > 0 || proportion > 0,
            "flexible item needs a proportion > 0"
        );
        let mut s = write(&self.state);
        for item in s.items.iter_mut().filter(|item| item.holds(primitive)) {
            item.fixed_size = fixed_size;
            item.proportion = proportion;
        }
    }

    pub fn clear(&self) {
        let mut s = write(&self.state);
        s.items.clear();
        s.last_focused = None;
    }

    pub fn item_count(&self) -> usize {
        read(&self.state).items.len()
    }

    /// The widget in slot `index`, if the slot exists and is not empty.
    pub fn item(&self, index: usize) -> Option<PrimitiveRef> {
        read(&self.state).items.get(index).and_then(|i| i.item.clone())
    }

    fn items(&self) -> Vec<FlexItem> {
        read(&self.state).items.clone()
    }

    /// Index of the child holding focus right now.
    fn focused_index(items: &[FlexItem]) -> Option<usize> {
        items
            .iter()
            .position(|i| i.item.as_ref().is_some_and(|p| p.has_focus()))
    }

    fn layout(&self, items: &[FlexItem], area: Rect, direction: Direction) {
        let sizes: Vec<FlexSize> = items.iter().map(FlexItem::size).collect();
        let extent = match direction {
            Direction::Horizontal => area.width,
            Direction::Vertical => area.height,
        };
        let mut pos = 0u16;
        for (item, size) in items.iter().zip(distribute(&sizes, extent)) {
            if let Some(p) = &item.item {
                p.set_rect(match direction {
                    Direction::Horizontal => {
                        Rect::new(area.x.saturating_add(pos), area.y, size, area.height)
                    }
                    Direction::Vertical => {
                        Rect::new(area.x, area.y.saturating_add(pos), area.width, size)
                    }
                });
            }
            pos = pos.saturating_add(size);
        }
    }
}

impl Primitive for Flex {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, grid: &mut dyn CellGrid) {
        if !self.is_visible() {
            return;
        }
        let (direction, full_screen) = {
            let s = read(&self.state);
            (s.direction, s.full_screen)
        };
        if full_screen {
            let (w, h) = grid.size();
            self.set_rect(Rect::from_size(w, h));
        }

        #[cfg(feature = "tracing")]
        let _span = {
            let r = self.rect();
            tracing::debug_span!(
                "widget_render",
                widget = "Flex",
                x = r.x,
                y = r.y,
                w = r.width,
                h = r.height
            )
            .entered()
        };

        let items = self.items();
        let focused = Self::focused_index(&items);
        self.block.draw_frame(grid, focused.is_some());
        self.layout(&items, self.inner_rect(), direction);

        let order = (0..items.len())
            .filter(|&i| Some(i) != focused)
            .chain(focused);
        for index in order {
            if let Some(child) = &items[index].item
                && child.is_visible()
            {
                child.draw(grid);
            }
        }

        if focused.is_some() {
            write(&self.state).last_focused = focused;
        }
    }

    fn focus(&self, delegate: &mut dyn FnMut(PrimitiveRef)) {
        let items = self.items();
        let last = read(&self.state).last_focused;
        let shown = |index: usize| items.get(index).and_then(FlexItem::visible);
        let target = items
            .iter()
            .filter(|i| i.focus)
            .find_map(FlexItem::visible)
            .or_else(|| Self::focused_index(&items).and_then(shown))
            .or_else(|| last.and_then(shown))
            .or_else(|| items.iter().find_map(FlexItem::visible))
            .cloned();
        match target {
            Some(child) => delegate(child),
            None => self.block.set_focused(true),
        }
    }

    fn has_focus(&self) -> bool {
        self.block.is_focused() || Self::focused_index(&self.items()).is_some()
    }

    fn key_event(&self, event: KeyEvent, set_focus: &mut dyn FnMut(PrimitiveRef)) {
        let items = self.items();
        if let Some(index) = Self::focused_index(&items)
            && let Some(child) = &items[index].item
        {
            write(&self.state).last_focused = Some(index);
            child.handle_key(event, set_focus);
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
        for (index, item) in self.items().iter().enumerate() {
            let Some(child) = item.visible() else {
                continue;
            };
            let (consumed, capture) = child.handle_mouse(action, event, set_focus);
            if consumed {
                if action == MouseAction::LeftDown {
                    write(&self.state).last_focused = Some(index);
                }
                return (true, capture);
            }
        }
        (false, None)
    }
}
