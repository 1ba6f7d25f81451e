#![forbid(unsafe_code)]

//! Focus tracking and input routing for a tree of primitives.
//!
//! The [`Dispatcher`] is the minimal application root. It owns the root
//! primitive, remembers which primitive has focus, and turns raw input
//! into calls on the tree:
//!
//! - keys go through the root, whose containers pass them to their
//!   focused child;
//! - mouse reports become [`MouseAction`]s, with clicks and double-clicks
//!   detected here, and are hit-tested from the root down. A handler can
//!   capture the mouse so that later reports go straight to it.
//!
//! Handlers never change focus directly. They call the `set_focus`
//! callback they are given, and the dispatcher applies the requests once
//! the handler has returned and released its locks.

use std::time::{Duration, Instant};

use weft_core::event::{Event, KeyEvent, MouseAction, MouseButton, MouseEvent, MouseEventKind};
use weft_core::geometry::Rect;
use weft_core::{debug, warn};
use weft_render::CellGrid;

use crate::PrimitiveRef;

/// Two clicks closer than this make a double-click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Delegation steps after which `set_focus` gives up.
const MAX_DELEGATION_DEPTH: usize = 64;

fn slot(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
    }
}

/// Routes input to a primitive tree.
#[derive(Default)]
pub struct Dispatcher {
    root: Option<PrimitiveRef>,
    focused: Option<PrimitiveRef>,
    mouse_capture: Option<PrimitiveRef>,
    /// Where each button went down, until it comes back up.
    pressed: [Option<(u16, u16)>; 3],
    /// Time of the last click per button, cleared by a double-click.
    last_click: [Option<Instant>; 3],
}

impl Dispatcher {
    /// A dispatcher for `root`, with focus set on it.
    pub fn new(root: PrimitiveRef) -> Self {
        let mut dispatcher = Self::default();
        dispatcher.set_root(root);
        dispatcher
    }

    /// Replace the root and focus it.
    pub fn set_root(&mut self, root: PrimitiveRef) {
        self.root = Some(root.clone());
        self.mouse_capture = None;
        self.set_focus(root);
    }

    pub fn root(&self) -> Option<PrimitiveRef> {
        self.root.clone()
    }

    /// The primitive that accepted focus last.
    pub fn focused(&self) -> Option<PrimitiveRef> {
        self.focused.clone()
    }

    /// Move focus to `primitive`, following delegations until a primitive
    /// accepts it.
    pub fn set_focus(&mut self, primitive: PrimitiveRef) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("focus_change").entered();

        let mut target = primitive;
        for _ in 0..MAX_DELEGATION_DEPTH {
            if let Some(previous) = self.focused.take() {
                previous.blur();
            }
            self.focused = Some(target.clone());
            let mut delegated = None;
            target.focus(&mut |p| delegated = Some(p));
            match delegated {
                Some(next) => target = next,
                None => {
                    debug!("focus settled");
                    return;
                }
            }
        }
        warn!(depth = MAX_DELEGATION_DEPTH, "focus delegation did not settle");
    }

    /// Draw the whole tree.
    pub fn draw(&self, grid: &mut dyn CellGrid) {
        if let Some(root) = &self.root {
            root.draw(grid);
        }
    }

    /// Route any input event. Returns whether it was handled.
    ///
    /// A resize gives the root the whole new screen.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => self.dispatch_key(*key),
            Event::Mouse(mouse) => self.dispatch_mouse(*mouse),
            Event::Resize { width, height } => match &self.root {
                Some(root) => {
                    root.set_rect(Rect::from_size(*width, *height));
                    true
                }
                None => false,
            },
            Event::Paste(_) => false,
        }
    }

    /// Deliver a key through the root, or to the focused primitive when
    /// focus sits outside the root's tree.
    pub fn dispatch_key(&mut self, event: KeyEvent) -> bool {
        let target = match &self.root {
            Some(root) if root.has_focus() => Some(root.clone()),
            _ => self.focused.clone(),
        };
        let Some(target) = target else {
            return false;
        };
        let mut requests = Vec::new();
        target.handle_key(event, &mut |p| requests.push(p));
        self.apply_focus_requests(requests);
        true
    }

    /// Classify a mouse report and deliver the resulting actions.
    pub fn dispatch_mouse(&mut self, event: MouseEvent) -> bool {
        self.dispatch_mouse_at(event, Instant::now())
    }

    /// [`dispatch_mouse`](Self::dispatch_mouse) with an explicit clock.
    pub fn dispatch_mouse_at(&mut self, event: MouseEvent, now: Instant) -> bool {
        match event.kind {
            MouseEventKind::Down(button) => {
                self.pressed[slot(button)] = Some(event.position());
                self.fire(MouseAction::down(button), event)
            }
            MouseEventKind::Up(button) => {
                let mut consumed = self.fire(MouseAction::up(button), event);
                let i = slot(button);
                if self.pressed[i].take() == Some(event.position()) {
                    let double = self.last_click[i]
                        .is_some_and(|t| now.saturating_duration_since(t) <= DOUBLE_CLICK_INTERVAL);
                    let action = if double {
                        self.last_click[i] = None;
                        MouseAction::double_click(button)
                    } else {
                        self.last_click[i] = Some(now);
                        MouseAction::click(button)
                    };
                    consumed |= self.fire(action, event);
                }
                consumed
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => self.fire(MouseAction::Move, event),
            kind => match MouseAction::scroll(kind) {
                Some(action) => self.fire(action, event),
                None => false,
            },
        }
    }

    /// Deliver one action to the capturing primitive or the root.
    fn fire(&mut self, action: MouseAction, event: MouseEvent) -> bool {
        let Some(target) = self.mouse_capture.clone().or_else(|| self.root.clone()) else {
            return false;
        };
        let mut requests = Vec::new();
        let (consumed, capture) = target.handle_mouse(action, event, &mut |p| requests.push(p));
        self.mouse_capture = capture;
        self.apply_focus_requests(requests);
        consumed
    }

    fn apply_focus_requests(&mut self, requests: Vec<PrimitiveRef>) {
        for primitive in requests {
            self.set_focus(primitive);
        }
    }
}
