#![forbid(unsafe_code)]

//! weft public facade crate.
//!
//! Re-exports the types most applications need from the internal crates
//! and offers a prelude for day-to-day use.
//!
//! # Example
//! ```
//! use weft::prelude::*;
//!
//! let root = Flex::new();
//! let view = TextView::new();
//! view.set_text("[yellow]hello[-] world");
//! root.add_item(Some(view.clone() as PrimitiveRef), 0, 1, true);
//!
//! let mut dispatcher = Dispatcher::new(root);
//! dispatcher.handle_event(&Event::Resize { width: 20, height: 3 });
//!
//! let mut buffer = Buffer::new(20, 3);
//! dispatcher.draw(&mut buffer);
//! assert!(view.has_focus());
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use weft_core::event::{
    Event, KeyCode, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent, MouseEventKind,
};
pub use weft_core::geometry::{Rect, Sides};

// --- Render re-exports -----------------------------------------------------

pub use weft_render::{Buffer, Cell, CellGrid, CellStyle, PackedRgba, StyleFlags};

// --- Style re-exports ------------------------------------------------------

pub use weft_style::{
    BorderGlyphs, ColorParseError, ScrollBarGlyphs, Style, Theme, ThemeBuilder, parse_color,
};

// --- Layout re-exports -----------------------------------------------------

pub use weft_layout::{Alignment, AlignmentParseError, Direction, ScrollBarVisibility};

// --- Text re-exports -------------------------------------------------------

pub use weft_text::{escape, strip_tags, tagged_width, word_wrap};

// --- Widget re-exports -----------------------------------------------------

pub use weft_widgets::{
    Block, Dispatcher, Flex, Primitive, PrimitiveRef, Table, TableCell, TextView,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for weft apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure, e.g. while writing into a [`TextView`].
    Io(std::io::Error),
    /// An unknown color name or malformed hex color.
    Color(ColorParseError),
    /// An unknown alignment name.
    Alignment(AlignmentParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Color(err) => write!(f, "{err}"),
            Self::Alignment(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Color(err) => Some(err),
            Self::Alignment(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ColorParseError> for Error {
    fn from(err: ColorParseError) -> Self {
        Self::Color(err)
    }
}

impl From<AlignmentParseError> for Error {
    fn from(err: AlignmentParseError) -> Self {
        Self::Alignment(err)
    }
}

/// Standard result type for weft APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, Block, Buffer, CellGrid, Direction, Dispatcher, Error, Event, Flex, KeyCode,
        KeyEvent, Modifiers, MouseAction, Primitive, PrimitiveRef, Rect, Result,
        ScrollBarVisibility, Table, TableCell, TextView, Theme,
    };

    pub use crate::{core, layout, render, style, text, widgets};
}

pub use weft_core as core;
pub use weft_layout as layout;
pub use weft_render as render;
pub use weft_style as style;
pub use weft_text as text;
pub use weft_widgets as widgets;
