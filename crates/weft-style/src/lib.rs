#![forbid(unsafe_code)]

//! Styles, color names, and the toolkit-wide theme.

pub mod color;
pub mod style;
pub mod theme;

pub use color::{ColorParseError, parse_color};
pub use style::Style;
pub use theme::{BorderGlyphs, ScrollBarGlyphs, Theme, ThemeBuilder};
pub use weft_render::{CellStyle, PackedRgba, StyleFlags};
