#![forbid(unsafe_code)]

//! Layout solvers shared by every widget.
//!
//! - [`boxes`]: a widget's inner rectangle from border and padding.
//! - [`flex`]: fixed and proportional sizes along one axis.
//! - [`table`]: visible rows, column widths, and offsets of a table.
//! - [`scroll`]: scroll windows and scrollbar thumb placement.
//!
//! Solvers are pure functions of their inputs and never fail; zero-sized
//! areas produce empty (but valid) results.

pub mod boxes;
pub mod flex;
pub mod scroll;
pub mod table;

use std::fmt;
use std::str::FromStr;

pub use boxes::inner_rect;
pub use flex::{Flex, FlexSize, distribute};
pub use scroll::{ScrollBarVisibility, ScrollWindow, scrollbar_thumb};
pub use table::{CellMetrics, ColumnSpan, TableLayout, TableLayoutInput, TableMetrics};
pub use weft_core::geometry::{Rect, Sides};

/// Axis along which a container lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Horizontal alignment of text within a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Error for an unrecognized alignment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentParseError(pub String);

impl fmt::Display for AlignmentParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown alignment: {} (expected left, center or right)", self.0)
    }
}

impl std::error::Error for AlignmentParseError {}

impl FromStr for Alignment {
    type Err = AlignmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(AlignmentParseError(s.to_string())),
        }
    }
}
