#![forbid(unsafe_code)]

//! Cell model and the grid interface widgets draw into.
//!
//! Widgets never talk to a terminal. They paint [`cell::Cell`]s into
//! anything implementing [`grid::CellGrid`]; [`buffer::Buffer`] is the
//! in-memory implementation used by backends and tests.

pub mod buffer;
pub mod cell;
pub mod grid;

pub use buffer::Buffer;
pub use cell::{Cell, CellStyle, PackedRgba, StyleFlags};
pub use grid::CellGrid;
