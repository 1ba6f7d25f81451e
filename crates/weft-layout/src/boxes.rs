#![forbid(unsafe_code)]

//! The box model: outer rectangle, optional one-cell border, padding.

use weft_core::geometry::{Rect, Sides};

/// Content rectangle of a box.
///
/// A border removes one cell from every side, then `padding` is
/// subtracted. Width and height clamp at zero.
pub fn inner_rect(outer: Rect, border: bool, padding: Sides) -> Rect {
    let frame = if border { Sides::all(1) } else { Sides::default() };
    outer.inner(frame.saturating_add(padding))
}
