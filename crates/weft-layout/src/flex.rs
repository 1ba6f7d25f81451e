#![forbid(unsafe_code)]

//! Fixed and proportional sizing along one axis.
//!
//! Fixed items are taken off the top; the rest is shared among flexible
//! items by weight. Each flexible item gets `remaining * p / p_remaining`,
//! and both running totals shrink before the next item. The rounding
//! remainder therefore lands on later items and the sizes add up exactly.
//!
//! ```
//! use weft_layout::{FlexSize, distribute};
//!
//! let sizes = distribute(
//!     &[FlexSize::Fixed(10), FlexSize::Proportional(1), FlexSize::Proportional(2)],
//!     100,
//! );
//! assert_eq!(sizes, vec![10, 30, 60]);
//! ```

use weft_core::geometry::Rect;

use crate::Direction;

/// Size request of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlexSize {
    /// Exactly this many cells.
    Fixed(u16),
    /// A share of what the fixed items leave over. Must be at least 1.
    Proportional(u16),
}

impl FlexSize {
    /// A fixed size of 0 means "flexible with `proportion`".
    pub const fn new(fixed: u16, proportion: u16) -> Self {
        if fixed > 0 {
            Self::Fixed(fixed)
        } else {
            Self::Proportional(proportion)
        }
    }
}

/// Concrete sizes for `items` sharing `available` cells.
///
/// When the fixed items alone need more than `available`, they are clipped
/// in order and flexible items get nothing.
///
/// # Panics
///
/// Panics if a [`FlexSize::Proportional`] weight is 0.
pub fn distribute(items: &[FlexSize], available: u16) -> Vec<u16> {
    let mut fixed_total: u32 = 0;
    let mut weight_total: u32 = 0;
    for item in items {
        match *item {
            FlexSize::Fixed(size) => fixed_total += u32::from(size),
            FlexSize::Proportional(weight) => {
                assert!(weight >= 1, "flexible item needs a proportion of at least 1");
                weight_total += u32::from(weight);
            }
        }
    }

    let available = u32::from(available);
    let mut left_for_fixed = available;
    let mut remaining = available.saturating_sub(fixed_total);
    items
        .iter()
        .map(|item| match *item {
            FlexSize::Fixed(size) => {
                let size = u32::from(size).min(left_for_fixed);
                left_for_fixed -= size;
                size as u16
            }
            FlexSize::Proportional(weight) => {
                let weight = u32::from(weight);
                let size = remaining * weight / weight_total;
                remaining -= size;
                weight_total -= weight;
                size as u16
            }
        })
        .collect()
}

/// Splits a rectangle into consecutive slices along one axis.
#[derive(Debug, Clone, Default)]
pub struct Flex {
    direction: Direction,
    items: Vec<FlexSize>,
}

impl Flex {
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            items: Vec::new(),
        }
    }

    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn items(mut self, items: impl IntoIterator<Item = FlexSize>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// One rectangle per item, starting at the area origin.
    ///
    /// Each slice spans the full perpendicular extent of `area`.
    pub fn split(&self, area: Rect) -> Vec<Rect> {
        let extent = match self.direction {
            Direction::Horizontal => area.width,
            Direction::Vertical => area.height,
        };
        let mut pos = match self.direction {
            Direction::Horizontal => area.x,
            Direction::Vertical => area.y,
        };
        distribute(&self.items, extent)
            .into_iter()
            .map(|size| {
                let rect = match self.direction {
                    Direction::Horizontal => Rect::new(pos, area.y, size, area.height),
                    Direction::Vertical => Rect::new(area.x, pos, area.width, size),
                };
                pos = pos.saturating_add(size);
                rect
            })
            .collect()
    }
}
