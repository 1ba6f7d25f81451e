#![forbid(unsafe_code)]

//! Cell-grid geometry: rectangles and four-sided insets.
//!
//! All coordinates are terminal cells with the origin at the top-left.
//! Arithmetic saturates instead of wrapping, so shrinking a rectangle past
//! zero yields an empty rectangle rather than a panic.

/// A rectangle on the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left column (inclusive).
    pub x: u16,
    /// Top row (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// True when either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Hit test a single cell.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlapping region of two rectangles, empty if they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if x >= right || y >= bottom {
            return Rect::new(x, y, 0, 0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink by `sides`, clamping width and height at zero.
    ///
    /// The origin moves by the top/left insets even when the result is
    /// empty, but never past the original right/bottom edge.
    pub fn inner(&self, sides: Sides) -> Rect {
        let x = self.x.saturating_add(sides.left).min(self.right());
        let y = self.y.saturating_add(sides.top).min(self.bottom());
        let width = self.width.saturating_sub(sides.horizontal_sum());
        let height = self.height.saturating_sub(sides.vertical_sum());
        Rect::new(x, y, width, height)
    }

    /// A single row of this rectangle, or `None` if `row` is outside it.
    pub fn row(&self, row: u16) -> Option<Rect> {
        let y = self.y.checked_add(row)?;
        (row < self.height).then(|| Rect::new(self.x, y, self.width, 1))
    }
}

/// Insets on four sides of a rectangle (padding, borders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    /// Rows removed from the top.
    pub top: u16,
    /// Columns removed from the right.
    pub right: u16,
    /// Rows removed from the bottom.
    pub bottom: u16,
    /// Columns removed from the left.
    pub left: u16,
}

impl Sides {
    /// Insets in CSS order: top, right, bottom, left.
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same inset on every side.
    pub const fn all(value: u16) -> Self {
        Self::new(value, value, value, value)
    }

    /// Left and right only.
    pub const fn horizontal(value: u16) -> Self {
        Self::new(0, value, 0, value)
    }

    /// Top and bottom only.
    pub const fn vertical(value: u16) -> Self {
        Self::new(value, 0, value, 0)
    }

    /// Left plus right.
    pub const fn horizontal_sum(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Top plus bottom.
    pub const fn vertical_sum(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }

    /// Side-wise sum, saturating.
    pub const fn saturating_add(self, other: Sides) -> Sides {
        Sides::new(
            self.top.saturating_add(other.top),
            self.right.saturating_add(other.right),
            self.bottom.saturating_add(other.bottom),
            self.left.saturating_add(other.left),
        )
    }
}

impl From<u16> for Sides {
    fn from(value: u16) -> Self {
        Self::all(value)
    }
}

impl From<(u16, u16, u16, u16)> for Sides {
    fn from((top, right, bottom, left): (u16, u16, u16, u16)) -> Self {
        Self::new(top, right, bottom, left)
    }
}
