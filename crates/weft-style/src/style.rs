#![forbid(unsafe_code)]

//! Partial styles that layer onto each other.

use weft_render::{CellStyle, PackedRgba, StyleFlags};

/// A style whose unset fields inherit from whatever it is layered on.
///
/// Widgets keep `Style`s in their configuration and only resolve them to a
/// [`CellStyle`] when a cell is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// Nothing set.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Replace the attribute set.
    #[must_use]
    pub const fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Add attributes to whatever is already set.
    #[must_use]
    pub fn add_attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | attrs);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.add_attrs(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.add_attrs(StyleFlags::REVERSE)
    }

    /// Layer `other` on top of `self`: fields set in `other` win.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: other.attrs.or(self.attrs),
        }
    }

    /// Resolve unset fields to the terminal defaults.
    pub fn resolve(self) -> CellStyle {
        CellStyle::new(
            self.fg.unwrap_or(PackedRgba::TRANSPARENT),
            self.bg.unwrap_or(PackedRgba::TRANSPARENT),
            self.attrs.unwrap_or_default(),
        )
    }

    /// True if nothing is set.
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }
}

impl From<CellStyle> for Style {
    fn from(style: CellStyle) -> Self {
        Self {
            fg: Some(style.fg),
            bg: Some(style.bg),
            attrs: Some(style.attrs),
        }
    }
}
