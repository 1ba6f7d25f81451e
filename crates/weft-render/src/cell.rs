#![forbid(unsafe_code)]

//! Colors, attribute flags, and the grid cell.

use smallvec::SmallVec;

/// A compact RGBA color, laid out as `0xRRGGBBAA`.
///
/// Alpha 0 ([`PackedRgba::TRANSPARENT`]) doubles as "terminal default":
/// a cell whose background is transparent shows whatever the terminal
/// would show. Channels are straight (not pre-multiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent; the terminal default color.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// True for the terminal-default (alpha 0) color.
    #[inline]
    pub const fn is_default(self) -> bool {
        self.a() == 0
    }

    /// Source-over compositing of `self` onto `dst`.
    ///
    /// An opaque source replaces `dst`; a transparent source leaves it
    /// untouched. Partial alpha mixes the channels, rounding to nearest.
    pub fn over(self, dst: Self) -> Self {
        let sa = u32::from(self.a());
        match sa {
            255 => return self,
            0 => return dst,
            _ => {}
        }
        let da = u32::from(dst.a());
        // Scaled by 255^2 so that the divisions below stay exact until rounding.
        let out_a = 255 * sa + da * (255 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            let num = u32::from(s) * sa * 255 + u32::from(d) * da * (255 - sa);
            ((num + out_a / 2) / out_a).min(255) as u8
        };
        Self::rgba(
            mix(self.r(), dst.r()),
            mix(self.g(), dst.g()),
            mix(self.b(), dst.b()),
            ((out_a + 127) / 255).min(255) as u8,
        )
    }
}

bitflags::bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD          = 0b0000_0001;
        const DIM           = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const UNDERLINE     = 0b0000_1000;
        const BLINK         = 0b0001_0000;
        const REVERSE       = 0b0010_0000;
        const STRIKETHROUGH = 0b0100_0000;
        const HIDDEN        = 0b1000_0000;
    }
}

/// Fully resolved style of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub attrs: StyleFlags,
}

impl CellStyle {
    pub const fn new(fg: PackedRgba, bg: PackedRgba, attrs: StyleFlags) -> Self {
        Self { fg, bg, attrs }
    }

    #[must_use]
    pub const fn fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[must_use]
    pub const fn bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    #[must_use]
    pub const fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = attrs;
        self
    }
}

/// One terminal cell: a leading rune, any combining runes, and a style.
///
/// The trailing cells of a wide grapheme hold a blank `' '` carrying the
/// same style as the leading cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub combining: SmallVec<[char; 2]>,
    pub style: CellStyle,
}

impl Cell {
    /// A cell holding `ch` with the default style.
    pub fn from_char(ch: char) -> Self {
        Self {
            ch,
            combining: SmallVec::new(),
            style: CellStyle::default(),
        }
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    /// The leading rune followed by its combining runes.
    pub fn symbol(&self) -> String {
        let mut s = String::with_capacity(4 + self.combining.len() * 4);
        s.push(self.ch);
        s.extend(self.combining.iter());
        s
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::from_char(' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_round_trips_channels() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(c.0, 0x0102_0304);
    }

    #[test]
    fn transparent_is_default() {
        assert!(PackedRgba::TRANSPARENT.is_default());
        assert!(!PackedRgba::BLACK.is_default());
    }

    #[test]
    fn over_with_opaque_source_replaces() {
        let red = PackedRgba::rgb(255, 0, 0);
        assert_eq!(red.over(PackedRgba::WHITE), red);
    }

    #[test]
    fn over_with_transparent_source_keeps_destination() {
        let blue = PackedRgba::rgb(0, 0, 255);
        assert_eq!(PackedRgba::TRANSPARENT.over(blue), blue);
    }

    #[test]
    fn over_half_alpha_mixes() {
        let half_white = PackedRgba::rgba(255, 255, 255, 128);
        let out = half_white.over(PackedRgba::BLACK);
        assert_eq!(out.a(), 255);
        assert!((127..=129).contains(&out.r()));
        assert_eq!(out.r(), out.g());
    }

    #[test]
    fn cell_symbol_includes_combining() {
        let mut cell = Cell::from_char('e');
        cell.combining.push('\u{301}');
        assert_eq!(cell.symbol(), "e\u{301}");
    }

    #[test]
    fn cell_style_builders() {
        let style = CellStyle::default()
            .fg(PackedRgba::WHITE)
            .bg(PackedRgba::BLACK)
            .attrs(StyleFlags::BOLD | StyleFlags::UNDERLINE);
        assert_eq!(style.fg, PackedRgba::WHITE);
        assert!(style.attrs.contains(StyleFlags::UNDERLINE));
        let cell = Cell::default().with_style(style);
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.style, style);
    }
}
