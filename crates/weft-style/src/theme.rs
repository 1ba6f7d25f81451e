#![forbid(unsafe_code)]

//! Toolkit-wide default colors and glyphs.
//!
//! A [`Theme`] is plain configuration. One process-wide copy lives behind a
//! read-mostly lock; widgets snapshot it with [`Theme::current`] when they
//! are constructed and may override individual values afterwards.
//!
//! ```
//! use weft_style::theme::Theme;
//! use weft_style::PackedRgba;
//!
//! let custom = Theme::builder()
//!     .title(PackedRgba::rgb(255, 215, 0))
//!     .build();
//! Theme::set_current(custom.clone());
//! assert_eq!(Theme::current().title, PackedRgba::rgb(255, 215, 0));
//! # Theme::set_current(Theme::default());
//! ```

use std::env;
use std::sync::{LazyLock, PoisonError, RwLock};

use weft_render::PackedRgba;

/// Box-drawing glyphs for borders and table separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub left_t: char,
    pub right_t: char,
    pub top_t: char,
    pub bottom_t: char,
    pub cross: char,
}

impl BorderGlyphs {
    /// Single thin lines.
    pub const SINGLE: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        left_t: '├',
        right_t: '┤',
        top_t: '┬',
        bottom_t: '┴',
        cross: '┼',
    };

    /// Double lines, used for the border of a focused widget.
    pub const DOUBLE: Self = Self {
        horizontal: '═',
        vertical: '║',
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        left_t: '╠',
        right_t: '╣',
        top_t: '╦',
        bottom_t: '╩',
        cross: '╬',
    };

    /// Plain ASCII for terminals without box-drawing fonts.
    pub const ASCII: Self = Self {
        horizontal: '-',
        vertical: '|',
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        left_t: '+',
        right_t: '+',
        top_t: '+',
        bottom_t: '+',
        cross: '+',
    };
}

/// Scrollbar glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBarGlyphs {
    pub area: char,
    pub area_focused: char,
    pub handle: char,
    pub handle_focused: char,
}

impl Default for ScrollBarGlyphs {
    fn default() -> Self {
        Self {
            area: '░',
            area_focused: '▒',
            handle: '▓',
            handle_focused: '█',
        }
    }
}

/// Default colors and glyphs for every widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Background of every primitive.
    pub primitive_background: PackedRgba,
    /// Background of contrasting elements, e.g. input fields.
    pub contrast_background: PackedRgba,
    /// Background of even more contrasting elements, e.g. selections.
    pub more_contrast_background: PackedRgba,
    pub border: PackedRgba,
    pub title: PackedRgba,
    /// Lines and glyphs that are not text, e.g. table separators.
    pub graphics: PackedRgba,
    pub primary_text: PackedRgba,
    pub secondary_text: PackedRgba,
    pub tertiary_text: PackedRgba,
    /// Text on a primary-colored background.
    pub inverse_text: PackedRgba,
    /// Secondary text on a contrast background.
    pub contrast_secondary_text: PackedRgba,
    pub scroll_bar: PackedRgba,
    pub borders: BorderGlyphs,
    pub focused_borders: BorderGlyphs,
    pub scroll_bar_glyphs: ScrollBarGlyphs,
    /// Written at the truncation point of text cut off on the right.
    pub ellipsis: char,
}

static CURRENT: LazyLock<RwLock<Theme>> = LazyLock::new(|| RwLock::new(Theme::default()));

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Light text on a black background.
    pub fn dark() -> Self {
        Self {
            primitive_background: PackedRgba::BLACK,
            contrast_background: PackedRgba::rgb(0, 0, 255),
            more_contrast_background: PackedRgba::rgb(0, 128, 0),
            border: PackedRgba::WHITE,
            title: PackedRgba::WHITE,
            graphics: PackedRgba::WHITE,
            primary_text: PackedRgba::WHITE,
            secondary_text: PackedRgba::rgb(255, 255, 0),
            tertiary_text: PackedRgba::rgb(0, 128, 0),
            inverse_text: PackedRgba::rgb(0, 0, 255),
            contrast_secondary_text: PackedRgba::rgb(0, 139, 139),
            scroll_bar: PackedRgba::WHITE,
            borders: BorderGlyphs::SINGLE,
            focused_borders: BorderGlyphs::DOUBLE,
            scroll_bar_glyphs: ScrollBarGlyphs::default(),
            ellipsis: '…',
        }
    }

    /// Dark text on a white background.
    pub fn light() -> Self {
        Self {
            primitive_background: PackedRgba::WHITE,
            contrast_background: PackedRgba::rgb(173, 216, 230),
            more_contrast_background: PackedRgba::rgb(144, 238, 144),
            border: PackedRgba::BLACK,
            title: PackedRgba::BLACK,
            graphics: PackedRgba::BLACK,
            primary_text: PackedRgba::BLACK,
            secondary_text: PackedRgba::rgb(0, 0, 139),
            tertiary_text: PackedRgba::rgb(0, 100, 0),
            inverse_text: PackedRgba::WHITE,
            contrast_secondary_text: PackedRgba::rgb(0, 128, 128),
            scroll_bar: PackedRgba::BLACK,
            ..Self::dark()
        }
    }

    /// Dark or light preset depending on the terminal background.
    pub fn detect() -> Self {
        if Self::detect_dark_mode() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Guess whether the terminal background is dark.
    ///
    /// Reads `COLORFGBG` (`"fg;bg"` ANSI indices). Backgrounds 7 and 15 are
    /// light; anything else, or no variable, counts as dark.
    pub fn detect_dark_mode() -> bool {
        detect_dark_mode_from_colorfgbg(env::var("COLORFGBG").ok().as_deref())
    }

    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::from_theme(Self::default())
    }

    /// Snapshot of the process-wide theme.
    pub fn current() -> Theme {
        CURRENT
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the process-wide theme. Existing widgets keep their snapshot.
    pub fn set_current(theme: Theme) {
        *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = theme;
    }
}

fn detect_dark_mode_from_colorfgbg(colorfgbg: Option<&str>) -> bool {
    if let Some(value) = colorfgbg
        && let Some(bg) = value.split(';').next_back()
        && let Ok(bg) = bg.trim().parse::<u8>()
    {
        return bg != 7 && bg != 15;
    }
    true
}

/// Builder for [`Theme`] starting from an existing preset.
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    theme: Theme,
}

macro_rules! color_setters {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name(mut self, color: PackedRgba) -> Self {
                self.theme.$name = color;
                self
            }
        )*
    };
}

impl ThemeBuilder {
    pub fn from_theme(theme: Theme) -> Self {
        Self { theme }
    }

    color_setters!(
        primitive_background,
        contrast_background,
        more_contrast_background,
        border,
        title,
        graphics,
        primary_text,
        secondary_text,
        tertiary_text,
        inverse_text,
        contrast_secondary_text,
        scroll_bar,
    );

    #[must_use]
    pub fn borders(mut self, glyphs: BorderGlyphs) -> Self {
        self.theme.borders = glyphs;
        self
    }

    #[must_use]
    pub fn focused_borders(mut self, glyphs: BorderGlyphs) -> Self {
        self.theme.focused_borders = glyphs;
        self
    }

    #[must_use]
    pub fn scroll_bar_glyphs(mut self, glyphs: ScrollBarGlyphs) -> Self {
        self.theme.scroll_bar_glyphs = glyphs;
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: char) -> Self {
        self.theme.ellipsis = ellipsis;
        self
    }

    pub fn build(self) -> Theme {
        self.theme
    }
}
