#![forbid(unsafe_code)]

//! Parsing inline style and region tags.
//!
//! [`decompose`] splits tagged text into the plain text a terminal shows
//! and the list of tags found in it. Every tag is anchored at a byte
//! position of the plain text so that style changes, regions and line
//! breaks can be mapped back to the tagged source.
//!
//! Malformed tags are not errors; anything that does not match the tag
//! grammar is plain text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use weft_render::{CellStyle, PackedRgba, StyleFlags};
use weft_style::parse_color;

use crate::width::string_width;

static STYLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[([a-zA-Z]+|#[0-9a-zA-Z]{6}|-)?(:([a-zA-Z]+|#[0-9a-zA-Z]{6}|-)?(:([lbdiurs]+|-)?)?)?\]",
    )
    .expect("style tag pattern is valid")
});

static REGION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\["([a-zA-Z0-9_,;: .-]*)"\]"#).expect("region tag pattern is valid")
});

static ESCAPED_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([a-zA-Z0-9_,;: .#"-]+)\[(\[*)\]"#).expect("escape pattern is valid")
});

static ESCAPABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\[[a-zA-Z0-9_,;: .#"-]+\[*)\]"#).expect("escapable pattern is valid")
});

/// Which kinds of tags are recognized.
///
/// Escapes are recognized whenever either kind is. With both kinds off the
/// text is taken literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagOptions {
    pub colors: bool,
    pub regions: bool,
}

impl TagOptions {
    /// No tags at all.
    pub const PLAIN: Self = Self {
        colors: false,
        regions: false,
    };
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            colors: true,
            regions: true,
        }
    }
}

/// One channel of a style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagValue<T> {
    /// Empty field: leave the channel as it is.
    #[default]
    Keep,
    /// `-`: go back to the caller's base style.
    Reset,
    Set(T),
}

impl<T: Copy> TagValue<T> {
    /// `over` layered on top of `self`.
    #[inline]
    fn layered(self, over: Self) -> Self {
        match over {
            Self::Keep => self,
            other => other,
        }
    }
}

/// The decoded body of a `[fg:bg:attrs]` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleTag {
    pub fg: TagValue<PackedRgba>,
    pub bg: TagValue<PackedRgba>,
    pub attrs: TagValue<StyleFlags>,
}

impl StyleTag {
    /// Decode a single tag such as `"[red::b]"`.
    ///
    /// Returns `None` if `tag` is not exactly one style tag.
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = STYLE_TAG.captures(tag)?;
        let whole = caps.get(0)?;
        (whole.start() == 0 && whole.end() == tag.len() && tag.len() > 2)
            .then(|| Self::from_captures(&caps))
    }

    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            fg: color_value(caps.get(1).map(|m| m.as_str())),
            bg: color_value(caps.get(3).map(|m| m.as_str())),
            attrs: attr_value(caps.get(5).map(|m| m.as_str())),
        }
    }

    /// Apply `other` on top of this one, channel by channel.
    pub fn apply(&mut self, other: &StyleTag) {
        self.fg = self.fg.layered(other.fg);
        self.bg = self.bg.layered(other.bg);
        self.attrs = self.attrs.layered(other.attrs);
    }
}

/// Unknown names and malformed hex values behave like `-`.
fn color_value(field: Option<&str>) -> TagValue<PackedRgba> {
    match field {
        None | Some("") => TagValue::Keep,
        Some("-") => TagValue::Reset,
        Some(name) => parse_color(name).map_or(TagValue::Reset, TagValue::Set),
    }
}

fn attr_value(field: Option<&str>) -> TagValue<StyleFlags> {
    match field {
        None | Some("") => TagValue::Keep,
        Some("-") => TagValue::Reset,
        Some(letters) => TagValue::Set(letters.chars().fold(StyleFlags::empty(), |flags, c| {
            flags
                | match c {
                    'l' => StyleFlags::BLINK,
                    'b' => StyleFlags::BOLD,
                    'd' => StyleFlags::DIM,
                    'i' => StyleFlags::ITALIC,
                    'r' => StyleFlags::REVERSE,
                    's' => StyleFlags::STRIKETHROUGH,
                    'u' => StyleFlags::UNDERLINE,
                    _ => StyleFlags::empty(),
                }
        })),
    }
}

/// What a tag does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Style(StyleTag),
    /// Start of a region; an empty id ends the current one.
    Region(String),
    /// An escaped literal like `[red[]`. Only the extra `[` is removed.
    Escape,
}

/// A tag found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Bytes of the source covered by the tag.
    pub source: Range<usize>,
    /// Byte offset in the stripped text the tag takes effect at. For an
    /// escape, the offset of the closing `]`.
    pub position: usize,
    pub kind: TagKind,
}

impl Tag {
    /// Source bytes that do not appear in the stripped text.
    #[inline]
    pub fn removed(&self) -> usize {
        match self.kind {
            TagKind::Escape => 1,
            _ => self.source.len(),
        }
    }

    /// Stripped bytes produced by an escape, `[red]` for `[red[]`.
    pub fn escaped_span(&self) -> Option<Range<usize>> {
        matches!(self.kind, TagKind::Escape)
            .then(|| self.position + 2 - self.source.len()..self.position + 1)
    }
}

/// Style and region in effect at some point of the text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleState {
    pub style: StyleTag,
    pub region: Option<String>,
}

impl StyleState {
    /// Update the state for a tag. Escapes change nothing.
    pub fn apply(&mut self, kind: &TagKind) {
        match kind {
            TagKind::Style(tag) => self.style.apply(tag),
            TagKind::Region(id) if id.is_empty() => self.region = None,
            TagKind::Region(id) => self.region = Some(id.clone()),
            TagKind::Escape => {}
        }
    }

    /// The cell style for text in this state.
    ///
    /// `base` fills reset and untouched channels. An untouched background
    /// composites `base.bg` over `existing_bg`, the background already in
    /// the cell, so text keeps a highlight painted beneath it.
    pub fn resolve(&self, base: CellStyle, existing_bg: PackedRgba) -> CellStyle {
        let fg = match self.style.fg {
            TagValue::Set(color) => color,
            TagValue::Keep | TagValue::Reset => base.fg,
        };
        let bg = match self.style.bg {
            TagValue::Set(color) => color,
            TagValue::Reset => base.bg,
            TagValue::Keep => base.bg.over(existing_bg),
        };
        let attrs = match self.style.attrs {
            TagValue::Set(attrs) => attrs,
            TagValue::Keep | TagValue::Reset => base.attrs,
        };
        CellStyle::new(fg, bg, attrs)
    }
}

/// A stretch of stripped text sharing one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub state: StyleState,
}

/// Tagged text split into plain text and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed<'a> {
    source: &'a str,
    stripped: String,
    tags: Vec<Tag>,
    width: usize,
}

impl<'a> Decomposed<'a> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The text without tags, as printed.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    /// Tags ordered by position, never overlapping in the source.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Display width of the stripped text.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map a stripped byte offset to the source.
    ///
    /// Tags anchored exactly at `position` come after the returned offset,
    /// so a cut there leaves them with the text that follows.
    pub fn source_offset(&self, position: usize) -> usize {
        position
            + self
                .tags
                .iter()
                .take_while(|tag| tag.position < position)
                .map(Tag::removed)
                .sum::<usize>()
    }

    /// State after every tag anchored at or before `position`.
    pub fn state_at(&self, position: usize) -> StyleState {
        let mut state = StyleState::default();
        for tag in self.tags.iter().take_while(|tag| tag.position <= position) {
            state.apply(&tag.kind);
        }
        state
    }

    /// Stripped text split wherever a tag changes the state.
    pub fn runs(&self) -> Vec<StyleRun> {
        let mut runs = Vec::new();
        let mut state = StyleState::default();
        let mut start = 0;
        for tag in &self.tags {
            if matches!(tag.kind, TagKind::Escape) {
                continue;
            }
            if tag.position > start {
                runs.push(StyleRun {
                    range: start..tag.position,
                    state: state.clone(),
                });
                start = tag.position;
            }
            state.apply(&tag.kind);
        }
        if start < self.stripped.len() {
            runs.push(StyleRun {
                range: start..self.stripped.len(),
                state,
            });
        }
        runs
    }
}

/// Split `text` into plain text and tags.
pub fn decompose(text: &str, options: TagOptions) -> Decomposed<'_> {
    if options == TagOptions::PLAIN {
        return Decomposed {
            source: text,
            stripped: text.to_string(),
            tags: Vec::new(),
            width: string_width(text),
        };
    }

    let mut found: Vec<(Range<usize>, TagKind)> = Vec::new();
    if options.colors {
        found.extend(
            STYLE_TAG
                .captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    (whole.len() > 2)
                        .then(|| (whole.range(), TagKind::Style(StyleTag::from_captures(&caps))))
                }),
        );
    }
    if options.regions {
        found.extend(REGION_TAG.captures_iter(text).filter_map(|caps| {
            Some((caps.get(0)?.range(), TagKind::Region(caps[1].to_string())))
        }));
    }
    found.extend(ESCAPED_TAG.find_iter(text).map(|m| (m.range(), TagKind::Escape)));
    found.sort_by_key(|(range, _)| range.start);

    let mut stripped = String::with_capacity(text.len());
    let mut tags = Vec::with_capacity(found.len());
    let mut cursor = 0;
    for (range, kind) in found {
        if range.start < cursor {
            continue;
        }
        stripped.push_str(&text[cursor..range.start]);
        if matches!(kind, TagKind::Escape) {
            stripped.push_str(&text[range.start..range.end - 2]);
        }
        let position = stripped.len();
        if matches!(kind, TagKind::Escape) {
            stripped.push(']');
        }
        cursor = range.end;
        tags.push(Tag {
            source: range,
            position,
            kind,
        });
    }
    stripped.push_str(&text[cursor..]);

    let width = string_width(&stripped);
    Decomposed {
        source: text,
        stripped,
        tags,
        width,
    }
}

/// `text` without style or region tags, with escapes resolved.
pub fn strip_tags(text: &str) -> String {
    decompose(text, TagOptions::default()).stripped
}

/// Escape everything in `text` that would be read as a tag.
///
/// `strip_tags(&escape(s)) == s` for any `s`.
pub fn escape(text: &str) -> String {
    ESCAPABLE.replace_all(text, "${1}[]").into_owned()
}

/// Display width of `text` with tags removed.
pub fn tagged_width(text: &str) -> usize {
    decompose(text, TagOptions::default()).width
}
