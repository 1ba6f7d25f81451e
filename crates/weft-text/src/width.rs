#![forbid(unsafe_code)]

//! Display width of grapheme clusters.
//!
//! A cluster is what a terminal draws as one glyph: a base character plus
//! any combining marks, or a whole emoji sequence. East Asian wide and
//! fullwidth characters take two cells, combining marks add nothing.
//! Control characters (including `\n` and `\t`) take no cells; widgets
//! handle them before printing.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells taken by a single grapheme cluster.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    match grapheme.chars().next() {
        None => 0,
        Some(c) if c.is_control() => 0,
        Some(_) if grapheme.is_ascii() => grapheme.len(),
        Some(_) => grapheme.width(),
    }
}

/// Cells taken by `text`, cluster by cluster.
pub fn string_width(text: &str) -> usize {
    if text.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        return text.len();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// One grapheme cluster with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster<'a> {
    /// Byte offset of the cluster in the text it came from.
    pub start: usize,
    pub text: &'a str,
    /// Display width in cells.
    pub width: usize,
}

impl Cluster<'_> {
    /// Byte offset just past the cluster.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// True for `\n` and `\r\n`.
    #[inline]
    pub fn is_newline(&self) -> bool {
        self.text == "\n" || self.text == "\r\n"
    }
}

/// Grapheme clusters of `text` in order.
pub fn clusters(text: &str) -> impl Iterator<Item = Cluster<'_>> {
    text.grapheme_indices(true).map(|(start, text)| Cluster {
        start,
        text,
        width: grapheme_width(text),
    })
}
