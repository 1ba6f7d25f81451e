#![forbid(unsafe_code)]

//! Word wrapping of tagged text.
//!
//! Break candidates are found in the stripped text: after a punctuation
//! mark (`, . - : ; ! ? & # +`) and before a run of blanks. A line that
//! would grow past the width is cut at the last candidate inside it, or
//! right before the offending cluster if there is none. Blanks at a break
//! belong to neither line. `\n` always breaks.
//!
//! Lines are reported as ranges of the tagged source so that they keep
//! their tags.
//!
//! ```
//! use weft_text::word_wrap;
//!
//! let lines = word_wrap("[red]Hello, [-]wide world", 7);
//! assert_eq!(lines, vec!["[red]Hello,", "[-]wide", "world"]);
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::tags::{Decomposed, StyleState, Tag, TagOptions, decompose};
use crate::width::{clusters, string_width};

static BREAK_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(([,.:;!?&#+-]|\n)[ \t\f\r]*|([ \t\f\r]+))").expect("break pattern is valid")
});

/// One wrapped line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    /// The line in the tagged source.
    pub source: Range<usize>,
    /// The line in the stripped text.
    pub stripped: Range<usize>,
    /// Display width.
    pub width: usize,
    /// Style and region in effect where the line starts, including tags
    /// dropped with the blanks of the preceding break.
    pub state: StyleState,
}

#[derive(Debug, Clone, Copy)]
struct Break {
    /// End of the line if broken here.
    end: usize,
    /// Start of the following line.
    next: usize,
}

/// Wrap tagged `text` to `width` cells, returning source substrings.
pub fn word_wrap(text: &str, width: usize) -> Vec<&str> {
    let decomposed = decompose(text, TagOptions::default());
    wrap_decomposed(&decomposed, width)
        .into_iter()
        .map(|line| &text[line.source])
        .collect()
}

/// Wrap decomposed text to `width` cells.
///
/// Empty text has no lines. A cluster wider than `width` gets a line of
/// its own.
pub fn wrap_decomposed(text: &Decomposed<'_>, width: usize) -> Vec<WrappedLine> {
    let stripped = text.stripped();
    let candidates = break_candidates(text);

    let mut bounds: Vec<(usize, usize)> = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0;
    for cluster in clusters(stripped) {
        if cluster.start < line_start {
            continue;
        }
        if cluster.is_newline() {
            bounds.push((line_start, cluster.start));
            line_start = cluster.end();
            line_width = 0;
            continue;
        }
        if line_width > 0 && line_width + cluster.width > width {
            let earlier = &candidates[..candidates.partition_point(|b| b.end <= cluster.start)];
            match earlier.last().filter(|b| b.end > line_start) {
                Some(candidate) => {
                    bounds.push((line_start, candidate.end));
                    line_start = candidate.next;
                    if cluster.start < line_start {
                        line_width = 0;
                        continue;
                    }
                    line_width = string_width(&stripped[line_start..cluster.start]);
                    if line_width > 0 && line_width + cluster.width > width {
                        bounds.push((line_start, cluster.start));
                        line_start = cluster.start;
                        line_width = 0;
                    }
                }
                None => {
                    bounds.push((line_start, cluster.start));
                    line_start = cluster.start;
                    line_width = 0;
                }
            }
        }
        line_width += cluster.width;
    }
    if line_start < stripped.len() {
        bounds.push((line_start, stripped.len()));
    }

    trace!(lines = bounds.len(), width, "wrapped text");
    let source_len = text.source().len();
    bounds
        .into_iter()
        .map(|(start, end)| {
            let source_end = if end == stripped.len() {
                source_len
            } else {
                text.source_offset(end)
            };
            WrappedLine {
                source: text.source_offset(start)..source_end,
                stripped: start..end,
                width: string_width(&stripped[start..end]),
                state: text.state_at(start),
            }
        })
        .collect()
}

/// Candidates in order, except newlines and breaks inside escaped tags.
fn break_candidates(text: &Decomposed<'_>) -> Vec<Break> {
    let stripped = text.stripped();
    let escaped: Vec<Range<usize>> = text.tags().iter().filter_map(Tag::escaped_span).collect();
    let inside_escape =
        |pos: usize| escaped.iter().any(|span| span.start < pos && pos < span.end);

    BREAK_CANDIDATE
        .captures_iter(stripped)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let end = match caps.get(2) {
                Some(mark) if mark.as_str() == "\n" => return None,
                Some(mark) => mark.end(),
                None => whole.start(),
            };
            let next = skip_newline(stripped, whole.end());
            (!inside_escape(end) && !inside_escape(next)).then_some(Break { end, next })
        })
        .collect()
}

/// Blanks right before a newline take the newline with them.
fn skip_newline(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    if rest.starts_with("\r\n") {
        pos + 2
    } else if rest.starts_with('\n') {
        pos + 1
    } else {
        pos
    }
}
