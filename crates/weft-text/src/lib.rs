#![forbid(unsafe_code)]

//! Styled text for weft widgets.
//!
//! Text carries inline style tags in square brackets:
//!
//! - `[fg:bg:attrs]` changes colors and attributes. Colors are names or
//!   `#rrggbb`, `-` resets a channel to the caller's base style, and an
//!   empty field leaves it alone. Attribute letters are `l` blink, `b` bold,
//!   `d` dim, `i` italic, `r` reverse, `s` strikethrough, `u` underline.
//! - `["id"]` starts the region `id`; `[""]` ends it.
//! - `[red[]` prints a literal `[red]`. [`escape`] produces this form.
//! - `[]` is always literal.
//!
//! The crate is organized as:
//! - [`tags`]: splitting tagged text into plain text and tags
//! - [`width`]: grapheme cluster display widths
//! - [`print`]: writing tagged text into a [`CellGrid`](weft_render::CellGrid)
//! - [`wrap`]: word wrapping that keeps tags with their text
//!
//! # Example
//! ```
//! use weft_text::{strip_tags, tagged_width, word_wrap};
//!
//! assert_eq!(strip_tags("[red]Warning[white]!"), "Warning!");
//! assert_eq!(tagged_width("[::b]bold[::-] text"), 9);
//! assert_eq!(word_wrap("one two three", 7), vec!["one two", "three"]);
//! ```

pub mod print;
pub mod tags;
pub mod width;
pub mod wrap;

pub use print::{PrintOptions, Printed, print, print_decomposed, print_simple};
pub use tags::{
    Decomposed, StyleRun, StyleState, StyleTag, Tag, TagKind, TagOptions, TagValue, decompose,
    escape, strip_tags, tagged_width,
};
pub use width::{Cluster, clusters, grapheme_width, string_width};
pub use wrap::{WrappedLine, word_wrap, wrap_decomposed};
