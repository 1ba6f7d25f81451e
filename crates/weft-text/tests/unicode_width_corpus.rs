//! Unicode width corpus.
//!
//! Widths the printer and the wrapper rely on, by category:
//! - ASCII (width 1)
//! - CJK ideographs and fullwidth forms (width 2)
//! - Combining sequences (width of the base)
//! - Emoji (width 2)
//! - Controls (width 0)

use weft_text::{clusters, grapheme_width, string_width, tagged_width};

// =============================================================================
// Corpus
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct WidthCase {
    input: &'static str,
    description: &'static str,
    width: usize,
    clusters: usize,
}

const fn case(input: &'static str, description: &'static str, width: usize, clusters: usize) -> WidthCase {
    WidthCase {
        input,
        description,
        width,
        clusters,
    }
}

const CORPUS: &[WidthCase] = &[
    case("a", "ascii letter", 1, 1),
    case("Hello, World!", "ascii sentence", 13, 13),
    case("中", "cjk ideograph", 2, 1),
    case("中文字", "cjk run", 6, 3),
    case("ｶ", "halfwidth katakana", 1, 1),
    case("Ａ", "fullwidth latin", 2, 1),
    case("한글", "hangul syllables", 4, 2),
    case("e\u{0301}", "e + combining acute", 1, 1),
    case("a\u{0300}\u{0301}\u{0302}", "stacked combining marks", 1, 1),
    case("\u{1F600}", "emoji", 2, 1),
    case("\t", "tab", 0, 1),
    case("\n", "newline", 0, 1),
    case("\r\n", "crlf", 0, 1),
    case("\x1b", "escape", 0, 1),
    case("a中b", "mixed", 4, 3),
];

// =============================================================================
// Tests
// =============================================================================

#[test]
fn corpus_widths() {
    for c in CORPUS {
        assert_eq!(
            string_width(c.input),
            c.width,
            "{} ({:?})",
            c.description,
            c.input
        );
    }
}

#[test]
fn corpus_cluster_counts() {
    for c in CORPUS {
        assert_eq!(
            clusters(c.input).count(),
            c.clusters,
            "{} ({:?})",
            c.description,
            c.input
        );
    }
}

#[test]
fn single_clusters_match_string_width() {
    for c in CORPUS.iter().filter(|c| c.clusters == 1) {
        assert_eq!(grapheme_width(c.input), c.width, "{}", c.description);
    }
}

#[test]
fn tags_do_not_change_corpus_widths() {
    for c in CORPUS {
        let tagged = format!("[red]{}[-:-:-]", c.input);
        assert_eq!(tagged_width(&tagged), c.width, "{}", c.description);
    }
}
