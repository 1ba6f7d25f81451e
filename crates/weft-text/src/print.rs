#![forbid(unsafe_code)]

//! Printing tagged text into a cell grid.
//!
//! Every alignment is reduced to a left-to-right print of a window of
//! grapheme clusters:
//!
//! - left: clusters are taken while they fit;
//! - right: leading clusters are dropped until the rest fits, then the
//!   rest is pushed against the right edge;
//! - center: short text is padded on the left, long text loses clusters
//!   from both ends in turn, starting on the right.
//!
//! Tags in dropped leading clusters still apply, so the first printed cell
//! has the style it would have had in a full print.

use smallvec::SmallVec;
use tracing::trace;
use weft_layout::Alignment;
use weft_render::{CellGrid, CellStyle, PackedRgba, StyleFlags};

use crate::tags::{Decomposed, StyleState, TagOptions, decompose};
use crate::width::{Cluster, clusters};

/// Where and how to print.
#[derive(Debug, Clone)]
pub struct PrintOptions<'a> {
    pub x: u16,
    pub y: u16,
    /// Cells available to the right of `x`.
    pub max_width: u16,
    pub align: Alignment,
    /// Base style; tags with `-` fall back to it.
    pub style: CellStyle,
    pub tags: TagOptions,
    /// Written over the last printed cell when text is cut on the right.
    pub ellipsis: Option<char>,
    /// State carried over from earlier text, e.g. previous wrapped lines.
    pub state: StyleState,
    /// Regions drawn reversed.
    pub highlighted: &'a [String],
}

impl<'a> PrintOptions<'a> {
    pub fn new(x: u16, y: u16, max_width: u16) -> Self {
        Self {
            x,
            y,
            max_width,
            align: Alignment::Left,
            style: CellStyle::default(),
            tags: TagOptions::default(),
            ellipsis: None,
            state: StyleState::default(),
            highlighted: &[],
        }
    }

    #[must_use]
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: TagOptions) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: char) -> Self {
        self.ellipsis = Some(ellipsis);
        self
    }

    #[must_use]
    pub fn state(mut self, state: StyleState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn highlighted(mut self, regions: &'a [String]) -> Self {
        self.highlighted = regions;
        self
    }
}

/// Result of a print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Printed {
    /// Source bytes up to the end of the printed part.
    pub bytes: usize,
    /// Cells written, not counting alignment padding.
    pub width: usize,
}

/// Print tagged `text` with `options`.
pub fn print(grid: &mut dyn CellGrid, text: &str, options: &PrintOptions<'_>) -> Printed {
    let decomposed = decompose(text, options.tags);
    print_decomposed(grid, &decomposed, options)
}

/// Print `text` at `(x, y)` up to the right edge of the grid.
pub fn print_simple(grid: &mut dyn CellGrid, text: &str, x: u16, y: u16) -> Printed {
    let max_width = grid.size().0.saturating_sub(x);
    print(grid, text, &PrintOptions::new(x, y, max_width))
}

/// Print already decomposed text. `options.tags` is ignored.
pub fn print_decomposed(
    grid: &mut dyn CellGrid,
    text: &Decomposed<'_>,
    options: &PrintOptions<'_>,
) -> Printed {
    let all: Vec<Cluster<'_>> = clusters(text.stripped()).collect();
    let max_width = usize::from(options.max_width);
    let (first, last, pad) = visible_window(&all, text.width(), max_width, options.align);
    if first > 0 || last < all.len() {
        trace!(
            dropped_left = first,
            dropped_right = all.len() - last,
            max_width = options.max_width,
            "text truncated"
        );
    }

    let y = options.y;
    let tags = text.tags();
    let mut next_tag = 0;
    let mut state = options.state.clone();
    let mut x = usize::from(options.x) + pad;
    let mut printed = 0;
    let mut last_cell: Option<(u16, usize)> = None;
    for cluster in &all[first..last] {
        while let Some(tag) = tags.get(next_tag)
            && tag.position <= cluster.start
        {
            state.apply(&tag.kind);
            next_tag += 1;
        }
        if cluster.width == 0 {
            continue;
        }
        let Ok(lead) = u16::try_from(x) else {
            break;
        };
        let existing_bg = grid
            .content(lead, y)
            .map_or(PackedRgba::TRANSPARENT, |(_, style)| style.bg);
        let mut style = state.resolve(options.style, existing_bg);
        if let Some(region) = &state.region
            && options.highlighted.iter().any(|h| h == region)
        {
            style.attrs |= StyleFlags::REVERSE;
        }

        let mut chars = cluster.text.chars();
        let Some(main) = chars.next() else {
            continue;
        };
        let combining: SmallVec<[char; 4]> = chars.collect();
        grid.set_content(lead, y, main, &combining, style);
        for offset in 1..cluster.width {
            grid.set_content(lead.saturating_add(offset as u16), y, ' ', &[], style);
        }
        last_cell = Some((lead, cluster.width));
        x += cluster.width;
        printed += cluster.width;
    }

    if last < all.len()
        && let Some(ellipsis) = options.ellipsis
        && let Some((lead, width)) = last_cell
    {
        let tail = lead.saturating_add(width as u16 - 1);
        let style = grid.content(tail, y).map_or(options.style, |(_, style)| style);
        grid.set_content(tail, y, ellipsis, &[], style);
        if width > 1 {
            grid.set_content(lead, y, ' ', &[], style);
        }
    }

    let bytes = match all.get(last) {
        Some(cluster) => text.source_offset(cluster.start),
        None => text.source().len(),
    };
    Printed {
        bytes,
        width: printed,
    }
}

/// Clusters `first..last` to print and the padding in front of them.
fn visible_window(
    all: &[Cluster<'_>],
    total: usize,
    max: usize,
    align: Alignment,
) -> (usize, usize, usize) {
    match align {
        Alignment::Left => {
            let mut used = 0;
            let last = all
                .iter()
                .position(|cluster| {
                    used += cluster.width;
                    used > max
                })
                .unwrap_or(all.len());
            (0, last, 0)
        }
        Alignment::Right => {
            let (mut first, mut width) = (0, total);
            while width > max {
                width -= all[first].width;
                first += 1;
            }
            (first, all.len(), max - width)
        }
        Alignment::Center => {
            let (mut first, mut last, mut width) = (0, all.len(), total);
            let mut from_right = true;
            while width > max {
                if from_right {
                    last -= 1;
                    width -= all[last].width;
                } else {
                    width -= all[first].width;
                    first += 1;
                }
                from_right = !from_right;
            }
            (first, last, (max - width) / 2)
        }
    }
}
