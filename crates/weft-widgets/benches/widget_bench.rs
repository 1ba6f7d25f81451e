//! Benchmarks for drawing widgets.
//!
//! Run with: cargo bench -p weft-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use weft_core::geometry::Rect;
use weft_render::Buffer;
use weft_widgets::{Block, Flex, Primitive, PrimitiveRef, Table, TextView};

// ============================================================================
// Block
// ============================================================================

fn bench_block_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("widget/block");

    let bordered = Block::new();
    bordered.set_border(true);
    bordered.set_title("[yellow]Title");

    for (w, h) in [(40, 10), (80, 24), (200, 60)] {
        let mut grid = Buffer::new(w, h);
        bordered.set_rect(Rect::from_size(w, h));
        group.bench_with_input(
            BenchmarkId::new("bordered", format!("{w}x{h}")),
            &(),
            |b, _| {
                b.iter(|| {
                    grid.clear();
                    bordered.draw(&mut grid);
                    black_box(&grid);
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// TextView
// ============================================================================

fn log_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("[green]{i:>5}[-] The quick brown fox jumps over the lazy dog.\n"))
        .collect()
}

fn bench_text_view_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("widget/text_view");

    for lines in [100, 1_000, 10_000] {
        let view = TextView::new();
        view.set_text(log_text(lines));
        view.set_rect(Rect::from_size(60, 24));
        let mut grid = Buffer::new(60, 24);

        group.bench_with_input(BenchmarkId::new("wrapped", lines), &(), |b, _| {
            b.iter(|| {
                view.draw(&mut grid);
                black_box(&grid);
            })
        });

        view.set_wrap(false);
        view.scroll_to_end();
        group.bench_with_input(BenchmarkId::new("unwrapped_end", lines), &(), |b, _| {
            b.iter(|| {
                view.draw(&mut grid);
                black_box(&grid);
            })
        });
    }

    group.finish();
}

// ============================================================================
// Table
// ============================================================================

fn make_table(rows: usize, columns: usize) -> std::sync::Arc<Table> {
    let table = Table::new();
    for r in 0..rows {
        for c in 0..columns {
            table.set_cell_text(r, c, format!("cell {r}/{c}"));
        }
    }
    table.set_fixed(1, 1);
    table
}

fn bench_table_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("widget/table");

    for rows in [10, 100, 1_000] {
        let table = make_table(rows, 8);
        table.set_rect(Rect::from_size(80, 24));
        let mut grid = Buffer::new(80, 24);

        group.bench_with_input(BenchmarkId::new("plain", rows), &(), |b, _| {
            b.iter(|| {
                table.draw(&mut grid);
                black_box(&grid);
            })
        });

        table.set_borders(true);
        table.set_selectable(true, false);
        table.select(rows / 2, 0);
        group.bench_with_input(BenchmarkId::new("bordered_selected", rows), &(), |b, _| {
            b.iter(|| {
                table.draw(&mut grid);
                black_box(&grid);
            })
        });
    }

    group.finish();
}

// ============================================================================
// Flex
// ============================================================================

fn bench_flex_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("widget/flex");

    for children in [4, 16, 64] {
        let flex = Flex::new();
        for i in 0..children {
            let child: PrimitiveRef = Block::new();
            flex.add_item(Some(child), if i % 2 == 0 { 3 } else { 0 }, 1, false);
        }
        flex.set_rect(Rect::from_size(200, 60));
        let mut grid = Buffer::new(200, 60);

        group.bench_with_input(BenchmarkId::new("children", children), &(), |b, _| {
            b.iter(|| {
                flex.draw(&mut grid);
                black_box(&grid);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_block_draw,
    bench_text_view_draw,
    bench_table_draw,
    bench_flex_draw,
);

criterion_main!(benches);
