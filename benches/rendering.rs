//! Benchmarks for markdown rendering and preview flattening.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markpad::render::{RenderOptions, render};
use markpad::ui::preview::preview_lines;
use markpad::ui::style::Theme;
use markpad::words::count_words;

fn bench_render(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");
    let options = RenderOptions::default();

    c.bench_function("render", |b| b.iter(|| render(black_box(md), &options)));
}

fn bench_preview_lines(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");
    let root = render(md, &RenderOptions::default());
    let theme = Theme::default();

    c.bench_function("preview_lines", |b| {
        b.iter(|| preview_lines(&root, black_box(80), &theme))
    });
}

fn bench_word_count(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md").repeat(20);

    c.bench_function("word_count", |b| b.iter(|| count_words(black_box(&md))));
}

criterion_group!(benches, bench_render, bench_preview_lines, bench_word_count);
criterion_main!(benches);
