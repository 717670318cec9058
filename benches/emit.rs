use criterion::{Criterion, criterion_group, criterion_main};
use frontmatter_builder::models::{FontSelection, Snapshot, StyleFlag};
use frontmatter_builder::{StateManager, emit};
use std::hint::black_box;

fn full_snapshot() -> Snapshot {
    Snapshot {
        title: "O'Brien's Thesis".into(),
        subtitle: "A Study".into(),
        date: "2024-05-01".into(),
        authors: vec!["B".into(), "A".into(), "C".into()],
        documentclass: "book".into(),
        twocolumn: true,
        oneside: true,
        toc_title: "Contents".into(),
        toc_depth: "3".into(),
        links_as_notes: true,
        style: StyleFlag::ALL.into_iter().collect(),
        fonts: FontSelection {
            main: "EB Garamond".into(),
            sans: "Inter".into(),
            mono: "DejaVu Sans Mono".into(),
        },
        fallback_standard: true,
        fallback_cjk: true,
        ..Snapshot::default()
    }
}

fn bench_emit(c: &mut Criterion) {
    let default = Snapshot::default();
    c.bench_function("emit_default", |b| b.iter(|| emit(black_box(&default))));

    let full = full_snapshot();
    c.bench_function("emit_full", |b| b.iter(|| emit(black_box(&full))));
}

fn bench_edit(c: &mut Criterion) {
    let state = StateManager::new();
    c.bench_function("toggle_and_reemit", |b| {
        b.iter(|| state.toggle(black_box("microtype")))
    });
}

criterion_group!(benches, bench_emit, bench_edit);
criterion_main!(benches);
