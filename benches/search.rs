//! Benchmarks for the brick placement engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use brickbox::cache::distinct_orientations;
use brickbox::search::{find_placements, SearchOptions};
use brickbox::{place_demo, VoxelGrid};

fn demo_grid() -> VoxelGrid {
    let mut grid = VoxelGrid::new(6);
    place_demo(&mut grid);
    grid
}

/// Benchmark building a grid, including all template caches.
fn bench_new_grid(c: &mut Criterion) {
    c.bench_function("new_grid_6", |b| b.iter(|| VoxelGrid::new(black_box(6))));
}

/// Benchmark deduplicating the orientations of one template.
fn bench_orientations(c: &mut Criterion) {
    let grid = VoxelGrid::new(6);
    let l = grid.template("L").cloned().expect("L template");
    c.bench_function("distinct_orientations", |b| {
        b.iter(|| distinct_orientations(black_box(&l)))
    });
}

/// Benchmark the exhaustive search with and without adjacency filters.
fn bench_find_placements(c: &mut Criterion) {
    let grid = demo_grid();
    let t = grid.template("T").cloned().expect("T template");

    let mut group = c.benchmark_group("find_placements");
    group.bench_function("anywhere", |b| {
        b.iter(|| find_placements(&grid, black_box(&t), SearchOptions::anywhere(), None))
    });
    group.bench_function("between", |b| {
        b.iter(|| find_placements(&grid, black_box(&t), SearchOptions::between(2), None))
    });
    group.finish();
}

/// Benchmark the cached feasibility queries.
fn bench_cached_queries(c: &mut Criterion) {
    let grid = demo_grid();
    let t = grid.template("T").cloned().expect("T template");

    c.bench_function("validate_placements", |b| {
        b.iter(|| grid.validate_placements(black_box(&t)))
    });
    c.bench_function("cannot_place_somewhere", |b| {
        b.iter(|| grid.cannot_place_somewhere(black_box(&t)))
    });
}

/// Benchmark formatting the grid for display.
fn bench_format_grid(c: &mut Criterion) {
    let grid = demo_grid();
    c.bench_function("format_grid", |b| b.iter(|| black_box(&grid).format_grid()));
}

criterion_group!(
    benches,
    bench_new_grid,
    bench_orientations,
    bench_find_placements,
    bench_cached_queries,
    bench_format_grid
);
criterion_main!(benches);
