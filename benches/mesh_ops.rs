//! Benchmarks for subdivision operations.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point2;
use sightmesh::algo::{
    compute_visibility_with_options, merge_faces, seed_partitions, VisibilityOptions,
};
use sightmesh::prelude::*;

/// Staircase with `steps` unit steps, corner at the origin.
fn staircase(steps: usize) -> Vec<Point2<f64>> {
    let n = steps as f64;
    let mut vertices = vec![Point2::new(0.0, 0.0), Point2::new(n, 0.0)];
    for i in (1..steps).rev() {
        let i = i as f64;
        vertices.push(Point2::new(i + 1.0, n - i));
        vertices.push(Point2::new(i, n - i));
    }
    vertices.push(Point2::new(1.0, n));
    vertices.push(Point2::new(0.0, n));
    vertices
}

/// Horizontal and vertical grid lines of a staircase, clipped to it.
fn staircase_grid(steps: usize) -> Vec<(Point2<f64>, Point2<f64>)> {
    let n = steps as f64;
    (1..steps)
        .flat_map(|i| {
            let c = i as f64;
            let reach = n - c;
            [
                (Point2::new(0.0, c), Point2::new(reach, c)),
                (Point2::new(c, 0.0), Point2::new(c, reach)),
            ]
        })
        .collect()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let vertices = staircase(20);
    c.bench_function("build_staircase_20", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build_from_polygon(&vertices).unwrap();
            mesh
        });
    });
}

fn bench_chord_insertion(c: &mut Criterion) {
    let vertices = staircase(20);
    let grid = staircase_grid(20);
    let base = build_from_polygon(&vertices).unwrap();

    c.bench_function("seed_grid_staircase_20", |b| {
        b.iter(|| {
            let mut mesh = base.clone();
            seed_partitions(&mut mesh, &grid).unwrap();
            mesh
        });
    });
}

fn bench_visibility(c: &mut Criterion) {
    let vertices = staircase(10);
    let grid = staircase_grid(10);
    let mut base = build_from_polygon(&vertices).unwrap();
    seed_partitions(&mut base, &grid).unwrap();
    let guard = Point2::new(10.0, 0.0);
    let options = VisibilityOptions::default().with_skip_invalid_chords(true);

    c.bench_function("visibility_and_merge_staircase_10", |b| {
        b.iter(|| {
            let mut mesh = base.clone();
            compute_visibility_with_options(&mut mesh, guard, &options).unwrap();
            merge_faces(&mut mesh, guard, 2).unwrap()
        });
    });
}

criterion_group!(benches, bench_mesh_construction, bench_chord_insertion, bench_visibility);
criterion_main!(benches);
