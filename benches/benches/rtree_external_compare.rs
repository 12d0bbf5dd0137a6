// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_octree::{Aabb3D, Octree};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Aabb3D<f64>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let min = [x as f64 * cell, y as f64 * cell, z as f64 * cell];
                out.push(Aabb3D::from_min_size(min, [cell; 3]));
            }
        }
    }
    out
}

fn to_rstar_rects(v: &[Aabb3D<f64>]) -> Vec<Rectangle<[f64; 3]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y, r.min_z], [r.max_x, r.max_y, r.max_z]))
        .collect()
}

fn bench_rtree_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_f64");
    for &n in &[16usize, 24] {
        let boxes = gen_grid_boxes(n, 10.0);
        let side = n as f64 * 10.0;
        let world = Aabb3D::new(0.0, 0.0, 0.0, side, side, side);
        let query = Aabb3D::from_min_size([40.0; 3], [60.0; 3]);
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("understory_build_query_n{}", n), |b| {
            b.iter_batched(
                || boxes.clone(),
                |boxes| {
                    let tree = Octree::new(world).insert_all(boxes);
                    black_box(tree.select(&query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&boxes),
                |rects| {
                    let tree = RTree::bulk_load(rects);
                    let aabb = AABB::from_corners(
                        [query.min_x, query.min_y, query.min_z],
                        [query.max_x, query.max_y, query.max_z],
                    );
                    black_box(tree.locate_in_envelope_intersecting(&aabb).count());
                },
                BatchSize::SmallInput,
            )
        });

        let tree = Octree::new(world).insert_all(boxes.iter().copied());
        let rtree = RTree::bulk_load(to_rstar_rects(&boxes));
        group.bench_function(format!("understory_query_n{}", n), |b| {
            b.iter(|| black_box(tree.select(&query).len()))
        });
        group.bench_function(format!("rstar_query_n{}", n), |b| {
            let aabb = AABB::from_corners(
                [query.min_x, query.min_y, query.min_z],
                [query.max_x, query.max_y, query.max_z],
            );
            b.iter(|| black_box(rtree.locate_in_envelope_intersecting(&aabb).count()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_f64);
criterion_main!(benches);
