// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_octree::{Aabb3D, Octree, OctreeConfig};

type Entry = (Aabb3D<f64>, u32);

const WORLD: f64 = 1000.0;

fn world() -> Aabb3D<f64> {
    Aabb3D::new(0.0, 0.0, 0.0, WORLD, WORLD, WORLD)
}

fn gen_grid_boxes(n: usize, half: f64) -> Vec<Entry> {
    let cell = WORLD / n as f64;
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let c = [
                    (x as f64 + 0.5) * cell,
                    (y as f64 + 0.5) * cell,
                    (z as f64 + 0.5) * cell,
                ];
                out.push((Aabb3D::cube(c, half), out.len() as u32));
            }
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_boxes(count: usize, max_half: f64) -> Vec<Entry> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| {
            let c = [
                rng.next_f64() * WORLD,
                rng.next_f64() * WORLD,
                rng.next_f64() * WORLD,
            ];
            let h = [
                rng.next_f64() * max_half,
                rng.next_f64() * max_half,
                rng.next_f64() * max_half,
            ];
            (Aabb3D::from_center_half_extents(c, h), i as u32)
        })
        .collect()
}

fn gen_clustered_boxes(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Entry> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let center = [
            rng.next_f64() * WORLD,
            rng.next_f64() * WORLD,
            rng.next_f64() * WORLD,
        ];
        for _ in 0..per_cluster {
            let c = [
                (center[0] + (rng.next_f64() - 0.5) * spread).clamp(0.0, WORLD),
                (center[1] + (rng.next_f64() - 0.5) * spread).clamp(0.0, WORLD),
                (center[2] + (rng.next_f64() - 0.5) * spread).clamp(0.0, WORLD),
            ];
            out.push((Aabb3D::cube(c, 1.0), out.len() as u32));
        }
    }
    out
}

fn empty(max_entries: usize) -> Octree<Entry> {
    Octree::with_config(world(), OctreeConfig::new(1.5, max_entries))
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_build");
    for &n in &[10usize, 20] {
        let boxes = gen_grid_boxes(n, 5.0);
        group.throughput(Throughput::Elements(boxes.len() as u64));

        group.bench_function(format!("insert_each_grid_n{}", n), |b| {
            b.iter_batched(
                || boxes.clone(),
                |boxes| {
                    let t = boxes.into_iter().fold(empty(32), |t, e| t.insert(e));
                    black_box(t.size());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("insert_all_grid_n{}", n), |b| {
            b.iter_batched(
                || boxes.clone(),
                |boxes| {
                    let t = empty(32).insert_all(boxes);
                    black_box(t.size());
                },
                BatchSize::SmallInput,
            )
        });
    }

    let clustered = gen_clustered_boxes(20, 500, 40.0);
    group.throughput(Throughput::Elements(clustered.len() as u64));
    group.bench_function("insert_all_clustered", |b| {
        b.iter_batched(
            || clustered.clone(),
            |boxes| black_box(empty(32).insert_all(boxes).depth()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_query");
    let boxes = gen_random_boxes(20_000, 8.0);
    let queries: Vec<Aabb3D<f64>> = gen_random_boxes(256, 50.0)
        .into_iter()
        .map(|(b, _)| b)
        .collect();

    for &max_entries in &[8usize, 32, 128] {
        let tree = empty(max_entries).insert_all(boxes.iter().copied());
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(format!("select_random_max{}", max_entries), |b| {
            b.iter(|| {
                let hits: usize = queries.iter().map(|q| tree.select(q).len()).sum();
                black_box(hits);
            })
        });
        group.bench_function(format!("select_point_random_max{}", max_entries), |b| {
            b.iter(|| {
                let hits: usize = queries
                    .iter()
                    .map(|q| {
                        let [x, y, z] = q.center();
                        tree.select_point(x, y, z).len()
                    })
                    .sum();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_update");
    let boxes = gen_random_boxes(20_000, 8.0);
    let tree = empty(32).insert_all(boxes.iter().copied());
    let victims: Vec<Entry> = boxes.iter().step_by(97).copied().collect();
    group.throughput(Throughput::Elements(victims.len() as u64));

    group.bench_function("delete_reinsert_random", |b| {
        b.iter(|| {
            let mut t = tree.clone();
            for v in &victims {
                t = t.delete(v).insert(*v);
            }
            black_box(t.size());
        })
    });

    // Snapshots cost only the rebuilt path; keeping all of them alive is cheap.
    group.bench_function("insert_keep_snapshots", |b| {
        b.iter(|| {
            let mut versions = Vec::with_capacity(victims.len());
            let mut t = tree.clone();
            for (i, v) in victims.iter().enumerate() {
                t = t.insert((v.0, 1_000_000 + i as u32));
                versions.push(t.clone());
            }
            black_box(versions.len());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_update);
criterion_main!(benches);
