// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_locate::oracles::{GridOracle, PointSet};
use understory_locate::{Coordinate, Locator, Oracle, SearchConfig, Split, Traversal};

fn gen_targets(n: usize, seed: u64) -> Vec<Coordinate> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Coordinate::new(
                rng.random_range(-179.0..179.0),
                rng.random_range(-179.0..179.0),
            )
        })
        .collect()
}

fn run<O: Oracle>(locator: &Locator<O>, limit: Option<usize>) -> usize {
    locator
        .search(limit)
        .map(|outcome| outcome.hits.len())
        .unwrap_or(0)
}

fn bench_splits(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    for &n in &[5_usize, 50, 500] {
        let targets = gen_targets(n, 0x5EED_0001);
        group.throughput(Throughput::Elements(n as u64));
        for split in [Split::Quadrisect, Split::Bisect] {
            let config = SearchConfig::default().with_split(split);
            let locator = Locator::with_config(PointSet::from_iter(targets.iter().copied()), config);
            group.bench_function(format!("{split:?}_find_all_n{n}"), |b| {
                b.iter(|| black_box(run(&locator, None)));
            });
        }
    }
    group.finish();
}

fn bench_traversals(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    let targets = gen_targets(50, 0x5EED_0002);
    for traversal in [Traversal::Recursive, Traversal::Worklist] {
        let config = SearchConfig::default().with_traversal(traversal);
        let locator = Locator::with_config(PointSet::from_iter(targets.iter().copied()), config);
        group.bench_function(format!("{traversal:?}_find_all"), |b| {
            b.iter(|| black_box(run(&locator, None)));
        });
    }
    #[cfg(feature = "parallel")]
    {
        let locator = Locator::new(PointSet::from_iter(targets.iter().copied()));
        group.bench_function("parallel_find_all", |b| {
            b.iter(|| black_box(locator.par_find_all().map(|h| h.len()).unwrap_or(0)));
        });
    }
    group.finish();
}

fn bench_oracles(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");
    for &n in &[50_usize, 2_000] {
        let targets = gen_targets(n, 0x5EED_0003);
        let linear = Locator::new(PointSet::from_iter(targets.iter().copied()));
        let grid = Locator::new(GridOracle::from_targets(4.0, targets.iter().copied()));
        group.bench_function(format!("point_set_first_k_n{n}"), |b| {
            b.iter(|| black_box(run(&linear, Some(10))));
        });
        group.bench_function(format!("grid_first_k_n{n}"), |b| {
            b.iter(|| black_box(run(&grid, Some(10))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_splits, bench_traversals, bench_oracles);
criterion_main!(benches);
