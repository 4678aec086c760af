use avl_ost::AvlTree;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;

const N: usize = 10_000;
const QUERIES: usize = 1_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

/// Closed query windows over the value range of `random_keys`, narrow and wide mixed.
fn query_windows(n: usize) -> Vec<(i64, i64)> {
    random_keys(2 * n).chunks_exact(2).map(|pair| (pair[0].min(pair[1]), pair[0].max(pair[1]))).collect()
}

// ─── Insert Benchmarks ──────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("AvlTree", keys.len()), |b| {
        b.iter(|| {
            let mut tree = AvlTree::new();
            for &k in keys {
                tree.insert(k);
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", keys.len()), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_reverse(c: &mut Criterion) {
    bench_insert(c, "insert_reverse", &reverse_ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

// ─── Range Count Benchmarks ─────────────────────────────────────────────────

fn bench_range_count(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: AvlTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();
    let windows = query_windows(QUERIES);

    let mut group = c.benchmark_group("range_count_random");

    group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
        b.iter(|| windows.iter().map(|(lo, hi)| tree.range_count(lo, hi)).sum::<usize>());
    });

    // BTreeSet has no order statistics, so counting walks the range.
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| windows.iter().map(|&(lo, hi)| set.range(lo..=hi).count()).sum::<usize>());
    });

    group.finish();
}

fn bench_get_by_rank(c: &mut Criterion) {
    let tree: AvlTree<i64> = random_keys(N).into_iter().collect();
    let ranks: Vec<usize> = random_keys(QUERIES).into_iter().map(|k| k as usize % tree.len()).collect();

    let mut group = c.benchmark_group("get_by_rank_random");

    group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
        b.iter(|| ranks.iter().filter_map(|&rank| tree.get_by_rank(rank)).sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("AvlTree::iter().nth", N), |b| {
        b.iter(|| ranks.iter().filter_map(|&rank| tree.iter().nth(rank)).sum::<i64>());
    });

    group.finish();
}

criterion_group!(insert_benches, bench_insert_ordered, bench_insert_reverse, bench_insert_random,);

criterion_group!(query_benches, bench_range_count, bench_get_by_rank,);

criterion_main!(insert_benches, query_benches);
