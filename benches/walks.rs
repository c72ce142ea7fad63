//! Benchmarks for walk batches over a fixed network instance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sybilgauge::attack::RegionMap;
use sybilgauge::graph::SocialGraph;
use sybilgauge::walk::{escape_walk, tail_walk, RoutingTables};

/// Ring with random chords, roughly doubling the base degree.
fn chorded_ring(nodes: u32, chords: u32, seed: u64) -> SocialGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = SocialGraph::new();
    for i in 0..nodes {
        graph.add_edge(i, (i + 1) % nodes);
    }
    for _ in 0..chords {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        graph.add_edge(u, v);
    }
    graph
}

fn bench_tail_walks(c: &mut Criterion) {
    let graph = chorded_ring(10_000, 10_000, 3);
    let tables = RoutingTables::build(&graph, &mut StdRng::seed_from_u64(5));

    let mut group = c.benchmark_group("walks");
    for &hops in &[10usize, 40] {
        group.bench_with_input(BenchmarkId::new("tail_x100", hops), &hops, |b, &hops| {
            let mut rng = StdRng::seed_from_u64(9);
            b.iter(|| {
                for start in 0..100u32 {
                    black_box(tail_walk(&tables, start, hops, &mut rng).unwrap());
                }
            });
        });
    }

    // Escape mode pays an extra region lookup per hop.
    let regions = RegionMap::from_attackers(9_900..10_000u32);
    group.bench_function("escape_x100", |b| {
        let mut rng = StdRng::seed_from_u64(13);
        b.iter(|| {
            for start in 0..100u32 {
                black_box(escape_walk(&tables, &regions, start, 20, &mut rng).unwrap());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_tail_walks);
criterion_main!(benches);
