use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use radix_trie::{Prefix, Trie};

fn grid_prefixes(n: u16) -> Vec<Prefix> {
    (0..n)
        .map(|i| {
            let text = format!("10.{}.{}.0/24", i / 256, i % 256);
            Prefix::parse(&text).unwrap()
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in [100u16, 1_000, 10_000] {
        let prefixes = grid_prefixes(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("add", size), &prefixes, |b, prefixes| {
            b.iter(|| {
                let mut trie = Trie::new();
                for p in prefixes {
                    trie.add(black_box(p)).unwrap();
                }
                black_box(trie.len())
            });
        });
    }
    group.finish();
}

fn bench_search_best(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_best");
    let prefixes = grid_prefixes(10_000);
    let mut trie = Trie::new();
    for p in &prefixes {
        trie.add(p).unwrap();
    }
    group.throughput(Throughput::Elements(prefixes.len() as u64));
    group.bench_function("covering_lookup", |b| {
        b.iter(|| {
            for p in &prefixes {
                black_box(trie.search_best(black_box(p)));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_search_best);
criterion_main!(benches);
