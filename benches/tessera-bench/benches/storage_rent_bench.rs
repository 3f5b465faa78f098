//! Storage rent benchmarks.
//!
//! Measures:
//! - Per-node rent computation throughput
//! - Ledger settlement scaling with touched-key count
//! - Rollback-fee settlement (quadratic dedup check against the paying set)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera_bench::helpers::{make_ledger, random_node, rng};
use tessera_storage_rent::{policy, RentConfig};

const BLOCK_TIMESTAMP: u64 = 1_700_000_000_000;

// ---------------------------------------------------------------------------
// Per-node policy arithmetic
// ---------------------------------------------------------------------------

fn bench_node_rent_computation(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_rent/node");

    let config = RentConfig::default();
    let mut rng = rng();
    let nodes: Vec<_> = (0..1_000)
        .map(|_| random_node(&mut rng, BLOCK_TIMESTAMP))
        .collect();

    group.throughput(Throughput::Elements(nodes.len() as u64));
    group.bench_function("payable_rent_1k_nodes", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for node in &nodes {
                total =
                    total.saturating_add(node.payable_rent(&config, BLOCK_TIMESTAMP).unwrap());
            }
            total
        })
    });

    group.bench_function("updated_timestamp_1k_nodes", |b| {
        b.iter(|| {
            let mut last = 0u64;
            for node in &nodes {
                last = node.updated_rent_timestamp(&config, BLOCK_TIMESTAMP).unwrap();
            }
            last
        })
    });

    group.throughput(Throughput::Elements(1));
    group.bench_function("rent_due_formula", |b| {
        b.iter(|| policy::rent_due(65_536, 86_400_000, 1 << 21))
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Ledger settlement
// ---------------------------------------------------------------------------

fn bench_ledger_settlement(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_rent/settle");

    let config = RentConfig::default();
    for &n in &[100usize, 1_000, 10_000] {
        let mut rng = rng();
        let ledger = make_ledger(&mut rng, n, 0, BLOCK_TIMESTAMP);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("tracked_only", n), &ledger, |b, ledger| {
            b.iter(|| ledger.settle(&config, BLOCK_TIMESTAMP).unwrap())
        });
    }

    group.finish();
}

fn bench_rollback_settlement(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_rent/rollback");

    let config = RentConfig::default();
    for &n in &[100usize, 1_000] {
        let mut rng = rng();
        // Half the touches survive, half belong to reverted frames; each
        // reverted touch scans the paying set for the double-billing check.
        let ledger = make_ledger(&mut rng, n / 2, n / 2, BLOCK_TIMESTAMP);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("half_reverted", n), &ledger, |b, ledger| {
            b.iter(|| ledger.rollback_fee(&config, BLOCK_TIMESTAMP).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_node_rent_computation,
    bench_ledger_settlement,
    bench_rollback_settlement,
);
criterion_main!(benches);
