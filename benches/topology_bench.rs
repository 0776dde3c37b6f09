// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for shared-network edge derivation
//!
//! Derivation checks every pair of services, so cost grows with the square
//! of the service count. These groups track that curve for sparse and dense
//! network membership.
//!
//! ```bash
//! cargo bench --bench topology_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use indexmap::IndexMap;
use stackyard::compose::{NetworkDefinition, NetworksSpec, ServiceContainer, ServiceNode};
use stackyard::palette::NETWORK_COLORS;
use stackyard::topology::{derive_edges, NetworkTopology};

/// A document with `services` services spread over `networks` networks,
/// each service joining `per_service` of them
fn generate_document(services: usize, networks: usize, per_service: usize) -> ServiceContainer {
    let mut doc = ServiceContainer::named("bench");
    let defs: IndexMap<String, NetworkDefinition> = (0..networks)
        .map(|i| {
            let def = NetworkDefinition {
                color: Some(NETWORK_COLORS[i % NETWORK_COLORS.len()].to_string()),
                ..NetworkDefinition::bridge()
            };
            (format!("net_{i}"), def)
        })
        .collect();
    doc.networks = Some(defs);

    for s in 0..services {
        let joined = (0..per_service)
            .map(|k| format!("net_{}", (s * 7 + k * 3) % networks))
            .collect();
        let node = ServiceNode {
            image: Some(format!("image_{s}:latest")),
            networks: Some(NetworksSpec::List(joined)),
            ..ServiceNode::default()
        };
        doc.services.insert(format!("service_{s}"), node);
    }
    doc
}

fn bench_derive_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_edges");

    for size in [10, 50, 100, 250] {
        for (label, networks, per_service) in [("sparse", 20, 1), ("dense", 5, 3)] {
            let doc = generate_document(size, networks, per_service);
            group.throughput(Throughput::Elements((size * (size - 1) / 2) as u64));
            group.bench_with_input(BenchmarkId::new(label, size), &doc, |b, doc| {
                b.iter(|| derive_edges(black_box(&doc.services), black_box(doc.networks.as_ref())));
            });
        }
    }

    group.finish();
}

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology");

    for size in [50, 250] {
        let doc = generate_document(size, 10, 2);
        group.bench_with_input(BenchmarkId::new("build", size), &doc, |b, doc| {
            b.iter(|| NetworkTopology::from_container(black_box(doc)));
        });

        let topology = NetworkTopology::from_container(&doc);
        group.bench_with_input(BenchmarkId::new("to_dot", size), &topology, |b, t| {
            b.iter(|| black_box(t.to_dot()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_derive_edges, bench_topology);
criterion_main!(benches);
