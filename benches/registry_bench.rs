// ABOUTME: Criterion benchmarks for registry mutations, listings and console commands
// ABOUTME: Measures set/list/snapshot latency and command interpretation throughput
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! Criterion benchmarks for the tweak registry.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::sync::mpsc;
use tweakkit::command::CommandInterpreter;
use tweakkit::session::SessionTable;
use tweakkit::{Constraints, EventSource, Registry, Tweak};

const REGISTRY_SIZES: [usize; 3] = [10, 100, 1_000];

fn populated_registry(size: usize) -> Registry {
    let registry = Registry::new();
    for index in 0..size {
        Tweak::new(format!("group{}.tweak{index}", index % 10), 0_i64)
            .with_constraints(Constraints::new().range(0, 1_000_000).step(1))
            .register(&registry);
    }
    registry
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_set");
    group.throughput(Throughput::Elements(1));

    let registry = populated_registry(100);
    let mut value: i64 = 0;
    group.bench_function("string_set", |b| {
        b.iter(|| {
            value = (value + 1) % 1_000_000;
            registry
                .set(black_box("group3.tweak3"), &value.to_string(), EventSource::Code)
                .unwrap()
        });
    });

    let typed = Tweak::new("typed", 0.0_f64).register(&registry);
    let mut real = 0.0;
    group.bench_function("typed_set", |b| {
        b.iter(|| {
            real += 0.25;
            typed.set(black_box(real), EventSource::Code).unwrap();
        });
    });

    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_list");
    for size in REGISTRY_SIZES {
        let registry = populated_registry(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("filtered", size), &registry, |b, r| {
            b.iter(|| r.list(black_box(Some("GROUP7"))));
        });
        group.bench_with_input(BenchmarkId::new("snapshot", size), &registry, |b, r| {
            b.iter(|| r.snapshot(None));
        });
    }
    group.finish();
}

fn bench_console(c: &mut Criterion) {
    let mut group = c.benchmark_group("console");
    let registry = populated_registry(100);
    let sessions = SessionTable::new();
    sessions.attach(&registry);

    // Watching sessions make every set pay for a broadcast
    let mut receivers = Vec::new();
    for _ in 0..16 {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = sessions.connect(tx);
        sessions.watch(id, None);
        receivers.push(rx);
    }
    let (tx, _rx) = mpsc::unbounded_channel();
    let session = sessions.connect(tx);
    let interpreter = CommandInterpreter::new(registry, sessions);

    group.bench_function("get", |b| {
        b.iter(|| interpreter.respond(session, black_box("get group1.tweak21")));
    });

    let mut value: i64 = 0;
    group.bench_function("set_with_16_watchers", |b| {
        b.iter(|| {
            value = (value + 1) % 1_000_000;
            let response = interpreter.respond(session, &format!("set group1.tweak1 {value}"));
            for rx in &mut receivers {
                while rx.try_recv().is_ok() {}
            }
            response
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_list, bench_console);
criterion_main!(benches);
