#![allow(unused)]
extern crate realmscope;

use criterion::{criterion_group, criterion_main, Criterion};
use realmscope::prelude::*;
use std::{hint::black_box, sync::Arc};

fn world_with_chain(depth: usize) -> (World, RealmRc) {
    let world = World::new();

    let root = world.new_realm("realm-0", Arc::new(SelfFirst)).unwrap();
    let mut units = MemoryLocation::new("root-units");
    units.insert_unit("com.acme.Widget", vec![0xCA; 64]);
    root.append_location(Arc::new(units));

    let mut leaf_id = "realm-0".to_string();
    for i in 1..=depth {
        let id = format!("realm-{i}");
        world.new_realm(&id, Arc::new(SelfFirst)).unwrap();
        world.set_parent(&id, &leaf_id).unwrap();
        leaf_id = id;
    }

    let leaf = world.realm(&leaf_id).unwrap();
    (world, leaf)
}

/// Benchmark the cached self-load hit, the hot path of steady-state resolution.
fn bench_cached_hit(c: &mut Criterion) {
    let world = World::new();
    let realm = world.new_realm("app", Arc::new(SelfFirst)).unwrap();
    let mut units = MemoryLocation::new("units");
    units.insert_unit("com.acme.Widget", vec![0xCA; 64]);
    realm.append_location(Arc::new(units));
    realm.resolve_unit("com.acme.Widget").unwrap();

    c.bench_function("resolve_cached_hit", |b| {
        b.iter(|| {
            let unit = realm.resolve_unit(black_box("com.acme.Widget")).unwrap();
            black_box(unit)
        });
    });
}

/// Benchmark resolution that walks a parent chain before hitting the definition.
fn bench_parent_chain(c: &mut Criterion) {
    let (_world, leaf) = world_with_chain(8);
    leaf.resolve_unit("com.acme.Widget").unwrap();

    c.bench_function("resolve_parent_chain_8", |b| {
        b.iter(|| {
            let unit = leaf.resolve_unit(black_box("com.acme.Widget")).unwrap();
            black_box(unit)
        });
    });
}

/// Benchmark a full miss, which exhausts every source on every call.
fn bench_miss(c: &mut Criterion) {
    let (_world, leaf) = world_with_chain(8);

    c.bench_function("resolve_miss_chain_8", |b| {
        b.iter(|| {
            let result = leaf.resolve_unit(black_box("com.acme.Missing"));
            black_box(result.is_err())
        });
    });
}

criterion_group!(benches, bench_cached_hit, bench_parent_chain, bench_miss);
criterion_main!(benches);
