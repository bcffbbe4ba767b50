//! Performance benchmarks for documentation resolution
//!
//! Measures:
//! - Cold resolution of a deep inherit chain plus its cross-references
//! - Cache hits on an already resolved identity
//! - Catalog decoding from TOML
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use docweave_core::{
    catalog::{Catalog, MemberEntry, TypeEntry},
    identity::{DocKey, MemberKind},
};
use std::hint::black_box;

const CHAIN_LEN: usize = 48;

/// `Bench.T0` documents `Render`; every `Bench.T{i}` derives from `Bench.T{i-1}` and inherits it.
/// Each type's own doc links to the two types before it.
fn chain_catalog() -> Catalog {
    let mut catalog = Catalog::default();
    catalog
        .add_type(
            TypeEntry::new("Bench.T0")
                .doc("Root type.")
                .member(MemberEntry::new("Render", MemberKind::Method).doc("Renders the value.")),
        )
        .expect("root type registers");
    for i in 1..CHAIN_LEN {
        let back = i.saturating_sub(2);
        catalog
            .add_type(
                TypeEntry::new(format!("Bench.T{i}"))
                    .base(format!("Bench.T{}", i - 1))
                    .doc(format!(
                        "Level {i}, see <see cref=\"T:Bench.T{}\"/> and [earlier](cref:T{back}).",
                        i - 1
                    ))
                    .member(MemberEntry::new("Render", MemberKind::Method).doc("<inheritdoc/>")),
            )
            .expect("chain type registers");
    }
    catalog
}

fn catalog_toml() -> String {
    let mut content = String::from("[resolver]\nmax_depth = 128\n");
    for i in 0..CHAIN_LEN {
        content.push_str(&format!("\n[[types]]\nname = \"Bench.T{i}\"\n"));
        if i > 0 {
            content.push_str(&format!("base = \"Bench.T{}\"\n", i - 1));
        }
        content.push_str(&format!(
            "doc = \"Level {i}, see [previous](cref:T:Bench.T{}).\"\n",
            i.saturating_sub(1)
        ));
        content.push_str("\n[[types.members]]\nname = \"Render\"\nkind = \"method\"\ndoc = \"<inheritdoc/>\"\n");
    }
    content
}

fn bench_cold_resolution(c: &mut Criterion) {
    let catalog = chain_catalog();
    let leaf = DocKey::member(format!("Bench.T{}", CHAIN_LEN - 1), "Render", MemberKind::Method);
    let leaf_type = DocKey::of_type(format!("Bench.T{}", CHAIN_LEN - 1));

    c.bench_function("cold_member_chain", |b| {
        b.iter_batched(
            || catalog.clone().into_cache(),
            |cache| black_box(cache.resolve(&leaf).expect("chain resolves")),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("cold_type_with_references", |b| {
        b.iter_batched(
            || catalog.clone().into_cache(),
            |cache| black_box(cache.resolve(&leaf_type).expect("type resolves")),
            BatchSize::SmallInput,
        );
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let cache = chain_catalog().into_cache();
    let leaf = DocKey::member(format!("Bench.T{}", CHAIN_LEN - 1), "Render", MemberKind::Method);
    cache.resolve(&leaf).expect("chain resolves");

    c.bench_function("cache_hit", |b| {
        b.iter(|| black_box(cache.resolve(&leaf).expect("cached entry")));
    });
}

fn bench_catalog_decode(c: &mut Criterion) {
    let content = catalog_toml();
    c.bench_function("catalog_from_toml", |b| {
        b.iter(|| black_box(Catalog::from_toml_str(&content).expect("catalog parses")));
    });
}

criterion_group!(
    benches,
    bench_cold_resolution,
    bench_cache_hit,
    bench_catalog_decode
);
criterion_main!(benches);
