//! # Trigger Engine Benchmarks
//!
//! | Path | Input | Target |
//! |------|-------|--------|
//! | `contains_trigger` | 2k-word page, no match | < 1ms |
//! | `contains_trigger` | same page, fragment rebuild off | < 1ms |
//! | `is_exact_trigger` | bloom reject / store hit | < 5us |
//! | generation build | 10k phrases | < 100ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::CategoryId;
use tf_01_text_triggers::{
    EngineConfig, GenerationBuilder, InMemoryTriggerStore, MatchEngine, TriggerMatcher,
};
use tf_tests::fixtures::sample_page;

fn every(_: CategoryId) -> bool {
    true
}

fn random_phrases(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let words = rng.gen_range(1..=4);
            (0..words)
                .map(|_| {
                    let len = rng.gen_range(3..=9);
                    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn engine_with(phrases: &[String]) -> MatchEngine<InMemoryTriggerStore> {
    let config = EngineConfig::default();
    let mut builder = GenerationBuilder::new(InMemoryTriggerStore::new(), &config);
    for (i, chunk) in phrases.chunks(500).enumerate() {
        builder.load_batch((i + 1) as CategoryId, chunk).unwrap();
    }
    MatchEngine::new(config, builder.finish().unwrap()).unwrap()
}

fn bench_contains_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("tf-01-contains-trigger");
    let engine = engine_with(&random_phrases(10_000, 7));

    for words in [200, 2_000] {
        let page = sample_page(words);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("rebuild", words), &page, |b, page| {
            b.iter(|| black_box(engine.contains_trigger(page, &every, true, 5).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("single_word", words), &page, |b, page| {
            b.iter(|| black_box(engine.contains_trigger(page, &every, false, 1).unwrap()))
        });
    }
    group.finish();
}

fn bench_exact_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("tf-01-exact-trigger");
    let phrases = random_phrases(10_000, 11);
    let engine = engine_with(&phrases);

    group.bench_function("hit", |b| {
        b.iter(|| black_box(engine.is_exact_trigger(&phrases[4_242], &every).unwrap()))
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(engine.is_exact_trigger("definitely not loaded", &every).unwrap()))
    });
    group.finish();
}

fn bench_generation_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tf-01-generation-build");
    group.sample_size(20);

    for count in [1_000, 10_000] {
        let phrases = random_phrases(count, 13);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &phrases, |b, phrases| {
            b.iter(|| black_box(engine_with(phrases)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_contains_trigger,
    bench_exact_lookup,
    bench_generation_build
);
criterion_main!(benches);
