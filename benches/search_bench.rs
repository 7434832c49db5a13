//! Benchmarks over synthetic document corpora sized like real blogs:
//! small (~20 posts), medium (~100 posts), large (~500 posts).
//!
//! Run with: cargo bench

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use minidex::{Engine, EngineOptions, FieldSpec};

struct BlogSize {
    name: &'static str,
    posts: usize,
    words_per_post: usize,
}

const BLOG_SIZES: &[BlogSize] = &[
    BlogSize { name: "small", posts: 20, words_per_post: 500 },
    BlogSize { name: "medium", posts: 100, words_per_post: 1000 },
    BlogSize { name: "large", posts: 500, words_per_post: 1500 },
];

const VOCAB: &[&str] = &[
    "rust", "programming", "typescript", "javascript", "python", "golang", "kubernetes", "docker",
    "serverless", "microservices", "api", "database", "postgresql", "async", "runtime", "compiler",
    "borrow", "checker", "ownership", "concurrency", "search", "index", "query", "ranking", "vector",
];

fn make_post(post_idx: usize, words_per_post: usize) -> (String, String) {
    let mut body = String::with_capacity(words_per_post * 7);
    for w in 0..words_per_post {
        let word = VOCAB[(post_idx * 31 + w * 7) % VOCAB.len()];
        body.push_str(word);
        body.push(' ');
    }
    (format!("Post {post_idx}: {}", VOCAB[post_idx % VOCAB.len()]), body)
}

fn build_engine(posts: usize, words_per_post: usize) -> Engine<String> {
    let mut engine: Engine<String> = Engine::new(EngineOptions {
        fields: vec![FieldSpec::new("title").with_boost(2.0), FieldSpec::new("body")],
        ..Default::default()
    });
    for i in 0..posts {
        let (title, body) = make_post(i, words_per_post);
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), title);
        fields.insert("body".to_string(), body);
        engine.add(format!("post-{i}"), &fields).unwrap();
    }
    engine
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");
    for size in BLOG_SIZES {
        group.throughput(Throughput::Elements(size.posts as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), size, |b, size| {
            b.iter(|| black_box(build_engine(size.posts, size.words_per_post)));
        });
    }
    group.finish();
}

fn bench_exact_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_exact");
    for size in BLOG_SIZES {
        let engine = build_engine(size.posts, size.words_per_post);
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search("rust AND programming")));
        });
    }
    group.finish();
}

fn bench_prefix_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_prefix");
    for size in BLOG_SIZES {
        let engine = build_engine(size.posts, size.words_per_post);
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search("prog")));
        });
    }
    group.finish();
}

fn bench_fuzzy_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_fuzzy");
    for size in BLOG_SIZES {
        let engine = build_engine(size.posts, size.words_per_post);
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search("rusk")));
        });
    }
    group.finish();
}

fn bench_suggest(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest");
    for size in BLOG_SIZES {
        let engine = build_engine(size.posts, size.words_per_post);
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &engine, |b, engine| {
            b.iter(|| black_box(engine.suggest("prog kube")));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_indexing,
    bench_exact_search,
    bench_prefix_search,
    bench_fuzzy_search,
    bench_suggest
);
criterion_main!(benches);
