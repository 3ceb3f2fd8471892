use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docrank_core::{EngineConfig, Normalizer, SearchEngine};

const TEXT: &str = "The engine builds per-document term-frequency vectors over a shared \
vocabulary, computes inverse document frequencies and ranks documents against a free-text \
query. Searching, ranking and normalizing are all deterministic operations.";

fn bench_process(c: &mut Criterion) {
    let n = Normalizer::english();
    c.bench_function("normalize_paragraph", |b| b.iter(|| n.process(black_box(TEXT))));
}

fn bench_search(c: &mut Criterion) {
    let n = Normalizer::english();
    let base = n.process(TEXT);
    let docs: Vec<(String, String)> = (0..500)
        .map(|i| {
            let rotated: Vec<&str> = base.iter().cycle().skip(i % base.len()).take(10 + i % 17).map(String::as_str).collect();
            (format!("doc{i}"), rotated.join(" "))
        })
        .collect();
    let engine = SearchEngine::from_documents(docs, EngineConfig::default()).unwrap();
    let query = n.process("ranking documents by frequency");
    c.bench_function("search_500_docs", |b| b.iter(|| engine.search(black_box(&query), 10)));
}

criterion_group!(benches, bench_process, bench_search);
criterion_main!(benches);
