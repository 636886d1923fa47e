use commentcop::bpe::{BpeEncoder, BpeRanks, CachingBpeEncoder, GreedyBpeEncoder};
use commentcop::tokenizer::RoBERTaTokenizer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::rc::Rc;

/// A merge table dense enough to exercise realistic multi-pass merging on
/// English prose and code comments without needing a bundled resource file:
/// every adjacent pair of lowercase letters merges, so most words collapse
/// to one or two BPE pieces.
fn english_ranks() -> Rc<BpeRanks> {
    let alphabet: Vec<char> = ('a'..='z').collect();
    let mut pairs = Vec::new();
    for a in &alphabet {
        for b in &alphabet {
            pairs.push((a.to_string(), b.to_string()));
        }
    }
    Rc::new(BpeRanks::from_pairs(pairs))
}

fn bench_tokenize(c: &mut Criterion) {
    let ranks = english_ranks();
    let tokenizer = RoBERTaTokenizer::new(Rc::clone(&ranks));

    let mut group = c.benchmark_group("tokenize");
    for size in &[10, 100, 1000] {
        let text = "this comment explains why the loop below retries ".repeat(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| tokenizer.tokenize(black_box(&text)));
        });
    }
    group.finish();
}

fn bench_bpe_encode(c: &mut Criterion) {
    let ranks = english_ranks();
    let encoder = GreedyBpeEncoder::new(Rc::clone(&ranks));

    c.bench_function("bpe_encode_single_word", |b| {
        b.iter(|| encoder.encode(black_box("Ġcommented")));
    });
}

fn bench_caching_encoder_repeated_tokens(c: &mut Criterion) {
    let ranks = english_ranks();
    let cached = CachingBpeEncoder::new(GreedyBpeEncoder::new(Rc::clone(&ranks)));

    c.bench_function("caching_bpe_repeated_word", |b| {
        b.iter(|| cached.encode(black_box("Ġcommented")));
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_bpe_encode,
    bench_caching_encoder_repeated_tokens
);
criterion_main!(benches);
