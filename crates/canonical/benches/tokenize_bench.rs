use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use canonical::{Parser, TokenizeOptions, Tokenizer};

fn bench_tokenize(c: &mut Criterion) {
    let parser = Parser::new();
    let plain = TokenizeOptions::default();
    let full = TokenizeOptions {
        filter_stopwords: true,
        enable_stemming: true,
        ..Default::default()
    }
    .with_language_hint("en");

    let mut group = c.benchmark_group("tokenize");
    for size in [512usize, 4096, 32768] {
        let text = "The hundred-eyed giant was watching the running herd. ".repeat(size / 54 + 1);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("plain_{size}"), |b| {
            b.iter(|| parser.tokenize(black_box(&text), black_box(&plain)).expect("tokenize"))
        });
        group.bench_function(format!("stem_stop_{size}"), |b| {
            b.iter(|| parser.tokenize(black_box(&text), black_box(&full)).expect("tokenize"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
