use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fieldql::{ColumnCatalog, CompileOptions, Compiler, DataType, DialectProfile, Grammar};

fn wide_catalog() -> ColumnCatalog {
    let mut catalog = ColumnCatalog::new("metrics")
        .with_column("score", DataType::Num)
        .with_column("department", DataType::Str)
        .with_column("test_date", DataType::Date);
    for i in 0..60 {
        catalog = catalog.with_column(format!("metric_{i}"), DataType::Num);
    }
    catalog
}

fn bench_grammar_generation(c: &mut Criterion) {
    let catalog = wide_catalog();
    c.bench_function("generate_grammar", |b| {
        b.iter(|| Grammar::generate(black_box(&catalog)))
    });
}

fn bench_cold_compile(c: &mut Criterion) {
    let compiler = Compiler::new(wide_catalog(), DialectProfile::lookup("postgresql"));
    let opts = CompileOptions::default();
    let queries = [
        "sum([score]) / count(*) > 0.5",
        "if([score] > 2, [department], \"OTHERS\") = \"XDR\"",
        "[test_date] IS last year AND [score] between 1 and 100",
    ];
    let mut n = 0usize;
    c.bench_function("compile_uncached", |b| {
        b.iter(|| {
            // vary the text so every iteration misses the cache
            n += 1;
            let text = format!("{} AND [metric_0] > {n}", queries[n % queries.len()]);
            let _ = black_box(compiler.compile(&text, &opts));
        })
    });
}

fn bench_cached_compile(c: &mut Criterion) {
    let compiler = Compiler::new(wide_catalog(), DialectProfile::lookup("postgresql"));
    let opts = CompileOptions::default();
    let text = "sum([score]) / count(*)";
    compiler.compile(text, &opts).expect("warm the cache");
    c.bench_function("compile_cached", |b| {
        b.iter(|| compiler.compile(black_box(text), black_box(&opts)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_grammar_generation,
    bench_cold_compile,
    bench_cached_compile
);
criterion_main!(benches);
