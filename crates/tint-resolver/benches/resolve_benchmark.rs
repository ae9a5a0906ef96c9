//! Resolver benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tint_parser::parse_variables;
use tint_resolver::{resolve, resolve_source};

const SIMPLE_THEME: &str = r#"
@linkColor:       #08c;
@linkColorHover:  darken(@linkColor, 15%);
@gridRowWidth:    (12 * 60px) + (20px * 11);
"#;

const FULL_THEME: &str = include_str!("../tests/fixtures/variables.less");

fn resolve_simple(c: &mut Criterion) {
    c.bench_function("resolve_simple", |b| {
        b.iter(|| resolve_source(black_box(SIMPLE_THEME)))
    });
}

fn resolve_full(c: &mut Criterion) {
    c.bench_function("resolve_full", |b| {
        b.iter(|| resolve_source(black_box(FULL_THEME)))
    });
}

fn resolve_parsed(c: &mut Criterion) {
    let definitions = parse_variables(FULL_THEME).unwrap();
    c.bench_function("resolve_parsed", |b| {
        b.iter(|| resolve(black_box(&definitions)))
    });
}

criterion_group!(benches, resolve_simple, resolve_full, resolve_parsed);
criterion_main!(benches);
