use commafree::Search;
use criterion::{criterion_group, criterion_main, Criterion};

fn enumerate_binary(crit: &mut Criterion) {
    crit.bench_function("enumerate m=2 g=3", |b| {
        b.iter(|| Search::new(2, 3).unwrap().count())
    });
}

fn enumerate_ternary(crit: &mut Criterion) {
    crit.bench_function("enumerate m=3 g=18", |b| {
        b.iter(|| Search::new(3, 18).unwrap().count())
    });
}

criterion_group! {
    name = search_benches;
    config = Criterion::default().sample_size(10);
    targets = enumerate_binary, enumerate_ternary
}
criterion_main!(search_benches);
