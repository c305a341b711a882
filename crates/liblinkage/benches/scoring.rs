use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use liblinkage::{prelude::*, tests::fixtures};

fn score_pair(c: &mut Criterion) {
  let linker = Linker::new(LinkageConfig::default()).build().unwrap();
  let (left, right) = fixtures::customers_and_users();
  let (lcols, rcols) = (linker.classify_columns(&left.columns), linker.classify_columns(&right.columns));

  c.bench_function("score_pair", |b| b.iter(|| black_box(linker.score(&left.rows[2], &right.rows[2], &lcols, &rcols))));
}

fn find_matches_small(c: &mut Criterion) {
  let linker = Linker::new(LinkageConfig::default()).build().unwrap();
  let (left, right) = fixtures::synthetic(50, 0.3);

  c.bench_function("find_matches_50x50", |b| b.iter(|| black_box(linker.find_matches(&left, &right))));
}

fn find_matches_large(c: &mut Criterion) {
  let linker = Linker::new(LinkageConfig::default()).build().unwrap();
  let (left, right) = fixtures::synthetic(400, 0.3);

  let mut group = c.benchmark_group("large");
  group.sample_size(10);
  group.bench_function("find_matches_400x400", |b| b.iter(|| black_box(linker.find_matches(&left, &right))));
  group.finish();
}

fn classify(c: &mut Criterion) {
  let linker = Linker::new(LinkageConfig::default()).build().unwrap();

  c.bench_function("classify", |b| b.iter(|| black_box(linker.classify("customer_contact_number"))));
}

criterion_group!(benches, score_pair, find_matches_small, find_matches_large, classify);
criterion_main!(benches);
