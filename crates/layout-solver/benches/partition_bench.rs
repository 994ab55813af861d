//! Solver runtime on large, mostly-flat chunk runs and on deeply
//! nested but divide-free regions, checking near-linear behavior on
//! large collection literals.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use layout_chunks::{ChunkBuilder, DoubleNewline};
use layout_rules::PositionalRule;
use layout_solver::solve;

fn flat_argument_list(count: usize) -> layout_chunks::BuildOutput {
    let mut b = ChunkBuilder::new(0);
    let rule = b.add_rule(Box::new(PositionalRule::new(1)));
    b.start_rule(Some(rule));
    b.write("call(").unwrap();
    for i in 0..count {
        if i > 0 {
            b.write(", ").unwrap();
        }
        b.write(&format!("arg{i}")).unwrap();
        b.split(false, DoubleNewline::Single, false).unwrap();
    }
    b.write(")").unwrap();
    b.end_rule();
    b.end().unwrap()
}

fn statement_run(count: usize) -> layout_chunks::BuildOutput {
    let mut b = ChunkBuilder::new(0);
    for i in 0..count {
        b.write(&format!("stmt{i};")).unwrap();
        b.block_split(false, DoubleNewline::Single).unwrap();
    }
    b.end().unwrap()
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_argument_list");
    for size in [100usize, 1_000, 10_000] {
        let build = flat_argument_list(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &build, |b, build| {
            b.iter(|| black_box(solve(build, 80)));
        });
    }
    group.finish();
}

fn bench_divide_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_run");
    for size in [100usize, 1_000, 10_000] {
        let build = statement_run(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &build, |b, build| {
            b.iter(|| black_box(solve(build, 80)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flat, bench_divide_heavy);
criterion_main!(benches);
