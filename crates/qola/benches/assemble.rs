use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qola::{Mode, Query, Statement, Table};

const T: Table = Table::new("t", "id");

/// A query with `n` selected columns, `n` WHERE clauses and `n` assignments.
fn build_query(n: usize) -> Query {
    let mut q = Query::new(T);
    for i in 0..n {
        q = q
            .select(format!("col{i}"))
            .and_where(format!("col{i} = ?"), i as i64)
            .set(format!("col{i}"), if i % 3 == 0 { String::new() } else { format!("v{i}") });
    }
    q.order("col0").limit(10)
}

fn bench_assemble(c: &mut Criterion) {
    for mode in Mode::ALL {
        let mut group = c.benchmark_group(format!("assemble/{}", mode.as_str()));

        for n in [1, 5, 10, 50, 100] {
            let q = build_query(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
                b.iter(|| black_box(q.assemble(mode)));
            });
        }

        group.finish();
    }
}

fn bench_build_and_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble/build_and_assemble");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_query(n).assemble(Mode::Update)));
        });
    }

    group.finish();
}

fn bench_to_numbered(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble/to_numbered");

    for n in [5, 20, 100, 500] {
        let statement: Statement = build_query(n).assemble(Mode::Update);
        group.bench_with_input(BenchmarkId::from_parameter(n), &statement, |b, s| {
            b.iter(|| black_box(s.to_numbered()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_assemble,
    bench_build_and_assemble,
    bench_to_numbered
);
criterion_main!(benches);
