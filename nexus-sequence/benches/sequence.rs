//! Benchmarks for sequence operations.
//!
//! Compares ArrayList and LinkedList against Vec and VecDeque.

use std::collections::VecDeque;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_sequence::{ArrayList, Deque, LinkedList, SplitCursor};

// ============================================================================
// Append
// ============================================================================

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for &n in &[1_000u64, 100_000] {
        group.throughput(Throughput::Elements(n));

        group.bench_with_input(BenchmarkId::new("array_list", n), &n, |b, &n| {
            b.iter(|| {
                let mut list = ArrayList::new();
                for i in 0..n {
                    list.push(black_box(i)).unwrap();
                }
                list
            });
        });

        group.bench_with_input(BenchmarkId::new("vec", n), &n, |b, &n| {
            b.iter(|| {
                let mut v = Vec::new();
                for i in 0..n {
                    v.push(black_box(i));
                }
                v
            });
        });

        group.bench_with_input(BenchmarkId::new("linked_list", n), &n, |b, &n| {
            b.iter(|| {
                let mut list = LinkedList::new();
                for i in 0..n {
                    list.push_back(black_box(i));
                }
                list
            });
        });
    }

    group.finish();
}

// ============================================================================
// Deque churn
// ============================================================================

fn bench_deque_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("deque_churn");

    group.bench_function("linked_list", |b| {
        let mut list: LinkedList<u64> = (0..1024).collect();
        b.iter(|| {
            list.add_last(black_box(1));
            black_box(list.poll_first())
        });
    });

    group.bench_function("vec_deque", |b| {
        let mut q: VecDeque<u64> = (0..1024).collect();
        b.iter(|| {
            q.push_back(black_box(1));
            black_box(q.pop_front())
        });
    });

    group.finish();
}

// ============================================================================
// Bulk removal
// ============================================================================

fn bench_bulk_removal(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_removal");
    let n = 10_000u64;
    group.throughput(Throughput::Elements(n));

    group.bench_function("array_list/remove_if", |b| {
        b.iter_batched(
            || (0..n).collect::<ArrayList<u64>>(),
            |mut list| {
                list.remove_if(|&e| e % 3 == 0);
                list
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("array_list/remove_all", |b| {
        let banned: Vec<u64> = (0..n).step_by(3).collect();
        let banned: std::collections::HashSet<u64> = banned.into_iter().collect();
        b.iter_batched(
            || (0..n).collect::<ArrayList<u64>>(),
            |mut list| {
                list.remove_all(&banned);
                list
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("vec/retain", |b| {
        b.iter_batched(
            || (0..n).collect::<Vec<u64>>(),
            |mut v| {
                v.retain(|&e| e % 3 != 0);
                v
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// Traversal
// ============================================================================

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    let n = 100_000u64;
    group.throughput(Throughput::Elements(n));

    let array: ArrayList<u64> = (0..n).collect();
    let linked: LinkedList<u64> = (0..n).collect();

    group.bench_function("array_list/list_iter", |b| {
        b.iter(|| {
            let mut it = array.list_iter(0).unwrap();
            let mut sum = 0u64;
            while let Some(&e) = it.next(&array).unwrap() {
                sum += e;
            }
            black_box(sum)
        });
    });

    group.bench_function("array_list/splitter", |b| {
        b.iter(|| {
            let mut split = array.splitter();
            let mut sum = 0u64;
            split.for_each_remaining(&array, |&e| sum += e).unwrap();
            black_box(sum)
        });
    });

    group.bench_function("linked_list/iter", |b| {
        b.iter(|| black_box(linked.iter().sum::<u64>()));
    });

    group.bench_function("linked_list/splitter", |b| {
        b.iter(|| {
            let mut split = linked.splitter();
            let mut sum = 0u64;
            while let Some(batch) = split.try_split(&linked) {
                sum += batch.sum::<u64>();
            }
            split.for_each_remaining(&linked, |&e| sum += e).unwrap();
            black_box(sum)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_append,
    bench_deque_churn,
    bench_bulk_removal,
    bench_traversal
);
criterion_main!(benches);
