use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use listbench::{populate, ListPolicy, SerialList, SortedList, MAX_VALUE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 基准测试：不同规模下 member 的扫描代价
fn bench_member(c: &mut Criterion) {
    let mut group = c.benchmark_group("member");
    for &n in &[100u32, 1000, 10_000] {
        let list = SerialList::new();
        populate(&list, n, &mut StdRng::seed_from_u64(1)).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| list.member(black_box(rng.gen_range(0, MAX_VALUE))).unwrap())
        });
    }
    group.finish();
}

/// 基准测试：插入后立即删除，列表规模保持不变
fn bench_insert_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_delete");
    for &n in &[100u32, 1000, 10_000] {
        let mut list = SortedList::new();
        let mut rng = StdRng::seed_from_u64(3);
        while list.len() < n as usize {
            list.insert(rng.gen_range(0, MAX_VALUE)).unwrap();
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let value = rng.gen_range(0, MAX_VALUE);
                if list.insert(value).unwrap() {
                    list.delete(value);
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_member, bench_insert_delete);
criterion_main!(benches);
