use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use listbench::{BenchmarkConfig, BenchmarkRunner, Mix, PolicyKind};

fn runner(mix: Mix, threads: u32) -> BenchmarkRunner {
    BenchmarkRunner::new(BenchmarkConfig {
        initial_size: 1000,
        operations: 10_000,
        mix,
        runs: 1,
        threads,
        seed: Some(42),
        ..BenchmarkConfig::default()
    })
    .unwrap()
}

/// 基准测试：三种同步方式在读多、均衡、写多负载下的对比
fn bench_policies(c: &mut Criterion) {
    let mixes = [
        ("read_heavy", Mix::new(0.99, 0.005, 0.005)),
        ("balanced", Mix::new(0.9, 0.05, 0.05)),
        ("write_heavy", Mix::new(0.5, 0.25, 0.25)),
    ];
    for (name, mix) in mixes.iter() {
        let mut group = c.benchmark_group(*name);
        group.sample_size(10);
        for kind in PolicyKind::ALL.iter() {
            let threads = if kind.is_concurrent() { 4 } else { 1 };
            let runner = runner(*mix, threads);
            group.bench_function(BenchmarkId::new(kind.to_string(), threads), |b| {
                b.iter(|| runner.run_policy(*kind).unwrap())
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
