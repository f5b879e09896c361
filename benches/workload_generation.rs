use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

// 导入项目模块
use iocost_bench::config::{KEY_COUNT, WORKLOAD_SEED};
use iocost_bench::parser::MeasurementTable;
use iocost_bench::permutation::KeyPermutationGenerator;
use iocost_bench::workload::{OpKind, Workload};

// ----------------------------------------------------------------
// 排列生成与计划编码
// ----------------------------------------------------------------
fn bench_generation(c: &mut Criterion) {
    let permutation = KeyPermutationGenerator::new(WORKLOAD_SEED)
        .generate(KEY_COUNT)
        .expect("Failed to generate permutation");

    let mut group = c.benchmark_group("Workload Generation");
    group.throughput(Throughput::Elements(KEY_COUNT as u64));

    group.bench_function("permutation", |b| {
        b.iter(|| {
            KeyPermutationGenerator::new(black_box(WORKLOAD_SEED))
                .generate(KEY_COUNT)
                .expect("Failed to generate permutation")
        })
    });

    for kind in OpKind::ALL {
        group.bench_function(format!("{}_plan_text", kind.name()), |b| {
            b.iter(|| Workload::plan(kind, black_box(&permutation)).to_text())
        });
    }

    let search_text = Workload::plan(OpKind::Search, &permutation).to_text();
    group.bench_function("decode_search_plan", |b| {
        b.iter(|| Workload::parse(black_box(&search_text)).expect("Failed to decode workload"))
    });

    group.finish();
}

// ----------------------------------------------------------------
// 结果表解析
// ----------------------------------------------------------------
fn bench_parsing(c: &mut Criterion) {
    let table: String = (0..KEY_COUNT)
        .map(|i| format!("{} {}\n", i % 7, i % 3))
        .collect();

    let mut group = c.benchmark_group("Result Parsing");
    group.throughput(Throughput::Elements(KEY_COUNT as u64));
    group.bench_function("measurement_table", |b| {
        b.iter(|| MeasurementTable::parse(black_box(&table)).expect("Failed to parse table"))
    });
    group.finish();
}

criterion_group!(benches, bench_generation, bench_parsing);
criterion_main!(benches);
