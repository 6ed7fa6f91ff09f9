use criterion::{black_box, criterion_group, BenchmarkId, Criterion};
use litetensor_core::target::{auto_set_target, get_default_target};
use litetensor_tensor::Tensor;

const SIZES: [(usize, &str); 3] = [(1_000, "small"), (100_000, "medium"), (1_000_000, "large")];

fn source(size: usize) -> Tensor {
    let data: Vec<f32> = (0..size).map(|i| (i % 10) as f32 / 10.0).collect();
    Tensor::from_vec(data, [size as i64]).unwrap()
}

fn mutable_data(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("tensor/mutable_data");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);

    auto_set_target();
    for (size, name) in SIZES {
        group.bench_with_input(BenchmarkId::new("fresh", name), &size, |b, &size| {
            b.iter(|| {
                let mut x = Tensor::new();
                x.resize([size as i64]);
                black_box(x.mutable_data_ptr::<f32>().unwrap());
            })
        });

        group.bench_with_input(BenchmarkId::new("reuse", name), &size, |b, &size| {
            let mut x = Tensor::new();
            x.resize([size as i64]);
            x.mutable_data_ptr::<f32>().unwrap();
            b.iter(|| black_box(x.mutable_data_ptr::<f32>().unwrap()))
        });
    }
    group.finish();
}

fn share_data_with(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("tensor/share_data_with");
    group.sample_size(50);

    auto_set_target();
    let x = source(1_000);
    group.bench_function("alias", |b| {
        b.iter(|| {
            let mut y = Tensor::with_target(get_default_target());
            y.share_data_with(black_box(&x));
            black_box(y.use_count())
        })
    });
    group.finish();
}

fn copy_data_from(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("tensor/copy_data_from");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);

    auto_set_target();
    for (size, name) in SIZES {
        let x = source(size);
        let mut y = Tensor::new();
        group.bench_function(name, |b| b.iter(|| y.copy_data_from(black_box(&x)).unwrap()));
    }
    group.finish();
}

criterion_group!(benches, mutable_data, share_data_with, copy_data_from);
