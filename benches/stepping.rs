use clusterstep::{DatasetGenerator, DbscanEngine, KMeansEngine, NeighborIndex, Shape};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_neighbor_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_index");
    let data = DatasetGenerator::with_seed(42).generate(Shape::Blobs, 500).unwrap();

    group.bench_function("build_n500", |b| {
        b.iter(|| NeighborIndex::build(black_box(&data), 50.0))
    });

    group.finish();
}

fn bench_dbscan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dbscan");

    for shape in [Shape::Blobs, Shape::Moons] {
        let data = DatasetGenerator::with_seed(42).generate(shape, 500).unwrap();
        group.bench_function(format!("full_pass_{:?}_n500", shape), |b| {
            b.iter_batched(
                || DbscanEngine::new(50.0, 4).unwrap(),
                |mut engine| engine.run_to_completion(black_box(&data)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    let data = DatasetGenerator::with_seed(42).generate(Shape::Blobs, 500).unwrap();
    let engine = KMeansEngine::new(5).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let (data, state) = engine.initialize(&data, &mut rng);

    group.bench_function("step_n500_k5", |b| {
        b.iter(|| engine.step(black_box(&data), black_box(&state)))
    });

    group.finish();
}

criterion_group!(benches, bench_neighbor_index, bench_dbscan, bench_kmeans);
criterion_main!(benches);
