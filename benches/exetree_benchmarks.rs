use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exetree::dataset::Dataset;
use exetree::{DataLoader, DatasetConfig, ExeTreeDataset, ExecutionTree, FeatureEncoding, LoaderConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn random_runs(n_runs: usize, run_len: usize, arity: u32) -> Vec<(Vec<u32>, bool)> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n_runs)
        .map(|_| {
            let values: Vec<u32> = (0..run_len).map(|_| rng.gen_range(0..arity)).collect();
            (values, rng.gen::<f32>() < 0.1)
        })
        .collect()
}

fn build_tree(runs: &[(Vec<u32>, bool)]) -> ExecutionTree {
    let mut tree = ExecutionTree::new();
    for (values, win) in runs {
        tree.record_run(values, *win).unwrap();
    }
    tree
}

pub fn tree_benchmarks(c: &mut Criterion) {
    let runs = random_runs(2_000, 12, 8);

    c.bench_function("record 2000 runs", |b| b.iter(|| build_tree(black_box(&runs))));

    let tree = build_tree(&runs).freeze();
    c.bench_function("build dataset", |b| {
        b.iter(|| ExeTreeDataset::new(black_box(tree.clone()), DatasetConfig::default()))
    });

    let ds = ExeTreeDataset::new(tree.clone(), DatasetConfig::default());
    c.bench_function("dataset get all", |b| {
        b.iter(|| (0..ds.size()).map(|i| ds.get(black_box(i)).unwrap()).count())
    });

    let path_ds = ExeTreeDataset::new(
        tree.clone(),
        DatasetConfig::default().set_feature_encoding(FeatureEncoding::Path),
    );
    c.bench_function("path examples parallel", |b| b.iter(|| path_ds.examples(true).unwrap()));

    let mut loader = DataLoader::new(ds, LoaderConfig::new(50)).unwrap();
    c.bench_function("loader epoch", |b| {
        b.iter(|| loader.iter().map(|batch| batch.unwrap().len()).sum::<usize>())
    });

    let mut group = c.benchmark_group("merge");
    group.measurement_time(Duration::from_secs(10));
    let other = build_tree(&random_runs(2_000, 12, 8)[1_000..]);
    group.bench_function("merge", |b| {
        b.iter(|| {
            let mut t = tree.clone().thaw();
            t.merge(black_box(&other)).unwrap();
            t
        })
    });
    group.finish();
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
