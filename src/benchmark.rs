use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::collections::HashMap;
use refined_mrp::{MRPRefined, RefinedInfo, split_info};

/// Random refined specification over `n` states where every state reaches
/// `out_degree` destinations (itself included) with normalised probabilities.
fn setup(n: u32, out_degree: usize, seed: u64) -> RefinedInfo<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut info: RefinedInfo<u32> = HashMap::with_capacity(n as usize);
    for s in 0..n {
        let mut dests: Vec<u32> = vec![s];
        while dests.len() < out_degree.min(n as usize) {
            let d = rng.gen_range(0, n);
            if !dests.contains(&d) {
                dests.push(d);
            }
        }
        let weights: Vec<f64> = dests.iter().map(|_| rng.gen_range(0.01, 1.0)).collect();
        let total: f64 = weights.iter().sum();
        let v: HashMap<u32, (f64, f64)> = dests.into_iter()
            .zip(weights.into_iter())
            .map(|(d, w)| (d, (w / total, rng.gen_range(-10.0, 10.0))))
            .collect();
        info.insert(s, v);
    }
    info
}

pub fn construction_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("refined mrp construction");
    for n in [10u32, 100, 500].iter() {
        let info = setup(*n, 5, 42);
        group.bench_with_input(BenchmarkId::new("split", n), &info, |b, info|
            b.iter(|| split_info(black_box(info))));
        group.bench_with_input(BenchmarkId::new("build", n), &info, |b, info|
            b.iter(|| MRPRefined::new(black_box(info), 0.95)));
    }
    group.finish();
}

criterion_group!(benches, construction_benchmark);
criterion_main!(benches);
