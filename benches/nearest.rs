use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kd_nearest::{KdTree, brute_force};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn random_points(rng: &mut StdRng, n: usize, k: usize) -> Vec<Vec<f64>> {
    (0..n).map(|_| (0..k).map(|_| rng.gen_range(-100.0..100.0)).collect()).collect()
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    let mut rng = StdRng::seed_from_u64(7);
    for &n in &[1_000usize, 10_000] {
        let points = random_points(&mut rng, n, 3);
        let goals = random_points(&mut rng, 64, 3);
        let tree = KdTree::build(points.clone()).expect("random points are valid");

        group.bench_with_input(BenchmarkId::new("kd_tree", n), &goals, |b, goals| {
            b.iter(|| {
                for goal in goals {
                    black_box(tree.nearest(goal).expect("tree is not empty"));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("brute_force", n), &goals, |b, goals| {
            b.iter(|| {
                for goal in goals {
                    black_box(brute_force::nearest(&points, goal).expect("points are not empty"));
                }
            })
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let points = random_points(&mut rng, 10_000, 3);
    c.bench_function("build_10000_3d", |b| {
        b.iter(|| KdTree::build(black_box(points.clone())).expect("random points are valid"))
    });
}

criterion_group!(benches, bench_nearest, bench_build);
criterion_main!(benches);
