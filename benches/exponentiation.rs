use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::AffineRepr;
use ark_std::UniformRand;
use criterion::measurement::WallTime;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, Criterion, Throughput};

use tau_ceremony::engine::{exponentiate_g1, exponentiate_g2};
use tau_ceremony::multicore::Worker;
use tau_ceremony::progress::Progress;

fn exponentiation_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("exponentiate");
    g1_exponentiation(&mut group);
    g2_exponentiation(&mut group);
    group.finish();
}

fn g1_exponentiation(g: &mut BenchmarkGroup<WallTime>) {
    let worker = Worker::new();
    let mut rng = rand::thread_rng();
    let y = Fr::rand(&mut rng);
    let base = G1Projective::from(G1Affine::generator());

    for size in [1usize << 12, 1 << 16] {
        g.throughput(Throughput::Elements(size as u64));
        g.bench_function(format!("g1/{size}"), |b| {
            b.iter_with_setup(
                || vec![base; size],
                |mut points| {
                    let progress = Progress::new(points.len() as u64);
                    exponentiate_g1(&worker, &mut points, y, 0, &progress);
                },
            )
        });
    }
}

fn g2_exponentiation(g: &mut BenchmarkGroup<WallTime>) {
    let worker = Worker::new();
    let mut rng = rand::thread_rng();
    let y = Fr::rand(&mut rng);
    let base = G2Projective::from(G2Affine::generator());

    for size in [1usize << 10, 1 << 13] {
        g.throughput(Throughput::Elements(size as u64));
        g.bench_function(format!("g2/{size}"), |b| {
            b.iter_with_setup(
                || vec![base; size],
                |mut points| {
                    let progress = Progress::new(points.len() as u64);
                    exponentiate_g2(&worker, &mut points, y, 0, &progress);
                },
            )
        });
    }
}

criterion_group!(benches, exponentiation_group);
criterion_main!(benches);
