//! Range evaluator (spec §4.8, C10): computes the signature point `H_k` for
//! every `k` in `[0, n]` from the generator polynomial and the final SRS.
//!
//! Ported from the batching structure of `range/range_multi_exp.hpp`'s
//! sliding `Window`: the quotient-coefficient recurrence is carried forward
//! in fixed-size batches along the polynomial's degree axis, each batch
//! folded into a running group accumulator via one multi-exponentiation,
//! so a single `H_k` never needs its full coefficient vector materialized
//! at once.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_ff::{Field, Zero};

use crate::batch::batch_normalize_g1;
use crate::multicore::Worker;

/// `H_0 = Σ_{i=1}^{n} g_i · p_i` (spec §4.8's k=0 special case: the `(X-0)`
/// factor is stripped by re-indexing rather than divided out).
fn evaluate_zero(generator: &[Fr], srs: &[G1Affine]) -> G1Projective {
    let n = generator.len() - 1;
    G1Projective::msm(&srs[1..=n], &generator[1..=n]).unwrap_or_else(|_| G1Projective::zero())
}

/// Computes `H_k` for a single nonzero `k` by walking the quotient
/// recurrence of spec §4.8 in batches of `batch_size` and folding each
/// batch's contribution into a running accumulator via one multi-exp.
fn evaluate_nonzero(generator: &[Fr], srs: &[G1Affine], k: u64, batch_size: usize) -> G1Projective {
    let n = generator.len() - 1;
    let inv_neg_k = (-Fr::from(k)).inverse().expect("k is nonzero");

    let mut accumulator = G1Projective::zero();
    let mut seed = Fr::zero();
    let mut index = 0usize;

    while index < n {
        let end = (index + batch_size).min(n);
        let mut batch_q = Vec::with_capacity(end - index);
        let mut fa = seed;
        for g_i in &generator[index..end] {
            fa = (*g_i - fa) * inv_neg_k;
            batch_q.push(fa);
        }
        seed = fa;

        let batch_points = &srs[index..end];
        accumulator += G1Projective::msm(batch_points, &batch_q).unwrap_or_else(|_| G1Projective::zero());
        index = end;
    }

    accumulator
}

/// Computes `H_k` for every `k ∈ [0, n]`, where `n = generator.len() - 1`.
/// `srs` must have the same length as `generator`. Batches of at most
/// `batch_size` coefficients are processed per `k`; any positive batch
/// size produces an identical result (spec §8 property 7's batch-count
/// invariance), since the recurrence is simply chunked, not altered.
pub fn evaluate_range_points(
    worker: &Worker,
    generator: &[Fr],
    srs: &[G1Affine],
    batch_size: usize,
) -> Vec<G1Affine> {
    assert_eq!(generator.len(), srs.len(), "generator and SRS lengths must match");
    assert!(batch_size > 0, "batch size must be positive");

    let n = generator.len() - 1;
    let threads = worker.cpus().max(4).min((n + 1).max(1));
    let ks: Vec<u64> = (0..=n as u64).collect();

    let mut results: Vec<G1Projective> = crossbeam::thread::scope(|scope| {
        let chunk = (ks.len() + threads - 1) / threads;
        let handles: Vec<_> = ks
            .chunks(chunk.max(1))
            .map(|chunk_ks| {
                scope.spawn(move |_| {
                    chunk_ks
                        .iter()
                        .map(|&k| {
                            if k == 0 {
                                evaluate_zero(generator, srs)
                            } else {
                                evaluate_nonzero(generator, srs, k, batch_size)
                            }
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("range evaluator thread panicked"))
            .collect()
    })
    .expect("range evaluator scope panicked");

    batch_normalize_g1(&mut results);
    results.iter().map(|p| p.into_affine()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator_poly::build_generator_polynomial;
    use ark_ec::AffineRepr;
    use ark_std::UniformRand;

    fn sample_srs(x: Fr, len: usize) -> Vec<G1Affine> {
        let base = G1Projective::from(G1Affine::generator());
        (0..len).map(|i| (base * x.pow([i as u64])).into_affine()).collect()
    }

    #[test]
    fn batch_size_does_not_affect_result() {
        let n = 16;
        let generator = build_generator_polynomial(n);
        let generator = &generator[0..generator.len() - 1];
        let x = Fr::rand(&mut rand::thread_rng());
        let srs = sample_srs(x, generator.len());
        let worker = Worker::new();

        let full = evaluate_range_points(&worker, generator, &srs, generator.len());
        for batch_size in [1usize, 2, 4, 8] {
            let batched = evaluate_range_points(&worker, generator, &srs, batch_size);
            assert_eq!(full, batched, "batch_size={batch_size} diverged");
        }
    }

    #[test]
    fn zero_case_uses_only_nonconstant_coefficients() {
        let generator = vec![Fr::from(7u64), Fr::from(3u64), Fr::from(5u64)];
        let srs = sample_srs(Fr::from(2u64), generator.len());
        let h0 = evaluate_zero(&generator, &srs);
        let expected = (G1Projective::from(srs[1]) * generator[1]) + (G1Projective::from(srs[2]) * generator[2]);
        assert_eq!(h0.into_affine(), expected.into_affine());
    }
}
