//! Pairing-based verifier (spec §4.6, C8).
//!
//! Ported from `setup-tools/src/verify/verifier.{hpp,cpp}`: same-ratio
//! aggregation collapses an N-point powering-sequence check into two
//! multi-exponentiations and a double Miller loop, instead of N individual
//! pairings.

use ark_bn254::{Bn254, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::UniformRand;
use ark_std::Zero;

use crate::error::{CoreError, CoreResult};
use crate::multicore::Worker;
use crate::transcript::Manifest;

/// The aggregated `(lhs, rhs)` pair produced by [`same_ratio_preprocess`].
pub struct VerificationKey<G> {
    pub lhs: G,
    pub rhs: G,
}

fn min_threads(worker: &Worker) -> usize {
    worker.cpus().max(4)
}

/// Collapses `points` (interpreted as a claimed powering sequence `x ·
/// base, x² · base, …`) into a `(lhs, rhs)` pair using a random challenge
/// `z`, so the sequence can be checked with one pairing instead of `N`.
///
/// `lhs = Σ z^{i+1} · points[i]` for `i` in `[0, N-1)`,
/// `rhs = Σ z^{i+1} · points[i+1]` over the same range.
pub fn same_ratio_preprocess_g1(worker: &Worker, points: &[G1Affine]) -> VerificationKey<G1Projective> {
    let scalars = challenge_powers(points.len());
    preprocess(worker, points, &scalars)
}

/// `G2` counterpart of [`same_ratio_preprocess_g1`].
pub fn same_ratio_preprocess_g2(worker: &Worker, points: &[G2Affine]) -> VerificationKey<G2Projective> {
    let scalars = challenge_powers(points.len());
    preprocess(worker, points, &scalars)
}

fn challenge_powers(len: usize) -> Vec<Fr> {
    if len < 2 {
        return Vec::new();
    }
    let challenge = Fr::rand(&mut rand::rngs::OsRng);
    let mut scalars = Vec::with_capacity(len - 1);
    let mut power = challenge;
    for _ in 0..len - 1 {
        scalars.push(power);
        power *= challenge;
    }
    scalars
}

fn preprocess<G: CurveGroup + VariableBaseMSM>(
    worker: &Worker,
    points: &[G::Affine],
    scalars: &[G::ScalarField],
) -> VerificationKey<G>
where
    G::Affine: Send + Sync,
    G::ScalarField: Send + Sync,
{
    let pairs = scalars.len();
    if pairs == 0 {
        return VerificationKey {
            lhs: G::zero(),
            rhs: G::zero(),
        };
    }

    let threads = min_threads(worker).min(pairs.max(1));
    let base_range = pairs / threads;

    let ranges: Vec<(usize, usize)> = {
        let mut ranges = Vec::with_capacity(threads);
        let mut start = 0;
        for i in 0..threads {
            if start >= pairs {
                break;
            }
            let range = if i == threads - 1 { pairs - start } else { base_range };
            if range == 0 {
                continue;
            }
            ranges.push((start, range));
            start += range;
        }
        ranges
    };

    let results: Vec<(G, G)> = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .into_iter()
            .map(|(start, range)| {
                scope.spawn(move |_| {
                    let lhs = G::msm(&points[start..start + range], &scalars[start..start + range])
                        .unwrap_or_else(|_| G::zero());
                    let rhs = G::msm(&points[start + 1..start + 1 + range], &scalars[start..start + range])
                        .unwrap_or_else(|_| G::zero());
                    (lhs, rhs)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("preprocess thread panicked")).collect()
    })
    .expect("preprocess scope panicked");

    let mut lhs = G::zero();
    let mut rhs = G::zero();
    for (l, r) in results {
        lhs += l;
        rhs += r;
    }
    VerificationKey { lhs, rhs }
}

/// `e(-k1.lhs, k2.lhs) · e(k1.rhs, k2.rhs) = 1` via one double Miller loop
/// and one final exponentiation (spec §4.6.2).
pub fn same_ratio(k1: &VerificationKey<G1Projective>, k2: &VerificationKey<G2Projective>) -> bool {
    let g1 = [(-k1.lhs).into_affine(), k1.rhs.into_affine()];
    let g2 = [k2.lhs.into_affine(), k2.rhs.into_affine()];
    Bn254::multi_pairing(g1, g2).is_zero()
}

fn validate_g1_sequence(worker: &Worker, evaluation: &[G1Affine], comparator: G2Affine) -> bool {
    let key = same_ratio_preprocess_g1(worker, evaluation);
    let delta = VerificationKey {
        lhs: G2Projective::from(comparator),
        rhs: G2Projective::from(G2Affine::generator()),
    };
    same_ratio(&key, &delta)
}

fn validate_g2_sequence(worker: &Worker, evaluation: &[G2Affine], comparator: G1Affine) -> bool {
    let key = same_ratio_preprocess_g2(worker, evaluation);
    let delta = VerificationKey {
        lhs: G1Projective::from(comparator),
        rhs: G1Projective::from(G1Affine::generator()),
    };
    same_ratio(&delta, &key)
}

/// Full transcript verification of spec §4.6.3: optional chain linkage,
/// then the G1 and (if present) G2 powering-sequence checks.
pub fn validate_transcript(
    worker: &Worker,
    g1_0: G1Affine,
    g2_0: G2Affine,
    g1_x: &[G1Affine],
    g2_x: &[G2Affine],
    previous_anchor: Option<(G1Affine, G2Affine)>,
) -> CoreResult<()> {
    if let Some((g1_x_prev, g2_y)) = previous_anchor {
        let key1 = VerificationKey {
            lhs: G1Projective::from(g1_x_prev),
            rhs: G1Projective::from(g1_0),
        };
        let key2 = VerificationKey {
            lhs: G2Projective::from(g2_y),
            rhs: G2Projective::from(G2Affine::generator()),
        };
        if !same_ratio(&key1, &key2) {
            return Err(CoreError::ChainBroken);
        }
    }

    if !validate_g1_sequence(worker, g1_x, g2_0) {
        return Err(CoreError::G1PowerSequenceInvalid);
    }

    if g2_x.len() > 1 && !validate_g2_sequence(worker, g2_x, g1_0) {
        return Err(CoreError::G2PowerSequenceInvalid);
    }

    Ok(())
}

/// Manifest-chain validator (spec §4.6.4): checks two adjacent shard
/// manifests are consistent with one continuous ceremony.
pub fn validate_manifest_chain(previous: &Manifest, current: &Manifest) -> CoreResult<()> {
    let totals_match = previous.total_transcripts == current.total_transcripts
        && previous.total_g1_points == current.total_g1_points
        && previous.total_g2_points == current.total_g2_points;
    let adjacent = (current.transcript_number == 0 && previous.transcript_number == 0)
        || current.transcript_number == previous.transcript_number + 1;
    let monotone = current.num_g1_points <= previous.num_g1_points
        && current.num_g2_points <= previous.num_g2_points
        && current.start_from >= previous.start_from;

    if totals_match && adjacent && monotone {
        Ok(())
    } else {
        Err(CoreError::ManifestInvalid {
            reason: format!(
                "adjacent manifests {} -> {} are inconsistent",
                previous.transcript_number, current.transcript_number
            ),
        })
    }
}

/// Set validator (spec §4.6.5): checks a complete set of per-shard
/// manifests sums to the declared ceremony totals.
pub fn validate_manifest_set(manifests: &[Manifest], total_g1: u32, total_g2: u32) -> CoreResult<()> {
    let sum_g1: u64 = manifests.iter().map(|m| m.num_g1_points as u64).sum();
    let sum_g2: u64 = manifests.iter().map(|m| m.num_g2_points as u64).sum();

    let declares_totals = manifests
        .iter()
        .all(|m| m.total_g1_points == total_g1 && m.total_g2_points == total_g2);

    if !declares_totals {
        return Err(CoreError::SetIncomplete {
            reason: "a shard declares totals inconsistent with the ceremony".to_string(),
        });
    }
    if sum_g1 != total_g1 as u64 {
        return Err(CoreError::SetIncomplete {
            reason: format!("G1 point count sums to {sum_g1}, expected {total_g1}"),
        });
    }
    if sum_g2 == 0 || sum_g2 - 1 != total_g2 as u64 {
        return Err(CoreError::SetIncomplete {
            reason: format!(
                "G2 point count (minus genesis anchor) sums to {}, expected {total_g2}",
                sum_g2.saturating_sub(1)
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Field;

    fn powers_g1(y: Fr, n: usize) -> Vec<G1Affine> {
        let base = G1Projective::from(G1Affine::generator());
        (1..=n).map(|i| (base * y.pow([i as u64])).into_affine()).collect()
    }

    #[test]
    fn valid_powering_sequence_passes() {
        let worker = Worker::new();
        let y = Fr::rand(&mut rand::thread_rng());
        let g1_x = powers_g1(y, 6);
        let g2_0 = (G2Projective::from(G2Affine::generator()) * y).into_affine();
        assert!(validate_g1_sequence(&worker, &g1_x, g2_0));
    }

    #[test]
    fn perturbed_sequence_fails() {
        let worker = Worker::new();
        let y = Fr::rand(&mut rand::thread_rng());
        let mut g1_x = powers_g1(y, 6);
        let g2_0 = (G2Projective::from(G2Affine::generator()) * y).into_affine();
        g1_x[3] = (G1Projective::from(g1_x[3]) + G1Projective::from(G1Affine::generator())).into_affine();
        assert!(!validate_g1_sequence(&worker, &g1_x, g2_0));
    }

    #[test]
    fn removed_element_fails() {
        let worker = Worker::new();
        let y = Fr::rand(&mut rand::thread_rng());
        let mut g1_x = powers_g1(y, 6);
        let g2_0 = (G2Projective::from(G2Affine::generator()) * y).into_affine();
        g1_x.remove(2);
        assert!(!validate_g1_sequence(&worker, &g1_x, g2_0));
    }

    #[test]
    fn manifest_chain_rejects_nonadjacent() {
        let prev = Manifest {
            transcript_number: 0,
            total_transcripts: 2,
            total_g1_points: 16,
            total_g2_points: 2,
            num_g1_points: 8,
            num_g2_points: 2,
            start_from: 0,
        };
        let mut cur = prev;
        cur.transcript_number = 2;
        assert!(validate_manifest_chain(&prev, &cur).is_err());
    }

    #[test]
    fn manifest_set_accepts_sharded_scenario() {
        let manifests = crate::driver::plan_initial(17, 5, 8);
        let mut manifests = manifests;
        manifests[0].num_g2_points += 1;
        assert!(validate_manifest_set(&manifests, 17, 5).is_ok());
    }

    #[test]
    fn manifest_set_rejects_tampered_shard() {
        let manifests = crate::driver::plan_initial(17, 5, 8);
        let mut manifests = manifests;
        manifests[0].num_g2_points += 1;
        manifests[1].num_g1_points = 99;
        assert!(validate_manifest_set(&manifests, 17, 5).is_err());
    }
}
