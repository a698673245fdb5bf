//! Participant engine: the per-shard multi-exponentiation job (spec §4.5,
//! §4.5.1, C6).
//!
//! Ported from `setup-tools/src/setup/setup.cpp`'s `compute_thread` /
//! `compute_job` / `compute_transcript`: each worker thread owns a
//! contiguous range of points, carries a running power of the secret
//! scalar, and applies a fixed-window WNAF exponentiation to every point in
//! its range before the ranges are batch-normalized and written out.

use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::scalar_mul::wnaf::WnafContext;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Field;
use std::path::{Path, PathBuf};

use crate::batch::{batch_normalize_g1, batch_normalize_g2};
use crate::error::CoreResult;
use crate::multicore::Worker;
use crate::progress::Progress;
use crate::secret::Secret;
use crate::transcript::{output_path, write_transcript, Manifest};

const WNAF_WINDOW_SIZE: usize = 5;
pub const G1_WEIGHT: u64 = 2;
pub const G2_WEIGHT: u64 = 9;

fn min_threads(worker: &Worker) -> usize {
    worker.cpus().max(4)
}

/// `points[i] <- points[i] * y^{global_offset + i + 1}`, split across
/// `max(hardware_concurrency, 4)` worker threads operating on disjoint
/// contiguous ranges. `progress` is bumped once per point processed.
pub fn exponentiate_g1(
    worker: &Worker,
    points: &mut [G1Projective],
    y: Fr,
    global_offset: u64,
    progress: &Progress,
) {
    let threads = min_threads(worker);
    let ctx = WnafContext::new(WNAF_WINDOW_SIZE);
    run_ranges(threads, points, |start, slice| {
        let mut accumulator = y.pow(scalar_exponent(global_offset, start));
        for point in slice.iter_mut() {
            let scalar = accumulator;
            *point = ctx.mul(*point, &scalar);
            accumulator *= y;
            progress.add(1);
        }
    });
}

/// `G2` counterpart of [`exponentiate_g1`].
pub fn exponentiate_g2(
    worker: &Worker,
    points: &mut [G2Projective],
    y: Fr,
    global_offset: u64,
    progress: &Progress,
) {
    let threads = min_threads(worker);
    let ctx = WnafContext::new(WNAF_WINDOW_SIZE);
    run_ranges(threads, points, |start, slice| {
        let mut accumulator = y.pow(scalar_exponent(global_offset, start));
        for point in slice.iter_mut() {
            let scalar = accumulator;
            *point = ctx.mul(*point, &scalar);
            accumulator *= y;
            progress.add(1);
        }
    });
}

fn scalar_exponent(global_offset: u64, range_start: usize) -> [u64; 1] {
    [global_offset + range_start as u64 + 1]
}

/// Splits `len` items into `threads` contiguous ranges (leftovers folded
/// into the last range, matching `compute_job`'s `thread_range +=
/// leftovers`) and runs `f(start, range_len)` for each range in parallel.
fn run_ranges<T, F>(threads: usize, slice: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let len = slice.len();
    if len == 0 {
        return;
    }
    let base_range = len / threads;
    crossbeam::thread::scope(|scope| {
        let mut start = 0;
        let mut remaining = slice;
        for i in 0..threads {
            if remaining.is_empty() {
                break;
            }
            let range = if i == threads - 1 {
                remaining.len()
            } else {
                base_range
            };
            if range == 0 {
                continue;
            }
            let (chunk, rest) = remaining.split_at_mut(range);
            remaining = rest;
            let f = &f;
            let chunk_start = start;
            scope.spawn(move |_| f(chunk_start, chunk));
            start += range;
        }
    })
    .expect("worker thread panicked");
}

/// Result of running one shard through the engine: the output manifest and
/// the path the transcript was written to.
pub struct ShardOutput {
    pub manifest: Manifest,
    pub path: PathBuf,
}

/// Runs the full per-shard workflow of spec §4.5.1: exponentiate G1 then
/// G2, append the genesis anchor if this is shard 0, batch-normalize, and
/// write the output transcript.
pub fn process_shard(
    dir: &Path,
    worker: &Worker,
    manifest_in: &Manifest,
    mut g1_points: Vec<G1Projective>,
    mut g2_points: Vec<G2Projective>,
    secret: &Secret,
    progress: &Progress,
) -> CoreResult<ShardOutput> {
    let mut manifest_out = *manifest_in;
    let y = secret.as_scalar();
    let global_offset = manifest_in.start_from as u64;

    tracing::info!(shard = manifest_in.transcript_number, "computing g1 multi-exponentiations");
    exponentiate_g1(worker, &mut g1_points, y, global_offset, progress);

    tracing::info!(shard = manifest_in.transcript_number, "computing g2 multi-exponentiations");
    exponentiate_g2(worker, &mut g2_points, y, global_offset, progress);

    if manifest_out.transcript_number == 0 {
        let ctx = WnafContext::new(WNAF_WINDOW_SIZE);
        let anchor = ctx.mul(G2Projective::from(G2Affine::generator()), &y);
        g2_points.push(anchor);
        manifest_out.num_g2_points += 1;
    }

    tracing::info!(shard = manifest_out.transcript_number, "normalizing to affine form");
    batch_normalize_g1(&mut g1_points);
    batch_normalize_g2(&mut g2_points);

    let g1_affine: Vec<G1Affine> = g1_points.iter().map(|p| p.into_affine()).collect();
    let g2_affine: Vec<G2Affine> = g2_points.iter().map(|p| p.into_affine()).collect();

    let path = output_path(dir, manifest_out.transcript_number);
    write_transcript(&path, &manifest_out, &g1_affine, &g2_affine)?;

    Ok(ShardOutput {
        manifest: manifest_out,
        path,
    })
}

/// Progress units completed by shards strictly before this one, per spec
/// §4.5.3's `calculate_current_progress`.
pub fn initial_progress(manifest: &Manifest) -> u64 {
    let g1 = (manifest.total_g1_points as u64).min(manifest.start_from as u64);
    let g2 = (manifest.total_g2_points as u64).min(manifest.start_from as u64);
    g1 * G1_WEIGHT + g2 * G2_WEIGHT
}

/// Total progress units for a whole ceremony, used as the denominator for
/// percentage reporting.
pub fn total_progress(manifest: &Manifest) -> u64 {
    manifest.total_g1_points as u64 * G1_WEIGHT + manifest.total_g2_points as u64 * G2_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::UniformRand;

    #[test]
    fn exponentiate_g1_matches_direct_scalar_mul() {
        let worker = Worker::new();
        let mut rng = rand::thread_rng();
        let y = Fr::rand(&mut rng);
        let base = G1Projective::from(G1Affine::generator());
        let mut points = vec![base; 6];
        let progress = Progress::new(points.len() as u64);

        exponentiate_g1(&worker, &mut points, y, 0, &progress);

        for (i, point) in points.iter().enumerate() {
            let expected = base * y.pow([(i + 1) as u64]);
            assert_eq!(point.into_affine(), expected.into_affine());
        }
        assert_eq!(progress.done(), 6);
    }

    #[test]
    fn composition_of_two_exponentiations_matches_product() {
        let worker = Worker::new();
        let mut rng = rand::thread_rng();
        let y1 = Fr::rand(&mut rng);
        let y2 = Fr::rand(&mut rng);
        let base = G1Projective::from(G1Affine::generator());

        let mut direct = vec![base; 5];
        let progress = Progress::new(5);
        exponentiate_g1(&worker, &mut direct, y1 * y2, 0, &progress);

        let mut staged = vec![base; 5];
        let progress = Progress::new(5);
        exponentiate_g1(&worker, &mut staged, y1, 0, &progress);
        let progress = Progress::new(5);
        exponentiate_g1(&worker, &mut staged, y2, 0, &progress);

        for (a, b) in direct.iter().zip(staged.iter()) {
            assert_eq!(a.into_affine(), b.into_affine());
        }
    }

    #[test]
    fn process_shard_appends_anchor_only_for_shard_zero() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Worker::new();
        let secret = Secret::from_scalar(Fr::rand(&mut rand::thread_rng()));
        let manifest = Manifest {
            transcript_number: 0,
            total_transcripts: 1,
            total_g1_points: 4,
            total_g2_points: 1,
            num_g1_points: 4,
            num_g2_points: 1,
            start_from: 0,
        };
        let g1 = vec![G1Projective::from(G1Affine::generator()); 4];
        let g2 = vec![G2Projective::from(G2Affine::generator()); 1];
        let progress = Progress::new(total_progress(&manifest));

        let output = process_shard(dir.path(), &worker, &manifest, g1, g2, &secret, &progress).unwrap();
        assert_eq!(output.manifest.num_g2_points, 2);

        let (_, _, g2_out) = crate::transcript::read_transcript(&output.path).unwrap();
        assert_eq!(g2_out.len(), 2);
    }
}
