//! Ceremony driver: directory scanning, shard planning, and the stdin
//! command / stdout event control protocol (spec §4.5.2, §4.5.3, §6.3, C7).
//!
//! Ported from `setup-tools/src/setup/setup.cpp`'s `compute_initial_transcripts`
//! / `compute_existing_transcript` plus the binary's stdin loop; the protocol
//! lines (`creating`, `progress`, `wrote`) are emitted verbatim so a
//! controller process speaking the original protocol needs no changes.

use ark_bn254::{G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::AffineRepr;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{self, process_shard, ShardOutput};
use crate::error::CoreResult;
use crate::multicore::Worker;
use crate::progress::Progress;
use crate::secret::Secret;
use crate::transcript::{input_path, read_transcript, Manifest};

/// Computes the shard plan for a brand-new ceremony (spec §4.5.2).
pub fn plan_initial(total_g1: u32, total_g2: u32, points_per_transcript: u32) -> Vec<Manifest> {
    let max_points = total_g1.max(total_g2);
    let total_transcripts = max_points.div_ceil(points_per_transcript).max(1);

    (0..total_transcripts)
        .map(|s| {
            let start_from = s * points_per_transcript;
            let num_g1_points = points_per_transcript.min(total_g1.saturating_sub(start_from));
            let num_g2_points = points_per_transcript.min(total_g2.saturating_sub(start_from));
            Manifest {
                transcript_number: s,
                total_transcripts,
                total_g1_points: total_g1,
                total_g2_points: total_g2,
                num_g1_points,
                num_g2_points,
                start_from,
            }
        })
        .collect()
}

/// Creates every initial shard of a fresh ceremony, announcing expected
/// sizes on `out` before computing, and a `wrote <n>` line after each shard.
pub fn create_initial(
    dir: &Path,
    worker: &Worker,
    total_g1: u32,
    total_g2: u32,
    points_per_transcript: u32,
    secret: &Secret,
    out: &mut impl Write,
) -> CoreResult<Vec<ShardOutput>> {
    let manifests = plan_initial(total_g1, total_g2, points_per_transcript);

    let sizes: Vec<String> = manifests
        .iter()
        .map(|m| format!("{}:{}", m.transcript_number, m.transcript_size()))
        .collect();
    writeln!(out, "creating {}", sizes.join(" ")).ok();

    let total = engine::total_progress(&Manifest {
        total_g1_points: total_g1,
        total_g2_points: total_g2,
        ..Default::default()
    });
    let progress_counter = Arc::new(AtomicU64::new(0));

    let mut outputs = Vec::with_capacity(manifests.len());
    for manifest in &manifests {
        let g1 = vec![G1Projective::from(G1Affine::generator()); manifest.num_g1_points as usize];
        let g2 = vec![G2Projective::from(G2Affine::generator()); manifest.num_g2_points as usize];

        let output = run_shard_with_reporting(
            dir,
            worker,
            manifest,
            g1,
            g2,
            secret,
            &progress_counter,
            total,
            out,
        )?;
        writeln!(out, "wrote {}", output.manifest.transcript_number).ok();
        outputs.push(output);
    }
    Ok(outputs)
}

/// Consumes `transcript<n>.dat` and produces `transcript<n>_out.dat` (spec
/// §4.5.3).
pub fn process_existing(
    dir: &Path,
    worker: &Worker,
    n: u32,
    secret: &Secret,
    out: &mut impl Write,
) -> CoreResult<ShardOutput> {
    let path = input_path(dir, n);
    let (mut manifest, g1_affine, mut g2_affine) = read_transcript(&path)?;

    if n == 0 {
        g2_affine.pop();
        manifest.num_g2_points -= 1;
    }

    let total = engine::total_progress(&manifest);
    let progress_counter = Arc::new(AtomicU64::new(engine::initial_progress(&manifest)));

    let g1: Vec<G1Projective> = g1_affine.into_iter().map(G1Projective::from).collect();
    let g2: Vec<G2Projective> = g2_affine.into_iter().map(G2Projective::from).collect();

    let output = run_shard_with_reporting(
        dir, worker, &manifest, g1, g2, secret, &progress_counter, total, out,
    )?;
    writeln!(out, "wrote {}", output.manifest.transcript_number).ok();
    Ok(output)
}

/// Runs one shard and, concurrently, emits a `progress <percent>` line once
/// a second (spec §6.3) until the shard completes.
fn run_shard_with_reporting(
    dir: &Path,
    worker: &Worker,
    manifest: &Manifest,
    g1: Vec<G1Projective>,
    g2: Vec<G2Projective>,
    secret: &Secret,
    progress_counter: &Arc<AtomicU64>,
    total: u64,
    out: &mut impl Write,
) -> CoreResult<ShardOutput> {
    let progress = Progress::new(total);
    let baseline = progress_counter.load(Ordering::Relaxed);
    progress.add(baseline);

    let result = std::thread::scope(|scope| {
        let progress_ref = &progress;
        let handle = scope.spawn(move || {
            process_shard(dir, worker, manifest, g1, g2, secret, progress_ref)
        });

        while !handle.is_finished() {
            std::thread::sleep(Duration::from_secs(1));
            let done = progress.done();
            let percent = if total == 0 {
                100.0
            } else {
                done as f64 / (total as f64 / 100.0)
            };
            writeln!(out, "progress {percent}").ok();
        }
        handle.join().expect("shard worker thread panicked")
    })?;

    progress_counter.store(progress.done(), Ordering::Relaxed);
    Ok(result)
}

/// Returns the highest shard index `n` for which `transcript<n>.dat`
/// exists in `dir`, or `None` if shard 0 is absent.
pub fn detect_existing_shards(dir: &Path) -> Option<u32> {
    if !input_path(dir, 0).exists() {
        return None;
    }
    let mut n = 0;
    while input_path(dir, n + 1).exists() {
        n += 1;
    }
    Some(n)
}

/// Runs the stdin/stdout control protocol of spec §6.3: reads
/// newline-delimited commands from `input` and drives the engine, writing
/// protocol events to `output`. Diagnostics go through `tracing`, which the
/// caller configures to target stderr.
pub fn run_protocol(
    dir: &Path,
    worker: &Worker,
    secret: &Secret,
    input: impl BufRead,
    mut output: impl Write,
) -> CoreResult<()> {
    for line in input.lines() {
        let line = line.map_err(|e| crate::error::CoreError::io(dir, e))?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["create", total_g1, total_g2, points_per_transcript] => {
                let total_g1: u32 = total_g1.parse().unwrap_or(0);
                let total_g2: u32 = total_g2.parse().unwrap_or(0);
                let points_per_transcript: u32 = points_per_transcript.parse().unwrap_or(1);
                create_initial(
                    dir,
                    worker,
                    total_g1,
                    total_g2,
                    points_per_transcript,
                    secret,
                    &mut output,
                )?;
            }
            ["process", n] => {
                let n: u32 = n.parse().unwrap_or(0);
                process_existing(dir, worker, n, secret, &mut output)?;
            }
            [] => {}
            _ => {
                tracing::warn!(%line, "unrecognized control command, ignoring");
            }
        }
    }
    Ok(())
}

/// Implements the CLI surface of spec §6.4 directly: auto-detect mode with
/// one argument, initial-creation mode with two or three.
pub fn run_cli(
    dir: &Path,
    worker: &Worker,
    secret: &Secret,
    initial_g1: Option<u32>,
    initial_g2: Option<u32>,
) -> CoreResult<()> {
    let mut stdout = std::io::stdout();
    match initial_g1 {
        None => match detect_existing_shards(dir) {
            Some(last) => {
                for n in 0..=last {
                    process_existing(dir, worker, n, secret, &mut stdout)?;
                }
                Ok(())
            }
            None => Err(crate::error::CoreError::FormatError {
                path: input_path(dir, 0),
                reason: "no existing transcripts found and no initial totals given".to_string(),
            }),
        },
        Some(total_g1) => {
            let total_g2 = initial_g2.unwrap_or(1);
            create_initial(dir, worker, total_g1, total_g2, total_g1.max(1), secret, &mut stdout)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_initial_matches_sharded_scenario() {
        let manifests = plan_initial(17, 5, 8);
        assert_eq!(manifests.len(), 3);
        assert_eq!(
            manifests.iter().map(|m| m.num_g1_points).collect::<Vec<_>>(),
            vec![8, 8, 1]
        );
        assert_eq!(
            manifests.iter().map(|m| m.num_g2_points).collect::<Vec<_>>(),
            vec![5, 0, 0]
        );
        assert_eq!(
            manifests.iter().map(|m| m.start_from).collect::<Vec<_>>(),
            vec![0, 8, 16]
        );
    }

    #[test]
    fn plan_initial_genesis_scenario() {
        let manifests = plan_initial(8, 2, 8);
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].num_g1_points, 8);
        assert_eq!(manifests[0].num_g2_points, 2);
    }

    #[test]
    fn create_initial_then_process_existing_composes_secrets() {
        use ark_bn254::Fr;
        use ark_ec::CurveGroup;
        use ark_std::UniformRand;

        let dir = tempfile::tempdir().unwrap();
        let worker = Worker::new();
        let mut rng = rand::thread_rng();
        let y_a = Fr::rand(&mut rng);
        let y_b = Fr::rand(&mut rng);

        let mut sink = Vec::new();
        create_initial(
            dir.path(),
            &worker,
            8,
            2,
            8,
            &Secret::from_scalar(y_a),
            &mut sink,
        )
        .unwrap();

        std::fs::rename(
            dir.path().join("transcript0_out.dat"),
            dir.path().join("transcript0.dat"),
        )
        .unwrap();

        let mut sink = Vec::new();
        let output = process_existing(
            dir.path(),
            &worker,
            0,
            &Secret::from_scalar(y_b),
            &mut sink,
        )
        .unwrap();

        let (_, g1, _) = crate::transcript::read_transcript(&output.path).unwrap();
        let expected = G1Affine::generator() * (y_a * y_b);
        assert_eq!(g1[0], expected.into_affine());
    }
}
