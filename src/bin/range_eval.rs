//! Range-evaluator CLI (spec §4.8, C10): memory-maps the final SRS and the
//! generator-polynomial file, computes `H_k` for every `k`, and writes the
//! result as fixed-size shards of compressed G1 points (spec §4.9's sharded
//! range-verifier input format).

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use ark_bn254::{Fr, G1Affine};
use ark_ff::{BigInteger256, PrimeField, Zero};
use memmap2::Mmap;

use tau_ceremony::curve::{decode_g1, encode_g1_compressed};
use tau_ceremony::multicore::Worker;
use tau_ceremony::range_eval::evaluate_range_points;
use tau_ceremony::range_verify::SHARD_SIZE;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "range_eval=info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn read_srs(mmap: &Mmap) -> anyhow::Result<Vec<G1Affine>> {
    mmap.chunks_exact(64)
        .enumerate()
        .map(|(i, chunk)| decode_g1(chunk, &format!("srs[{i}]")).map_err(anyhow::Error::from))
        .collect()
}

fn read_generator(mmap: &Mmap) -> Vec<Fr> {
    mmap.chunks_exact(32)
        .map(|chunk| {
            let mut limbs = [0u64; 4];
            for (i, limb) in limbs.iter_mut().enumerate() {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&chunk[i * 8..i * 8 + 8]);
                *limb = u64::from_ne_bytes(buf);
            }
            Fr::from_bigint(BigInteger256::new(limbs)).unwrap_or_else(Fr::zero)
        })
        .collect()
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let srs_path = args.first().ok_or_else(|| {
        anyhow::anyhow!("usage: range_eval <srs_path> <generator_path> <output_dir> [<batch_size>]")
    })?;
    let generator_path = args.get(1).ok_or_else(|| {
        anyhow::anyhow!("usage: range_eval <srs_path> <generator_path> <output_dir> [<batch_size>]")
    })?;
    let output_dir = PathBuf::from(args.get(2).ok_or_else(|| {
        anyhow::anyhow!("usage: range_eval <srs_path> <generator_path> <output_dir> [<batch_size>]")
    })?);
    let batch_size: usize = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(4096);

    std::fs::create_dir_all(&output_dir)?;

    let srs_file = File::open(srs_path)?;
    // SAFETY: the evaluator treats the mapped SRS as read-only for its whole
    // lifetime; no other process is expected to write to it concurrently.
    let srs_mmap = unsafe { Mmap::map(&srs_file)? };
    let srs = read_srs(&srs_mmap)?;

    let generator_file = File::open(generator_path)?;
    let generator_mmap = unsafe { Mmap::map(&generator_file)? };
    let generator = read_generator(&generator_mmap);

    tracing::info!(points = srs.len(), coefficients = generator.len(), "evaluating range points");
    let worker = Worker::new();
    let points = evaluate_range_points(&worker, &generator, &srs, batch_size);

    for (shard_index, shard) in points.chunks(SHARD_SIZE).enumerate() {
        let shard_path = output_dir.join(format!("range_shard{shard_index}.dat"));
        let mut buffer = Vec::with_capacity(shard.len() * 32);
        for point in shard {
            buffer.extend_from_slice(&encode_g1_compressed(point));
        }
        std::fs::write(&shard_path, &buffer)?;
    }

    tracing::info!(points = points.len(), dir = %output_dir.display(), "wrote range evaluation output");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "range evaluation failed");
            ExitCode::FAILURE
        }
    }
}
