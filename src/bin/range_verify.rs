//! Range-verifier CLI (spec §4.9, C11): loads sharded compressed range
//! points in parallel and checks them against the ceremony's `τ2`/`h`
//! anchors with one aggregated pairing.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use ark_bn254::G1Affine;

use tau_ceremony::curve::{decode_g1, decode_g2};
use tau_ceremony::range_verify::{decode_shard, verify_range_set};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "range_verify=info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let shard_dir = PathBuf::from(args.first().ok_or_else(|| {
        anyhow::anyhow!("usage: range_verify <shard_dir> <num_shards> <anchor_path>")
    })?);
    let num_shards: usize = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("usage: range_verify <shard_dir> <num_shards> <anchor_path>"))?
        .parse()?;
    let anchor_path = args.get(2).ok_or_else(|| {
        anyhow::anyhow!("usage: range_verify <shard_dir> <num_shards> <anchor_path>")
    })?;

    let anchor_bytes = fs::read(anchor_path)?;
    if anchor_bytes.len() != 128 + 64 {
        anyhow::bail!("anchor file must be 192 bytes (tau2 || h)");
    }
    let tau2 = decode_g2(&anchor_bytes[0..128], "tau2")?;
    let h = decode_g1(&anchor_bytes[128..192], "h")?;

    tracing::info!(shards = num_shards, "loading range verification shards");
    let shard_results: Vec<anyhow::Result<Vec<G1Affine>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..num_shards)
            .map(|shard_index| {
                let path = shard_dir.join(format!("range_shard{shard_index}.dat"));
                scope.spawn(move || {
                    let bytes = fs::read(&path)?;
                    decode_shard(&bytes, shard_index).map_err(anyhow::Error::from)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("shard reader thread panicked"))
            .collect()
    });

    let mut points = Vec::new();
    for shard in shard_results {
        points.extend(shard?);
    }

    verify_range_set(&points, tau2, h)?;
    println!("range set of {} points verified", points.len());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "range set verification failed");
            ExitCode::FAILURE
        }
    }
}
