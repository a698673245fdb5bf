//! Single-transcript verifier CLI (spec §4.6.3).
//!
//! Verifies one output transcript's powering sequence, and optionally its
//! chain linkage to the shard-0 output of the previous participant.

use std::path::PathBuf;
use std::process::ExitCode;

use ark_bn254::{G1Affine, G2Affine};
use ark_ec::AffineRepr;

use tau_ceremony::multicore::Worker;
use tau_ceremony::transcript::read_transcript;
use tau_ceremony::verifier::validate_transcript;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "verify=info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let current = PathBuf::from(args.first().ok_or_else(|| {
        anyhow::anyhow!("usage: verify <current_transcript> [<previous_transcript>]")
    })?);
    let previous = args.get(1).map(PathBuf::from);

    let (manifest, g1, g2) = read_transcript(&current)?;
    let is_genesis_shard = manifest.transcript_number == 0;

    // Shard 0 carries a trailing anchor point (this round's secret times G2,
    // appended by `process_shard`) that is not part of the real sequence.
    let g2_real: &[G2Affine] = if is_genesis_shard {
        &g2[..g2.len().saturating_sub(1)]
    } else {
        &g2
    };

    let g1_0 = *g1
        .first()
        .ok_or_else(|| anyhow::anyhow!("transcript has no G1 points"))?;
    let g2_0 = *g2_real
        .first()
        .ok_or_else(|| anyhow::anyhow!("transcript has no G2 points"))?;

    let previous_anchor = match &previous {
        None => None,
        Some(path) => {
            if !is_genesis_shard {
                anyhow::bail!("chain linkage only applies to a genesis shard's trailing anchor");
            }
            let (prev_manifest, prev_g1, _) = read_transcript(path)?;
            if prev_manifest.transcript_number != 0 {
                anyhow::bail!("only the genesis shard of a participant carries a chain anchor");
            }
            let g1_prev_first = *prev_g1
                .first()
                .ok_or_else(|| anyhow::anyhow!("previous transcript has no G1 points"))?;
            let g2_anchor = *g2
                .last()
                .ok_or_else(|| anyhow::anyhow!("transcript has no trailing anchor"))?;
            Some((g1_prev_first, g2_anchor))
        }
    };

    let mut g1_x = Vec::with_capacity(g1.len() + 1);
    g1_x.push(G1Affine::generator());
    g1_x.extend_from_slice(&g1);

    let mut g2_x = Vec::with_capacity(g2_real.len() + 1);
    g2_x.push(G2Affine::generator());
    g2_x.extend_from_slice(g2_real);

    let worker = Worker::new();
    validate_transcript(&worker, g1_0, g2_0, &g1_x, &g2_x, previous_anchor)?;
    println!("transcript {} verified", manifest.transcript_number);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "verification failed");
            ExitCode::FAILURE
        }
    }
}
