//! Manifest-set verifier CLI, grounded on `verify-set/main.cpp`: checks a
//! whole ceremony's shard manifests chain together and sum to the declared
//! totals (spec §4.6.4, §4.6.5).

use std::path::PathBuf;
use std::process::ExitCode;

use tau_ceremony::transcript::read_manifest;
use tau_ceremony::verifier::{validate_manifest_chain, validate_manifest_set};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "verify_set=info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        anyhow::bail!("usage: verify_set <total_g1> <total_g2> <transcript path>...");
    }
    let total_g1: u32 = args[0].parse()?;
    let total_g2: u32 = args[1].parse()?;
    let paths: Vec<PathBuf> = args[2..].iter().map(PathBuf::from).collect();

    let manifests = paths
        .iter()
        .map(|path| read_manifest(path))
        .collect::<Result<Vec<_>, _>>()?;

    for pair in manifests.windows(2) {
        validate_manifest_chain(&pair[0], &pair[1])?;
    }
    validate_manifest_set(&manifests, total_g1, total_g2)?;

    println!("set of {} transcripts verified", manifests.len());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "set verification failed");
            ExitCode::FAILURE
        }
    }
}
