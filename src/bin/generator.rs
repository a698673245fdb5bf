//! Generator-polynomial CLI (spec §4.7, §6.2): builds `G(X) = ∏(X−k)` for
//! `k ∈ [0, n]` and writes it as a contiguous native-endian `Fr` array.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use ark_ff::PrimeField;

use tau_ceremony::generator_poly::build_generator_polynomial;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "generator=info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let n: u64 = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("usage: generator <degree_n> <output_path>"))?
        .parse()?;
    let output = PathBuf::from(
        args.get(1)
            .ok_or_else(|| anyhow::anyhow!("usage: generator <degree_n> <output_path>"))?,
    );

    tracing::info!(degree = n, "building generator polynomial");
    let coeffs = build_generator_polynomial(n);

    let mut writer = BufWriter::new(File::create(&output)?);
    for coeff in &coeffs {
        for limb in coeff.into_bigint().0 {
            writer.write_all(&limb.to_ne_bytes())?;
        }
    }
    writer.flush()?;

    tracing::info!(coefficients = coeffs.len(), path = %output.display(), "wrote generator polynomial");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "generator build failed");
            ExitCode::FAILURE
        }
    }
}
