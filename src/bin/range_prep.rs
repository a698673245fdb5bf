//! Range-prep tool, grounded on `range-prep/main.cpp`: prepends `G1::one()`
//! to a raw SRS file and stages the generator-polynomial file alongside it,
//! producing the two inputs `range_eval` expects.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use ark_bn254::G1Affine;
use ark_ec::AffineRepr;

use tau_ceremony::curve::{decode_g1, encode_g1};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "range_prep=info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let srs_path = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("usage: range_prep <srs_path> <generator_path> <output_dir>"))?;
    let generator_path = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("usage: range_prep <srs_path> <generator_path> <output_dir>"))?;
    let output_dir = PathBuf::from(args.get(2).ok_or_else(|| {
        anyhow::anyhow!("usage: range_prep <srs_path> <generator_path> <output_dir>")
    })?);
    fs::create_dir_all(&output_dir)?;

    let srs_bytes = fs::read(srs_path)?;
    let points: Vec<G1Affine> = srs_bytes
        .chunks_exact(64)
        .enumerate()
        .map(|(i, chunk)| decode_g1(chunk, &format!("srs[{i}]")).map_err(anyhow::Error::from))
        .collect::<anyhow::Result<_>>()?;

    let mut prepped = Vec::with_capacity((points.len() + 1) * 64);
    prepped.extend_from_slice(&encode_g1(&G1Affine::generator()));
    for point in &points {
        prepped.extend_from_slice(&encode_g1(point));
    }

    let srs_out = output_dir.join("srs_prepped.dat");
    fs::write(&srs_out, &prepped)?;

    let generator_out = output_dir.join("generator_prepped.dat");
    fs::copy(generator_path, &generator_out)?;

    tracing::info!(
        points = points.len() + 1,
        srs_out = %srs_out.display(),
        generator_out = %generator_out.display(),
        "prepared range-evaluator inputs"
    );
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "range prep failed");
            ExitCode::FAILURE
        }
    }
}
