//! Point-inspection tool, grounded on `print-point/main.cpp`: prints a
//! transcript's manifest and a single decoded point for ad-hoc debugging.

use std::path::PathBuf;
use std::process::ExitCode;

use tau_ceremony::transcript::read_transcript;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "inspect=warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = PathBuf::from(
        args.first()
            .ok_or_else(|| anyhow::anyhow!("usage: inspect <transcript> <g1|g2> <point_num>"))?,
    );
    let group = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("usage: inspect <transcript> <g1|g2> <point_num>"))?;
    let index: usize = args
        .get(2)
        .ok_or_else(|| anyhow::anyhow!("usage: inspect <transcript> <g1|g2> <point_num>"))?
        .parse()?;

    let (manifest, g1, g2) = read_transcript(&path)?;
    println!(
        "transcript {}: total_transcripts={} total_g1={} total_g2={} start_from={}",
        manifest.transcript_number,
        manifest.total_transcripts,
        manifest.total_g1_points,
        manifest.total_g2_points,
        manifest.start_from
    );

    match group.as_str() {
        "g1" => {
            let point = g1
                .get(index)
                .ok_or_else(|| anyhow::anyhow!("g1 index {index} out of range (len {})", g1.len()))?;
            println!("g1[{index}] x={} y={}", point.x, point.y);
        }
        "g2" => {
            let point = g2
                .get(index)
                .ok_or_else(|| anyhow::anyhow!("g2 index {index} out of range (len {})", g2.len()))?;
            println!(
                "g2[{index}] x=({}, {}) y=({}, {})",
                point.x.c0, point.x.c1, point.y.c0, point.y.c1
            );
        }
        other => anyhow::bail!("unknown group {other:?}, expected g1 or g2"),
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
