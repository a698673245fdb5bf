//! Participant CLI (spec §6.4): drives one participant's contribution to a
//! ceremony directory, either auto-detecting existing shards to process or
//! creating a fresh ceremony from given totals.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use tau_ceremony::driver::{run_cli, run_protocol};
use tau_ceremony::multicore::Worker;
use tau_ceremony::secret::Secret;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "participant=info".into()))
        .with_writer(io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let dir = PathBuf::from(
        args.first()
            .ok_or_else(|| anyhow::anyhow!("usage: participant <transcript_dir> [<initial_g1> [<initial_g2>]]"))?,
    );
    let initial_g1 = args.get(1).map(|s| s.parse()).transpose()?;
    let initial_g2 = args.get(2).map(|s| s.parse()).transpose()?;

    let worker = Worker::new();
    let secret = Secret::random();

    if io::stdin().is_terminal() {
        run_cli(&dir, &worker, &secret, initial_g1, initial_g2)?;
    } else {
        let stdin = io::stdin().lock();
        run_protocol(&dir, &worker, &secret, stdin, io::stdout())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "participant run failed");
            ExitCode::FAILURE
        }
    }
}
