use anyhow::Context;
use clap::Parser;
use holdem_trainer::logging;
use holdem_trainer::solver::Trainer;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a CFR strategy table for the oracle server", long_about = None)]
struct Args {
    /// Sampled deals to train on.
    #[arg(long, default_value_t = 50_000)]
    iterations: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Where to write the strategy JSON.
    #[arg(long, default_value = "plhe_cfr_strategy.json")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = Args::parse();
    anyhow::ensure!(args.iterations > 0, "--iterations must be positive");

    let started = Instant::now();
    let mut trainer = Trainer::new(args.seed);
    let value = trainer.train(args.iterations).context("training failed")?;
    info!(
        iterations = args.iterations,
        infosets = trainer.infosets(),
        game_value = value,
        elapsed = ?started.elapsed(),
        "training complete"
    );

    let table = trainer.strategy();
    table
        .save(&args.out)
        .with_context(|| format!("writing strategy to {}", args.out.display()))?;
    info!(path = %args.out.display(), infosets = table.len(), "strategy saved");
    Ok(())
}
