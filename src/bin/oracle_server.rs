use anyhow::Context;
use clap::Parser;
use holdem_trainer::logging;
use holdem_trainer::oracle::policy::{HeuristicPolicy, PolicyProfile};
use holdem_trainer::oracle::{server, StrategyPolicy};
use holdem_trainer::solver::StrategyTable;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve AI moves for the heads-up trainer over POST /ai-move", long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: String,
    /// Seed the policy RNG for reproducible play.
    #[arg(long)]
    seed: Option<u64>,
    /// Trained strategy table from `train-strategy`; the heuristic covers
    /// whatever it lacks.
    #[arg(long)]
    strategy: Option<PathBuf>,
    #[arg(long, default_value_t = 0.5)]
    tightness: f64,
    #[arg(long, default_value_t = 0.4)]
    aggression: f64,
    #[arg(long, default_value_t = 0.06)]
    bluff: f64,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");
    let args = Args::parse();
    for (name, value) in [("tightness", args.tightness), ("aggression", args.aggression), ("bluff", args.bluff)] {
        anyhow::ensure!((0.0..=1.0).contains(&value), "--{name} must be between 0 and 1, got {value}");
    }
    let profile = PolicyProfile {
        tightness: args.tightness,
        aggression: args.aggression,
        bluff: args.bluff,
        ..PolicyProfile::default()
    };
    let table = match &args.strategy {
        Some(path) => {
            let table = StrategyTable::load(path)
                .with_context(|| format!("loading strategy table {}", path.display()))?;
            info!(path = %path.display(), infosets = table.len(), "loaded strategy table");
            table
        }
        None => StrategyTable::default(),
    };
    let policy = match args.seed {
        Some(seed) => StrategyPolicy::with_seed(table, HeuristicPolicy::with_seed(profile, seed), seed),
        None => StrategyPolicy::new(table, HeuristicPolicy::new(profile)),
    };
    server::run(&args.bind, policy)
        .await
        .with_context(|| format!("oracle server on {} failed", args.bind))
}
