use std::path::PathBuf;

use clap::Parser;

use cardguess_bench::config::{BenchmarkConfig, ResolvedOutputs};
use cardguess_bench::logging::init_logging;
use cardguess_bench::tournament::TournamentRunner;

/// Round-robin tournament harness for card-guessing bots.
#[derive(Debug, Parser)]
#[command(
    name = "cardguess-bench",
    author,
    version,
    about = "Deterministic card-guessing tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games per pairing.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the round budget of each match.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<u32>,

    /// Override the RNG seed all match and agent seeds derive from.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.matches.games = games;
    }

    if let Some(rounds) = cli.rounds {
        config.matches.max_rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let games = config.matches.games;
    let rounds = config.matches.max_rounds;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agents ({games} games per pairing, up to {rounds} rounds each)"
    );

    let runner = TournamentRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;

    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} pairings → {} matches, {} rows at {}",
        summary.pairings,
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
