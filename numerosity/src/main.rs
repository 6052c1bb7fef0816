//! # Numerosity trainer
//!
//! Loads an experiment configuration, applies command-line overrides, trains
//! through the curriculum and prints the evaluation summary.

use anyhow::Result;
use clap::Parser;
use numerosity::{app, ExperimentConfig};
use rl::TracingSink;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Train a Q-learning agent on the numerosity grid world")]
struct Cli {
    /// JSON experiment file; defaults to the reference experiment.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    episodes_per_phase: Option<usize>,
    #[arg(long)]
    eval_episodes: Option<usize>,
    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.set_seed(seed);
    }
    if let Some(n) = cli.episodes_per_phase {
        config.env.n_episodes_per_phase = n;
    }
    if let Some(n) = cli.eval_episodes {
        config.eval_episodes = n;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let summary = app::run(&config, TracingSink)?;
    for (index, report) in summary.phases.iter().enumerate() {
        println!(
            "phase {index}: max objects {}, accuracy {:.3}, mean reward {:.3}",
            report.phase.max_episode_objects,
            report.summary.accuracy(),
            report.summary.mean_reward()
        );
    }
    println!(
        "evaluation: {} episodes, accuracy {:.3}, mean reward {:.3}, mean length {:.2}",
        summary.evaluation.episodes,
        summary.evaluation.accuracy(),
        summary.evaluation.mean_reward(),
        summary.evaluation.mean_length()
    );
    println!(
        "steps {}, distinct states visited {}",
        summary.global_step, summary.visited_states
    );
    Ok(())
}
