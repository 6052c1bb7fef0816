//! # Experiment driver
//!
//! Builds the policy and target networks, runs the curriculum and evaluates
//! the trained policy greedily on the last phase.

use crate::config::ExperimentConfig;
use anyhow::{Context, Result};
use ml::QNetwork;
use rl::{EpisodeSummary, MetricsSink, PhaseReport, Trainer};

/// What a finished run reports.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub phases: Vec<PhaseReport>,
    pub evaluation: EpisodeSummary,
    pub global_step: u64,
    pub visited_states: usize,
}

/// Train and evaluate one experiment, sending scalars to `metrics`.
///
/// # Errors
///
/// Returns configuration errors and any error raised while training.
pub fn run<M: MetricsSink>(config: &ExperimentConfig, metrics: M) -> Result<RunSummary> {
    config.validate()?;
    let n_inputs = config.obs_size();
    let n_actions = config.env.n_actions;
    let policy =
        QNetwork::new(n_inputs, n_actions, &config.network).context("policy network")?;
    let target =
        QNetwork::new(n_inputs, n_actions, &config.network).context("target network")?;
    tracing::info!(
        n_inputs,
        n_actions,
        params = policy.n_params(),
        "networks ready"
    );

    let mut trainer = Trainer::new(
        config.trainer,
        config.env.clone(),
        config.reward,
        policy,
        target,
        metrics,
    )?;

    let curriculum = config.curriculum();
    tracing::info!(
        phases = curriculum.len(),
        episodes = curriculum.total_episodes(),
        "starting curriculum"
    );
    let phases = trainer.run_curriculum(&curriculum)?;

    let evaluation = match curriculum.last() {
        Some(last) if config.eval_episodes > 0 => {
            let mut env =
                trainer.environment_for(last, curriculum.len(), curriculum.len())?;
            trainer.evaluate(&mut env, config.eval_episodes)?
        }
        _ => EpisodeSummary::default(),
    };

    Ok(RunSummary {
        phases,
        evaluation,
        global_step: trainer.global_step(),
        visited_states: trainer.visits().len(),
    })
}
