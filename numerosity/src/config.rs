//! Experiment configuration, loaded from JSON.
//!
//! Every section falls back to the values of the reference experiment, so
//! an empty object `{}` is a complete configuration.

use anyhow::{bail, Context, Result};
use gridworld::{EnvConfig, RewardConfig};
use ml::QNetworkConfig;
use rl::{Curriculum, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Object ceiling of the first curriculum phase; the last phase uses
    /// `env.max_CL_objects`.
    #[serde(rename = "min_CL_objects")]
    pub min_cl_objects: usize,
    pub env: EnvConfig,
    pub reward: RewardConfig,
    pub trainer: TrainerConfig,
    pub network: QNetworkConfig,
    /// Greedy episodes played after training.
    pub eval_episodes: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            min_cl_objects: 3,
            env: EnvConfig::default(),
            reward: RewardConfig {
                time_penalty: Some(0.1),
                ..RewardConfig::default()
            },
            trainer: TrainerConfig::default(),
            network: QNetworkConfig::default(),
            eval_episodes: 500,
        }
    }
}

impl ExperimentConfig {
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails on the first invalid section.
    pub fn validate(&self) -> Result<()> {
        if self.min_cl_objects == 0 || self.min_cl_objects > self.env.max_cl_objects {
            bail!(
                "min_CL_objects must be in 1..={}, got {}",
                self.env.max_cl_objects,
                self.min_cl_objects
            );
        }
        let last_phase = EnvConfig {
            max_episode_objects: self.env.max_cl_objects,
            ..self.env.clone()
        };
        last_phase.validate().context("env")?;
        self.trainer.validate().context("trainer")?;
        self.network.validate().context("network")?;
        Ok(())
    }

    /// Seeds both the trainer and the network initialisation.
    pub fn set_seed(&mut self, seed: u64) {
        self.trainer.seed = seed;
        self.network.seed = seed;
    }

    #[must_use]
    pub fn curriculum(&self) -> Curriculum {
        Curriculum::from_range(
            self.min_cl_objects,
            self.env.max_cl_objects,
            self.env.n_episodes_per_phase,
        )
    }

    /// Flattened observation length expected by the predictor.
    #[must_use]
    pub fn obs_size(&self) -> usize {
        gridworld::N_LAYERS * self.env.obs_dim * self.env.obs_dim
    }
}
