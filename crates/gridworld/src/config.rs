//! Environment configuration.
//!
//! Field names follow the experiment files used to drive training, so a
//! JSON block like `{"obs_dim": 5, "max_CL_objects": 3, ...}` deserializes
//! directly; missing fields fall back to [`EnvConfig::default`].

use crate::canvas::CanvasMode;
use crate::error::ConfigError;
use crate::scene::SceneParams;
use crate::selection::SelectionPolicy;
use serde::{Deserialize, Serialize};

/// Floor of the decaying exploration parameter.
pub const MIN_EXPLORATION: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Size of the label space, fixed across all curriculum phases.
    #[serde(rename = "max_CL_objects")]
    pub max_cl_objects: usize,
    #[serde(rename = "CL_phases")]
    pub cl_phases: usize,
    /// Object ceiling for scenes of the current phase.
    pub max_episode_objects: usize,
    /// Side of the square grid.
    pub obs_dim: usize,
    pub max_episode_length: usize,
    pub n_actions: usize,
    pub n_episodes_per_phase: usize,
    pub max_object_size: usize,
    /// Exploration parameter when `exponential_decay` is off.
    pub default_eps: f32,
    pub exp_dec_steepness: f32,
    pub generate_random_nobj: bool,
    pub random_object_size: bool,
    pub random_finger_position: bool,
    pub exponential_decay: bool,
    pub canvas_mode: CanvasMode,
    pub selection_policy: SelectionPolicy,
}

impl Default for EnvConfig {
    fn default() -> Self {
        let max_cl_objects = 3;
        Self {
            max_cl_objects,
            cl_phases: 1,
            max_episode_objects: max_cl_objects,
            obs_dim: 5,
            max_episode_length: 1,
            n_actions: Self::n_actions_for(max_cl_objects),
            n_episodes_per_phase: 40_000,
            max_object_size: 2,
            default_eps: 0.1,
            exp_dec_steepness: 5.0,
            generate_random_nobj: true,
            random_object_size: true,
            random_finger_position: false,
            exponential_decay: true,
            canvas_mode: CanvasMode::Monotonic,
            selection_policy: SelectionPolicy::EpsilonGreedy,
        }
    }
}

impl EnvConfig {
    /// Movement codes of both fingers plus the canvas mark.
    pub const NAMED_ACTIONS: usize = 4 + 4 + 1;

    /// Action count giving exactly `max_cl_objects` label actions.
    #[must_use]
    pub const fn n_actions_for(max_cl_objects: usize) -> usize {
        Self::NAMED_ACTIONS + max_cl_objects
    }

    /// Copy of this config with a new label space and matching `n_actions`.
    #[must_use]
    pub fn with_label_space(mut self, max_cl_objects: usize) -> Self {
        self.max_cl_objects = max_cl_objects;
        self.n_actions = Self::n_actions_for(max_cl_objects);
        self
    }

    /// # Errors
    ///
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let at_least = |field, min, value| {
            if value < min {
                Err(ConfigError::TooSmall { field, min, value })
            } else {
                Ok(())
            }
        };
        at_least("obs_dim", 1, self.obs_dim)?;
        at_least("max_episode_objects", 1, self.max_episode_objects)?;
        at_least("max_object_size", 1, self.max_object_size)?;
        at_least("max_episode_length", 1, self.max_episode_length)?;
        at_least("n_episodes_per_phase", 1, self.n_episodes_per_phase)?;
        at_least("n_actions", 1, self.n_actions)?;

        if self.max_episode_objects > self.max_cl_objects {
            return Err(ConfigError::LabelSpaceTooSmall {
                episode: self.max_episode_objects,
                label_space: self.max_cl_objects,
            });
        }
        if !self.default_eps.is_finite() || self.default_eps < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "default_eps",
                constraint: ">= 0",
                value: self.default_eps,
            });
        }
        if !self.exp_dec_steepness.is_finite() || self.exp_dec_steepness <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "exp_dec_steepness",
                constraint: "> 0",
                value: self.exp_dec_steepness,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn scene_params(&self) -> SceneParams {
        SceneParams {
            dim: self.obs_dim,
            max_objects: self.max_episode_objects,
            max_object_size: self.max_object_size,
            random_count: self.generate_random_nobj,
            random_size: self.random_object_size,
        }
    }

    /// Exploration parameter (epsilon or temperature) for an episode index.
    ///
    /// With `exponential_decay` the profile starts at 1 and decays so that
    /// its shape does not depend on the phase length:
    /// `steepness * decay^t / steepness` with
    /// `decay = exp(-ln(steepness) / n_episodes_per_phase * 6)`.
    #[must_use]
    pub fn exploration(&self, episode_index: usize) -> f32 {
        if !self.exponential_decay {
            return self.default_eps;
        }
        let steepness = f64::from(self.exp_dec_steepness);
        #[allow(clippy::cast_precision_loss)]
        let n = self.n_episodes_per_phase.max(1) as f64;
        let decay = (-steepness.ln() / n * 6.0).exp();
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let value = (steepness * decay.powf(episode_index as f64) / steepness) as f32;
        value.max(MIN_EXPLORATION)
    }
}
