//! Reward shaping: label reward, wrong-label punishment, curiosity bonus and
//! time penalty.

use crate::actions::Action;
use crate::state::{StateKey, VisitHistory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Give `-0.5` for a wrong label instead of `0`.
    pub bad_label_punishment: bool,
    /// Add a count-based novelty bonus.
    pub curiosity: bool,
    /// Fixed amount subtracted on every step; `None` disables it.
    pub time_penalty: Option<f32>,
    /// The larger the bending, the slower the bonus decays with visits.
    pub curiosity_bending: f32,
    /// Bonus for a never-visited state.
    pub curiosity_scale: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            bad_label_punishment: true,
            curiosity: false,
            time_penalty: None,
            curiosity_bending: 0.4,
            curiosity_scale: 0.1,
        }
    }
}

/// Reward for one step plus whether the step submitted the correct label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardOutcome {
    pub reward: f32,
    pub correct_label: bool,
}

#[derive(Debug, Clone)]
pub struct RewardPolicy {
    config: RewardConfig,
}

impl RewardPolicy {
    pub const CORRECT_LABEL: f32 = 1.0;
    pub const WRONG_LABEL: f32 = -0.5;

    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Score `action` against the scene's true label.
    ///
    /// `state_key` is only evaluated when curiosity is enabled; the visit
    /// count for that key is read first and then incremented.
    pub fn evaluate(
        &self,
        action: Action,
        true_label: usize,
        state_key: impl FnOnce() -> StateKey,
        visits: &mut VisitHistory,
    ) -> RewardOutcome {
        let mut reward = 0.0;
        let mut correct_label = false;

        if let Action::SubmitLabel(label) = action {
            if label == true_label {
                reward = Self::CORRECT_LABEL;
                correct_label = true;
            } else if self.config.bad_label_punishment {
                reward = Self::WRONG_LABEL;
            }
        }

        if self.config.curiosity {
            let n_visits = visits.record(state_key());
            reward += self.curiosity_bonus(n_visits);
        }

        if let Some(penalty) = self.config.time_penalty {
            reward -= penalty;
        }

        RewardOutcome {
            reward,
            correct_label,
        }
    }

    /// `bending / (bending + n_visits) * scale`.
    #[must_use]
    pub fn curiosity_bonus(&self, n_visits: u32) -> f32 {
        let bending = self.config.curiosity_bending;
        #[allow(clippy::cast_precision_loss)]
        let n = n_visits as f32;
        bending / (bending + n) * self.config.curiosity_scale
    }
}
