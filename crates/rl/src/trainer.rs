//! # Deep Q-learning driver
//!
//! [`Trainer`] owns the policy and target predictors, the replay memory and
//! the visit history, and threads them through every phase of a
//! [`Curriculum`]. Per environment step it selects an action, stores the
//! transition and performs one optimisation step on a replayed batch.

use crate::curriculum::{Curriculum, CurriculumPhase};
use crate::error::TrainError;
use crate::metrics::MetricsSink;
use crate::replay::{ReplayMemory, Transition};
use gridworld::{EnvConfig, Environment, RewardConfig, VisitHistory};
use ml::{QFunction, QTarget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Discount of the bootstrapped return.
    pub gamma: f32,
    pub batch_size: usize,
    /// Episodes between two target syncs.
    pub target_update: usize,
    pub replay_capacity: usize,
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            gamma: 0.995,
            batch_size: 128,
            target_update: 50,
            replay_capacity: 10_000,
            seed: 0,
        }
    }
}

impl TrainerConfig {
    /// # Errors
    ///
    /// Fails when `gamma` is outside `[0, 1]`, a size is zero, or a batch
    /// could never be drawn because it exceeds the replay capacity.
    pub fn validate(&self) -> Result<(), TrainError> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(TrainError::Invalid {
                field: "gamma",
                constraint: "within [0, 1]",
            });
        }
        let positive = [
            ("batch_size", self.batch_size),
            ("target_update", self.target_update),
            ("replay_capacity", self.replay_capacity),
        ];
        if let Some((field, _)) = positive.into_iter().find(|&(_, v)| v == 0) {
            return Err(TrainError::Invalid {
                field,
                constraint: "positive",
            });
        }
        if self.batch_size > self.replay_capacity {
            return Err(TrainError::Invalid {
                field: "batch_size",
                constraint: "at most replay_capacity",
            });
        }
        Ok(())
    }
}

/// Summary of one training episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: f32,
    pub correct: bool,
}

/// Aggregate over a run of episodes, used for phases and evaluation alike.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EpisodeSummary {
    pub episodes: usize,
    pub correct: usize,
    pub total_reward: f32,
    pub total_steps: usize,
}

impl EpisodeSummary {
    pub fn add(&mut self, stats: EpisodeStats) {
        self.episodes += 1;
        self.correct += usize::from(stats.correct);
        self.total_reward += stats.total_reward;
        self.total_steps += stats.steps;
    }

    /// Fraction of episodes that ended on the correct label.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f32 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.correct as f32 / self.episodes as f32
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_reward(&self) -> f32 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.total_reward / self.episodes as f32
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_length(&self) -> f32 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.total_steps as f32 / self.episodes as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseReport {
    pub phase: CurriculumPhase,
    pub summary: EpisodeSummary,
}

pub struct Trainer<Q: QFunction, M: MetricsSink> {
    config: TrainerConfig,
    env_config: EnvConfig,
    reward: RewardConfig,
    policy: Q,
    target: Q,
    memory: ReplayMemory,
    visits: VisitHistory,
    metrics: M,
    rng: fastrand::Rng,
    global_step: u64,
    syncs: usize,
    phases_run: usize,
}

impl<Q: QFunction, M: MetricsSink> Trainer<Q, M> {
    /// Wire a trainer together and copy the policy into the target.
    ///
    /// `env_config` is the template every phase environment is derived
    /// from; only `max_episode_objects`, `n_episodes_per_phase` and
    /// `CL_phases` are overridden per phase.
    ///
    /// # Errors
    ///
    /// Fails on an invalid trainer config, or when the predictors do not
    /// match the observation and action sizes of `env_config`.
    pub fn new(
        config: TrainerConfig,
        env_config: EnvConfig,
        reward: RewardConfig,
        policy: Q,
        mut target: Q,
        metrics: M,
    ) -> Result<Self, TrainError> {
        config.validate()?;
        let obs_size = gridworld::N_LAYERS * env_config.obs_dim * env_config.obs_dim;
        for q in [&policy, &target] {
            if q.n_inputs() != obs_size || q.n_actions() != env_config.n_actions {
                return Err(TrainError::PredictorShape {
                    inputs: q.n_inputs(),
                    actions: q.n_actions(),
                    obs_size,
                    n_actions: env_config.n_actions,
                });
            }
        }
        target.sync_from(&policy);

        Ok(Self {
            memory: ReplayMemory::new(config.replay_capacity),
            rng: fastrand::Rng::with_seed(config.seed),
            visits: VisitHistory::new(),
            global_step: 0,
            syncs: 0,
            phases_run: 0,
            config,
            env_config,
            reward,
            policy,
            target,
            metrics,
        })
    }

    /// Environment for `phase`, seeded from the run seed and the phase index.
    ///
    /// # Errors
    ///
    /// Propagates environment construction errors.
    pub fn environment_for(
        &self,
        phase: &CurriculumPhase,
        phase_index: usize,
        n_phases: usize,
    ) -> Result<Environment, TrainError> {
        let config = EnvConfig {
            max_episode_objects: phase.max_episode_objects,
            n_episodes_per_phase: phase.n_episodes,
            cl_phases: n_phases,
            ..self.env_config.clone()
        };
        let seed = self
            .config
            .seed
            .wrapping_add(1)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(phase_index as u64);
        Environment::new(config, self.reward, seed).map_err(TrainError::from)
    }

    /// Train through every phase in order. The replay memory, the visit
    /// history and the global step counter carry over phase boundaries.
    ///
    /// # Errors
    ///
    /// Fails on an empty curriculum or when a phase environment cannot be built.
    pub fn run_curriculum(
        &mut self,
        curriculum: &Curriculum,
    ) -> Result<Vec<PhaseReport>, TrainError> {
        if curriculum.is_empty() {
            return Err(TrainError::EmptyCurriculum);
        }
        let mut reports = Vec::with_capacity(curriculum.len());
        for (index, phase) in curriculum.phases().iter().enumerate() {
            let mut env = self.environment_for(phase, index, curriculum.len())?;
            tracing::info!(
                phase = index,
                max_episode_objects = phase.max_episode_objects,
                n_episodes = phase.n_episodes,
                global_step = self.global_step,
                "curriculum phase"
            );
            let summary = self.train_phase(&mut env, phase.n_episodes)?;
            tracing::info!(
                phase = index,
                accuracy = summary.accuracy(),
                mean_reward = summary.mean_reward(),
                "phase finished"
            );
            reports.push(PhaseReport {
                phase: *phase,
                summary,
            });
        }
        Ok(reports)
    }

    /// Run `n_episodes` on `env`, syncing the target every
    /// `target_update` episodes (starting with the first).
    ///
    /// # Errors
    ///
    /// Propagates environment step errors.
    pub fn train_phase(
        &mut self,
        env: &mut Environment,
        n_episodes: usize,
    ) -> Result<EpisodeSummary, TrainError> {
        let mut summary = EpisodeSummary::default();
        let mut sync_reward = 0.0;
        let mut sync_steps = 0usize;

        for episode in 0..n_episodes {
            let stats = self.run_episode(env, episode)?;
            summary.add(stats);
            sync_reward += stats.total_reward;
            sync_steps += stats.steps;

            if episode % self.config.target_update == 0 {
                self.sync_target();
                #[allow(clippy::cast_precision_loss)]
                let mean = sync_reward / sync_steps.max(1) as f32;
                self.metrics
                    .record("reward/mean_per_sync", mean, self.global_step);
                tracing::debug!(episode, mean_reward = mean, "target synced");
                sync_reward = 0.0;
                sync_steps = 0;
            }
        }
        self.phases_run += 1;
        Ok(summary)
    }

    /// Play one episode with exploration, learning after every step.
    ///
    /// # Errors
    ///
    /// Propagates environment step errors.
    pub fn run_episode(
        &mut self,
        env: &mut Environment,
        episode_index: usize,
    ) -> Result<EpisodeStats, TrainError> {
        let mut state = env.reset();
        let mut stats = EpisodeStats {
            steps: 0,
            total_reward: 0.0,
            correct: false,
        };

        loop {
            let q_values = self.policy.q_values(state.as_slice());
            self.global_step += 1;
            let outcome = env.step(&q_values, episode_index, &mut self.visits)?;

            for (label, code) in env.actions().label_codes() {
                self.metrics.record(
                    &format!("q_values/label_{label}"),
                    q_values[code],
                    self.global_step,
                );
            }

            stats.steps += 1;
            stats.total_reward += outcome.reward;
            stats.correct |= outcome.correct_label;

            let next = outcome.next_state;
            self.memory.push(Transition {
                state: state.as_slice().to_vec(),
                action: outcome.action,
                next_state: next.as_ref().map(|s| s.as_slice().to_vec()),
                reward: outcome.reward,
            });

            if let Some(loss) = self.optimize() {
                self.metrics.record("loss/train", loss, self.global_step);
            }

            match next {
                Some(next) => state = next,
                None => break,
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let length = stats.steps as f32;
        self.metrics
            .record("episode/length", length, self.global_step);
        self.metrics.record(
            "episode/correct",
            f32::from(u8::from(stats.correct)),
            self.global_step,
        );
        tracing::trace!(
            episode = episode_index,
            steps = stats.steps,
            reward = stats.total_reward,
            correct = stats.correct,
            "episode"
        );
        Ok(stats)
    }

    /// One gradient step on a replayed batch. Returns `None` without
    /// touching the policy while the memory holds fewer than `batch_size`
    /// transitions.
    pub fn optimize(&mut self) -> Option<f32> {
        let batch = self.memory.sample(self.config.batch_size, &mut self.rng)?;
        let gamma = self.config.gamma;
        let targets: Vec<QTarget<'_>> = batch
            .iter()
            .map(|t| {
                let bootstrap = t.next_state.as_ref().map_or(0.0, |next| {
                    self.target
                        .q_values(next)
                        .into_iter()
                        .fold(f32::NEG_INFINITY, f32::max)
                });
                QTarget {
                    state: &t.state,
                    action: t.action,
                    target: t.reward + gamma * bootstrap,
                }
            })
            .collect();
        Some(self.policy.fit(&targets))
    }

    /// Copy the policy parameters into the target predictor.
    pub fn sync_target(&mut self) {
        self.target.sync_from(&self.policy);
        self.syncs += 1;
    }

    /// Greedy evaluation: exploration parameter zero, no learning, and a
    /// scratch visit history so the training counts stay untouched.
    ///
    /// # Errors
    ///
    /// Propagates environment step errors.
    pub fn evaluate(
        &mut self,
        env: &mut Environment,
        n_episodes: usize,
    ) -> Result<EpisodeSummary, TrainError> {
        let mut scratch = VisitHistory::new();
        let mut summary = EpisodeSummary::default();
        for _ in 0..n_episodes {
            let mut state = env.reset();
            let mut stats = EpisodeStats {
                steps: 0,
                total_reward: 0.0,
                correct: false,
            };
            loop {
                let q_values = self.policy.q_values(state.as_slice());
                let outcome = env.step_with_exploration(&q_values, 0.0, &mut scratch)?;
                stats.steps += 1;
                stats.total_reward += outcome.reward;
                stats.correct |= outcome.correct_label;
                match outcome.next_state {
                    Some(next) => state = next,
                    None => break,
                }
            }
            summary.add(stats);
        }
        tracing::info!(
            episodes = summary.episodes,
            accuracy = summary.accuracy(),
            mean_reward = summary.mean_reward(),
            mean_length = summary.mean_length(),
            "evaluation"
        );
        Ok(summary)
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &Q {
        &self.policy
    }

    #[must_use]
    pub fn target(&self) -> &Q {
        &self.target
    }

    #[must_use]
    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    #[must_use]
    pub fn visits(&self) -> &VisitHistory {
        &self.visits
    }

    #[must_use]
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Environment steps taken across all phases.
    #[must_use]
    pub fn global_step(&self) -> u64 {
        self.global_step
    }

    /// Target syncs performed by training (the initial copy is not counted).
    #[must_use]
    pub fn syncs(&self) -> usize {
        self.syncs
    }

    #[must_use]
    pub fn phases_run(&self) -> usize {
        self.phases_run
    }

    #[must_use]
    pub fn into_policy(self) -> Q {
        self.policy
    }
}
