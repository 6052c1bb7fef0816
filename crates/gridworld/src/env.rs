//! # Numerosity Environment
//!
//! Composes the scene generator, the two fingers and the canvas into a
//! reset/step state machine. Each [`Environment::step`] turns a vector of
//! Q-values into exactly one action, applies it to the one component that
//! owns it, scores it and rebuilds the observation.

use crate::actions::{Action, ActionSpace, ActionSpaceBuilder, Finger};
use crate::canvas::ExternalRepresentation;
use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::finger::FingerAgent;
use crate::reward::{RewardConfig, RewardPolicy};
use crate::scene::{Scene, SceneGenerator};
use crate::selection::ActionSelector;
use crate::state::{CompositeState, VisitHistory};
use std::fmt;

/// Lifecycle of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Ready,
    Done,
}

/// Result of one [`Environment::step`].
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Code of the action taken.
    pub action: usize,
    pub decoded: Action,
    /// Observation after the action, `None` once the episode is over.
    pub next_state: Option<CompositeState>,
    pub reward: f32,
    pub done: bool,
    pub correct_label: bool,
}

pub struct Environment {
    config: EnvConfig,
    actions: ActionSpace,
    selector: ActionSelector,
    reward: RewardPolicy,
    generator: SceneGenerator,
    scene: Scene,
    scene_finger: FingerAgent,
    repr_finger: FingerAgent,
    canvas: ExternalRepresentation,
    state: CompositeState,
    step_counter: usize,
    first_correct_label: bool,
    phase: EpisodePhase,
    rng: fastrand::Rng,
}

impl Environment {
    /// Build an environment and draw its first scene.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config, and when the action space cannot hold
    /// every component action or does not provide exactly `max_CL_objects`
    /// label actions.
    pub fn new(config: EnvConfig, reward: RewardConfig, seed: u64) -> Result<Self, EnvError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(seed);

        let actions = ActionSpaceBuilder::new(config.n_actions)
            .claim(FingerAgent::declared_actions(Finger::Scene))
            .claim(FingerAgent::declared_actions(Finger::Repr))
            .claim(ExternalRepresentation::declared_actions())
            .build()?;
        if actions.truncated() > 0 {
            return Err(EnvError::ActionSpaceTruncated {
                n_actions: config.n_actions,
                declared: EnvConfig::NAMED_ACTIONS,
            });
        }
        if actions.n_labels() != config.max_cl_objects {
            return Err(EnvError::LabelSpaceMismatch {
                labels: actions.n_labels(),
                expected: config.max_cl_objects,
            });
        }

        let dim = config.obs_dim;
        let generator = SceneGenerator::new(config.scene_params());
        let scene = generator.generate(&mut rng);
        let scene_finger =
            FingerAgent::new(Finger::Scene, dim, config.random_finger_position, &mut rng);
        let repr_finger =
            FingerAgent::new(Finger::Repr, dim, config.random_finger_position, &mut rng);
        let canvas = ExternalRepresentation::new(dim, config.canvas_mode);
        let selector = ActionSelector::new(config.selection_policy, actions.len());

        let mut env = Self {
            actions,
            selector,
            reward: RewardPolicy::new(reward),
            generator,
            scene,
            scene_finger,
            repr_finger,
            canvas,
            state: CompositeState::new(dim),
            step_counter: 0,
            first_correct_label: false,
            phase: EpisodePhase::Ready,
            rng,
            config,
        };
        env.build_state();
        tracing::debug!(
            n_actions = env.actions.len(),
            dim,
            max_episode_objects = env.config.max_episode_objects,
            "environment ready"
        );
        Ok(env)
    }

    /// Draw a new scene, reset fingers, canvas and step counter.
    pub fn reset(&mut self) -> CompositeState {
        self.scene = self.generator.generate(&mut self.rng);
        self.scene_finger.reset(&mut self.rng);
        self.repr_finger.reset(&mut self.rng);
        self.canvas.reset();
        self.step_counter = 0;
        self.first_correct_label = false;
        self.phase = EpisodePhase::Ready;
        self.build_state();
        self.state.clone()
    }

    /// Select an action from `q_values` using the exploration profile at
    /// `episode_index`, then apply it.
    ///
    /// # Errors
    ///
    /// See [`Environment::step_with_exploration`].
    pub fn step(
        &mut self,
        q_values: &[f32],
        episode_index: usize,
        visits: &mut VisitHistory,
    ) -> Result<StepOutcome, EnvError> {
        let param = self.config.exploration(episode_index);
        self.step_with_exploration(q_values, param, visits)
    }

    /// Like [`Environment::step`] with an explicit epsilon / temperature.
    ///
    /// # Errors
    ///
    /// Fails when the episode is already done, when `q_values` does not hold
    /// one value per action, or on a negative softmax temperature.
    pub fn step_with_exploration(
        &mut self,
        q_values: &[f32],
        param: f32,
        visits: &mut VisitHistory,
    ) -> Result<StepOutcome, EnvError> {
        self.ensure_ready()?;
        let code = self.selector.choose(q_values, param, &mut self.rng)?;
        self.apply(code, visits)
    }

    /// Apply a specific action code, bypassing selection.
    ///
    /// # Errors
    ///
    /// Fails when the episode is done or `code` is outside the action space.
    pub fn apply(
        &mut self,
        code: usize,
        visits: &mut VisitHistory,
    ) -> Result<StepOutcome, EnvError> {
        self.ensure_ready()?;
        let action = self.actions.decode(code).ok_or(EnvError::UnknownAction {
            code,
            n_actions: self.actions.len(),
        })?;
        self.step_counter += 1;

        match action {
            Action::Move {
                finger: Finger::Scene,
                dir,
            } => self.scene_finger.step(dir),
            Action::Move {
                finger: Finger::Repr,
                dir,
            } => self.repr_finger.step(dir),
            Action::MarkCanvas => self.canvas.draw_point(self.repr_finger.position()),
            Action::SubmitLabel(_) => {}
        }

        // self.state still holds the observation the action was chosen in
        let outcome = self
            .reward
            .evaluate(action, self.scene.label(), || self.state.key(), visits);
        if outcome.correct_label {
            self.first_correct_label = true;
        }

        let done = outcome.correct_label || self.step_counter >= self.config.max_episode_length;
        self.build_state();
        if done {
            self.phase = EpisodePhase::Done;
        }

        tracing::trace!(
            step = self.step_counter,
            action = %action,
            reward = outcome.reward,
            done,
            "environment step"
        );

        Ok(StepOutcome {
            action: code,
            decoded: action,
            next_state: (!done).then(|| self.state.clone()),
            reward: outcome.reward,
            done,
            correct_label: outcome.correct_label,
        })
    }

    fn ensure_ready(&self) -> Result<(), EnvError> {
        match self.phase {
            EpisodePhase::Ready => Ok(()),
            EpisodePhase::Done => Err(EnvError::EpisodeDone),
        }
    }

    fn build_state(&mut self) {
        self.state.rebuild([
            &self.scene.grid,
            self.scene_finger.layer(),
            self.repr_finger.layer(),
            self.canvas.canvas(),
        ]);
    }

    /// Current observation; always reflects the latest action.
    #[must_use]
    pub fn state(&self) -> &CompositeState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    #[must_use]
    pub fn actions(&self) -> &ActionSpace {
        &self.actions
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Ground-truth object count of the current scene.
    #[must_use]
    pub fn label(&self) -> usize {
        self.scene.label()
    }

    #[must_use]
    pub fn scene_finger(&self) -> &FingerAgent {
        &self.scene_finger
    }

    #[must_use]
    pub fn repr_finger(&self) -> &FingerAgent {
        &self.repr_finger
    }

    #[must_use]
    pub fn canvas(&self) -> &ExternalRepresentation {
        &self.canvas
    }

    #[must_use]
    pub fn step_counter(&self) -> usize {
        self.step_counter
    }

    /// Set once a correct label has been submitted in this episode. Only
    /// tracked; rewards do not depend on it.
    #[must_use]
    pub fn first_correct_label(&self) -> bool {
        self.first_correct_label
    }

    #[must_use]
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == EpisodePhase::Done
    }

    /// Length of the flattened observation.
    #[must_use]
    pub fn obs_size(&self) -> usize {
        self.state.as_slice().len()
    }

    #[must_use]
    pub fn action_size(&self) -> usize {
        self.actions.len()
    }
}

impl fmt::Display for Environment {
    /// Scene, scene finger, repr finger and canvas side by side.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grids = [
            &self.scene.grid,
            self.scene_finger.layer(),
            self.repr_finger.layer(),
            self.canvas.canvas(),
        ];
        let rendered: Vec<String> = grids.iter().map(ToString::to_string).collect();
        let rows: Vec<Vec<&str>> = rendered.iter().map(|r| r.lines().collect()).collect();
        writeln!(f, "label={} step={}", self.label(), self.step_counter)?;
        for row in 0..self.config.obs_dim {
            let line: Vec<&str> = rows.iter().map(|r| r[row]).collect();
            writeln!(f, "{}", line.join("  "))?;
        }
        Ok(())
    }
}
