#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Numerosity Grid World
//!
//! A grid-world environment in which an agent learns to report how many
//! objects a scene holds. The agent controls two cursors ("fingers"), one
//! over the scene and one over a writing surface it can mark, and ends an
//! episode by submitting a numeric label.
//!
//! ## Key Components
//!
//! -   **Scenes:** [`SceneGenerator`] places non-overlapping, non-adjacent
//!     square objects and reports how many it actually drew.
//! -   **Actions:** [`ActionSpaceBuilder`] partitions the integer action codes
//!     among the components; codes are decoded once into [`Action`].
//! -   **Components:** two [`FingerAgent`]s and the
//!     [`ExternalRepresentation`] canvas.
//! -   **Environment:** [`Environment`] composes everything into a
//!     reset/step state machine producing a four-layer [`CompositeState`].
//! -   **Rewards and selection:** [`RewardPolicy`] scores actions (with an
//!     optional curiosity bonus keyed on [`StateKey`]) and [`ActionSelector`]
//!     turns Q-values into an action code.
//!
//! ## Usage
//!
//! ```rust
//! use gridworld::{EnvConfig, Environment, RewardConfig, VisitHistory};
//!
//! let config = EnvConfig { obs_dim: 4, ..EnvConfig::default() };
//! let mut env = Environment::new(config, RewardConfig::default(), 7).unwrap();
//! let mut visits = VisitHistory::new();
//!
//! let state = env.reset();
//! let q_values = vec![0.0; env.action_size()];
//! let outcome = env.step(&q_values, 0, &mut visits).unwrap();
//! assert_eq!(state.as_slice().len(), env.obs_size());
//! assert!(outcome.action < env.action_size());
//! ```

pub mod actions;
pub mod canvas;
pub mod config;
pub mod env;
pub mod error;
pub mod finger;
pub mod reward;
pub mod scene;
pub mod selection;
pub mod state;

pub use actions::{Action, ActionSpace, ActionSpaceBuilder, Direction, Finger};
pub use canvas::{CanvasMode, ExternalRepresentation};
pub use config::{EnvConfig, MIN_EXPLORATION};
pub use env::{Environment, EpisodePhase, StepOutcome};
pub use error::{ConfigError, EnvError, SelectError};
pub use finger::FingerAgent;
pub use reward::{RewardConfig, RewardOutcome, RewardPolicy};
pub use scene::{Grid, Scene, SceneGenerator, SceneParams, Square};
pub use selection::{argmax, epsilon_greedy, softmax_sample, ActionSelector, SelectionPolicy};
pub use state::{CompositeState, Layer, StateKey, VisitHistory, N_LAYERS};
