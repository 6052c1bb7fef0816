use gridworld::{ConfigError, EnvError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{field} must be {constraint}")]
    Invalid {
        field: &'static str,
        constraint: &'static str,
    },
    #[error("predictor maps {inputs} inputs to {actions} actions, environment needs {obs_size} -> {n_actions}")]
    PredictorShape {
        inputs: usize,
        actions: usize,
        obs_size: usize,
        n_actions: usize,
    },
    #[error("curriculum has no phases")]
    EmptyCurriculum,
}
