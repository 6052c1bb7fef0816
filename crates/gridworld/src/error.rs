use crate::actions::Action;
use thiserror::Error;

/// Rejected configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("{field} must be finite and {constraint}, got {value}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
        value: f32,
    },
    #[error("max_episode_objects ({episode}) exceeds the label space max_CL_objects ({label_space})")]
    LabelSpaceTooSmall { episode: usize, label_space: usize },
}

/// Failures of [`crate::ActionSelector`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    #[error("softmax temperature must be a number >= 0, got {0}")]
    InvalidTemperature(f32),
    #[error("expected {expected} q-values, got {got}")]
    QValueLength { expected: usize, got: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("invalid environment configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("action selection failed: {0}")]
    Select(#[from] SelectError),
    #[error("action {0} declared by more than one component")]
    DuplicateAction(Action),
    #[error("{n_actions} action codes cannot hold the {declared} declared component actions")]
    ActionSpaceTruncated { n_actions: usize, declared: usize },
    #[error("action space holds {labels} label actions, label space needs {expected}")]
    LabelSpaceMismatch { labels: usize, expected: usize },
    #[error("action code {code} outside [0, {n_actions})")]
    UnknownAction { code: usize, n_actions: usize },
    #[error("episode is done, reset the environment first")]
    EpisodeDone,
}
