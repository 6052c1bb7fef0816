#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Numerosity Q-learning
//!
//! Deep Q-learning over the [`gridworld`] environment with any
//! [`ml::QFunction`] as predictor.
//!
//! -   [`ReplayMemory`] stores transitions in a fixed-capacity ring and
//!     samples uniform batches without replacement.
//! -   [`Trainer`] runs a [`Curriculum`] of phases with a growing object
//!     ceiling, performs one TD update per environment step against a
//!     periodically synced target predictor, and evaluates greedily.
//! -   [`MetricsSink`] receives the training scalars.

pub mod curriculum;
pub mod error;
pub mod metrics;
pub mod replay;
pub mod trainer;

pub use curriculum::{Curriculum, CurriculumPhase};
pub use error::TrainError;
pub use metrics::{MemorySink, MetricsSink, NullSink, Scalar, TracingSink};
pub use replay::{ReplayMemory, Transition};
pub use trainer::{EpisodeStats, EpisodeSummary, PhaseReport, Trainer, TrainerConfig};
