//! # Numerosity
//!
//! Training an agent to count the objects in a small grid scene by moving
//! two cursors and writing marks on a scratch canvas.
//!
//! ## The Crates
//!
//! -   **`numerosity`:** this crate. Experiment configuration and the
//!     training binary that drives a full curriculum and evaluates the
//!     result.
//! -   **[`gridworld`]:** the environment. Scene generation, the composable
//!     action space, fingers and canvas, the four-layer observation, reward
//!     shaping with a curiosity bonus, and action selection.
//! -   **[`ml`]:** the [`ml::QFunction`] predictor interface and a dense
//!     Q-network trained on the CPU.
//! -   **[`rl`]:** replay memory, curriculum phases, target-network sync and
//!     greedy evaluation.
//!
//! ## Getting Started
//!
//! ```text
//! numerosity --print-config > experiment.json
//! numerosity --config experiment.json --seed 7
//! ```
//!
//! Set `RUST_LOG=info` to follow phase boundaries and the final evaluation,
//! or `RUST_LOG=metrics=trace` for every training scalar.

pub mod app;
pub mod config;

pub use config::ExperimentConfig;
pub use gridworld;
pub use ml;
pub use rl;
