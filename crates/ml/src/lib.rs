#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Q-value predictors
//!
//! The [`QFunction`] trait is everything the training loop needs from a
//! function approximator: Q-values for one observation, a gradient step on
//! a batch of TD targets, and a wholesale parameter copy for target-network
//! sync. [`QNetwork`] is a small dense implementation trained on the CPU.

pub mod error;
pub mod loss;
pub mod nn;
pub mod optim;
pub mod qnet;
pub mod tensor;

pub use error::MlError;
pub use loss::Loss;
pub use nn::{Dense, Layer, Relu, Sequential};
pub use optim::{Adam, Optimizer, OptimizerConfig, Sgd};
pub use qnet::{QNetwork, QNetworkConfig};
pub use tensor::Tensor;

/// Regression target for the Q-value of `action` in `state`.
#[derive(Clone, Copy, Debug)]
pub struct QTarget<'a> {
    pub state: &'a [f32],
    pub action: usize,
    pub target: f32,
}

pub trait QFunction {
    fn n_inputs(&self) -> usize;
    fn n_actions(&self) -> usize;
    /// One value per action for a flattened observation.
    fn q_values(&self, state: &[f32]) -> Vec<f32>;
    /// One optimisation step on `batch`; returns the mean loss before the update.
    fn fit(&mut self, batch: &[QTarget<'_>]) -> f32;
    /// Copy every parameter of `other` into `self`.
    fn sync_from(&mut self, other: &Self)
    where
        Self: Sized;
}
