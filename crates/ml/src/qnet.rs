//! # Dense Q-network
//!
//! A ReLU multilayer perceptron mapping a flattened observation to one
//! Q-value per action, trained on batches of [`QTarget`]s.

use crate::error::MlError;
use crate::loss::Loss;
use crate::nn::{Dense, Relu, Sequential};
use crate::optim::{Optimizer, OptimizerConfig};
use crate::tensor::Tensor;
use crate::{QFunction, QTarget};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QNetworkConfig {
    /// Widths of the hidden layers.
    pub hidden: Vec<usize>,
    pub optimizer: OptimizerConfig,
    pub loss: Loss,
    /// Seed for the weight initialisation.
    pub seed: u64,
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self {
            hidden: vec![32, 32],
            optimizer: OptimizerConfig::default(),
            loss: Loss::SmoothL1,
            seed: 0,
        }
    }
}

impl QNetworkConfig {
    /// # Errors
    ///
    /// Fails on a zero-width hidden layer or a non-positive learning rate.
    pub fn validate(&self) -> Result<(), MlError> {
        if let Some(index) = self.hidden.iter().position(|&w| w == 0) {
            return Err(MlError::ZeroWidth { index });
        }
        let lr = self.optimizer.lr();
        if !lr.is_finite() || lr <= 0.0 {
            return Err(MlError::NotPositive {
                field: "lr",
                value: lr,
            });
        }
        Ok(())
    }
}

pub struct QNetwork {
    net: Sequential,
    optimizer: Box<dyn Optimizer>,
    loss: Loss,
    n_inputs: usize,
    n_actions: usize,
}

impl QNetwork {
    /// # Errors
    ///
    /// Fails when either dimension is zero or `config` is invalid.
    pub fn new(
        n_inputs: usize,
        n_actions: usize,
        config: &QNetworkConfig,
    ) -> Result<Self, MlError> {
        if n_inputs == 0 || n_actions == 0 {
            return Err(MlError::EmptyShape {
                inputs: n_inputs,
                outputs: n_actions,
            });
        }
        config.validate()?;

        let mut rng = fastrand::Rng::with_seed(config.seed);
        let mut net = Sequential::new();
        let mut width = n_inputs;
        for &hidden in &config.hidden {
            net.push(Dense::glorot(width, hidden, &mut rng));
            net.push(Relu);
            width = hidden;
        }
        net.push(Dense::glorot(width, n_actions, &mut rng));

        tracing::debug!(n_inputs, n_actions, hidden = ?config.hidden, "q-network built");
        Ok(Self {
            net,
            optimizer: config.optimizer.build(),
            loss: config.loss,
            n_inputs,
            n_actions,
        })
    }

    /// Total number of trainable scalars.
    #[must_use]
    pub fn n_params(&self) -> usize {
        self.net.params().iter().map(|p| p.len()).sum()
    }
}

impl QFunction for QNetwork {
    fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn q_values(&self, state: &[f32]) -> Vec<f32> {
        let x = Tensor::from_vec(vec![state.len()], state.to_vec());
        self.net.forward(&x).0.data
    }

    fn fit(&mut self, batch: &[QTarget<'_>]) -> f32 {
        if batch.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / batch.len() as f32;

        let mut grads: Vec<Tensor> = self
            .net
            .params()
            .into_iter()
            .map(Tensor::zeros_like)
            .collect();
        let mut total = 0.0;
        for sample in batch {
            let x = Tensor::from_vec(vec![sample.state.len()], sample.state.to_vec());
            let (out, activations) = self.net.forward(&x);
            let (loss, d_pred) = self.loss.eval(out.data[sample.action], sample.target);
            total += loss;

            let mut d_out = out.zeros_like();
            d_out.data[sample.action] = d_pred;
            let (_, sample_grads) = self.net.backward(&activations, &d_out);
            for (acc, g) in grads.iter_mut().zip(&sample_grads) {
                acc.accumulate(g);
            }
        }
        for g in &mut grads {
            g.scale(scale);
        }

        let mut params = self.net.params_mut();
        self.optimizer.step(&mut params, &grads);
        total * scale
    }

    fn sync_from(&mut self, other: &Self) {
        self.net.copy_params_from(&other.net);
    }
}
