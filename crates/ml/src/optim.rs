//! Gradient-descent optimizers.

use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

pub trait Optimizer: Send {
    /// Update `params` in place from matching `grads`.
    fn step(&mut self, params: &mut [&mut Tensor], grads: &[Tensor]);
}

/// SGD with classical momentum: `v = mu * v + g`, `p -= lr * v`.
#[derive(Clone, Debug)]
pub struct Sgd {
    lr: f32,
    momentum: f32,
    velocity: Vec<Vec<f32>>,
}

impl Sgd {
    #[must_use]
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            velocity: Vec::new(),
        }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [&mut Tensor], grads: &[Tensor]) {
        if self.velocity.is_empty() {
            self.velocity = params.iter().map(|p| vec![0.0; p.len()]).collect();
        }
        for ((p, g), v) in params.iter_mut().zip(grads).zip(&mut self.velocity) {
            for ((pv, gv), vv) in p.data.iter_mut().zip(&g.data).zip(v.iter_mut()) {
                *vv = self.momentum * *vv + gv;
                *pv -= self.lr * *vv;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: i32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Tensor], grads: &[Tensor]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|p| vec![0.0; p.len()]).collect();
            self.v = params.iter().map(|p| vec![0.0; p.len()]).collect();
        }
        self.t = self.t.saturating_add(1);
        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2 = 1.0 - self.beta2.powi(self.t);
        for (((p, g), m), v) in params
            .iter_mut()
            .zip(grads)
            .zip(&mut self.m)
            .zip(&mut self.v)
        {
            for i in 0..p.len() {
                let gi = g.data[i];
                m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * gi;
                v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * gi * gi;
                let m_hat = m[i] / bias1;
                let v_hat = v[i] / bias2;
                p.data[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
    }
}

/// Serializable choice of optimizer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd { lr: f32, momentum: f32 },
    Adam { lr: f32 },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Sgd {
            lr: 1.5e-3,
            momentum: 0.9,
        }
    }
}

impl OptimizerConfig {
    #[must_use]
    pub fn lr(&self) -> f32 {
        match *self {
            Self::Sgd { lr, .. } | Self::Adam { lr } => lr,
        }
    }

    #[must_use]
    pub fn build(&self) -> Box<dyn Optimizer> {
        match *self {
            Self::Sgd { lr, momentum } => Box::new(Sgd::new(lr, momentum)),
            Self::Adam { lr } => Box::new(Adam::new(lr)),
        }
    }
}
