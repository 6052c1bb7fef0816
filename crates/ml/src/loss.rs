//! Regression losses on a single prediction, returning value and gradient.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// Huber loss with threshold 1.
    #[default]
    SmoothL1,
    Mse,
}

impl Loss {
    /// Loss and `d loss / d pred`.
    #[must_use]
    pub fn eval(self, pred: f32, target: f32) -> (f32, f32) {
        match self {
            Self::SmoothL1 => smooth_l1(pred, target),
            Self::Mse => {
                let d = pred - target;
                (d * d, 2.0 * d)
            }
        }
    }
}

#[must_use]
pub fn smooth_l1(pred: f32, target: f32) -> (f32, f32) {
    let d = pred - target;
    if d.abs() < 1.0 {
        (0.5 * d * d, d)
    } else {
        (d.abs() - 0.5, d.signum())
    }
}
