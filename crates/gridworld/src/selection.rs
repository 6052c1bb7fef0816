//! Action selection from externally supplied Q-values.

use crate::error::SelectError;
use serde::{Deserialize, Serialize};

/// How the exploration parameter is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Parameter is epsilon: random code with that probability, argmax otherwise.
    #[default]
    EpsilonGreedy,
    /// Parameter is the softmax temperature.
    Softmax,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionSelector {
    policy: SelectionPolicy,
    n_actions: usize,
}

impl ActionSelector {
    /// Smallest temperature used before dividing by it.
    pub const MIN_TEMPERATURE: f32 = 1e-8;

    #[must_use]
    pub fn new(policy: SelectionPolicy, n_actions: usize) -> Self {
        Self { policy, n_actions }
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Pick a code in `[0, n_actions)`.
    ///
    /// # Errors
    ///
    /// Fails when `q_values` has the wrong length, or under
    /// [`SelectionPolicy::Softmax`] when `param` is a negative or NaN temperature.
    pub fn choose(
        &self,
        q_values: &[f32],
        param: f32,
        rng: &mut fastrand::Rng,
    ) -> Result<usize, SelectError> {
        if q_values.len() != self.n_actions || q_values.is_empty() {
            return Err(SelectError::QValueLength {
                expected: self.n_actions,
                got: q_values.len(),
            });
        }
        match self.policy {
            SelectionPolicy::EpsilonGreedy => Ok(epsilon_greedy(q_values, param, rng)),
            SelectionPolicy::Softmax => softmax_sample(q_values, param, rng),
        }
    }
}

/// Index of the largest finite value; the first one wins ties.
#[must_use]
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// With probability `1 - eps` the argmax, otherwise a uniform code.
pub fn epsilon_greedy(q_values: &[f32], eps: f32, rng: &mut fastrand::Rng) -> usize {
    if rng.f32() >= eps {
        argmax(q_values)
    } else {
        rng.usize(..q_values.len())
    }
}

/// Sample from `softmax(-q / temperature)`; a zero temperature is greedy.
///
/// # Errors
///
/// Returns [`SelectError::InvalidTemperature`] for a negative or NaN
/// temperature.
pub fn softmax_sample(
    q_values: &[f32],
    temperature: f32,
    rng: &mut fastrand::Rng,
) -> Result<usize, SelectError> {
    if temperature < 0.0 || temperature.is_nan() {
        return Err(SelectError::InvalidTemperature(temperature));
    }
    if temperature == 0.0 {
        return Ok(epsilon_greedy(q_values, 0.0, rng));
    }
    let temperature = f64::from(temperature.max(ActionSelector::MIN_TEMPERATURE));

    let logits: Vec<f64> = q_values
        .iter()
        .map(|&q| -f64::from(q) / temperature)
        .collect();
    let max = logits
        .iter()
        .copied()
        .filter(|l| l.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = logits
        .iter()
        .map(|&l| if l.is_finite() { (l - max).exp() } else { 0.0 })
        .collect();
    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Ok(rng.usize(..q_values.len()));
    }

    let mut r = rng.f64() * total;
    for (i, w) in weights.iter().enumerate() {
        if r < *w {
            return Ok(i);
        }
        r -= w;
    }
    Ok(weights.iter().rposition(|&w| w > 0.0).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, -1.0]), 1);
        assert_eq!(argmax(&[f32::NAN, 0.2]), 1);
    }

    #[test]
    fn zero_temperature_is_greedy() {
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..50 {
            assert_eq!(softmax_sample(&[0.0, 2.0, 1.0], 0.0, &mut rng), Ok(1));
        }
    }

    #[test]
    fn negative_temperature_is_rejected() {
        let mut rng = fastrand::Rng::with_seed(4);
        assert_eq!(
            softmax_sample(&[0.0, 1.0], -0.5, &mut rng),
            Err(SelectError::InvalidTemperature(-0.5))
        );
    }

    #[test]
    fn nan_temperature_is_rejected() {
        let mut rng = fastrand::Rng::with_seed(4);
        let err = softmax_sample(&[0.0, 1.0], f32::NAN, &mut rng).unwrap_err();
        assert!(matches!(err, SelectError::InvalidTemperature(t) if t.is_nan()));
        assert_eq!(
            err.to_string(),
            "softmax temperature must be a number >= 0, got NaN"
        );
    }

    #[test]
    fn softmax_favours_low_q_values() {
        let mut rng = fastrand::Rng::with_seed(9);
        let q = [0.0, 5.0];
        let picks = (0..200)
            .filter(|_| softmax_sample(&q, 1.0, &mut rng) == Ok(0))
            .count();
        assert!(picks > 190, "picked code 0 {picks} times");
    }

    #[test]
    fn wrong_length_is_rejected() {
        let selector = ActionSelector::new(SelectionPolicy::EpsilonGreedy, 3);
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(
            selector.choose(&[1.0], 0.0, &mut rng),
            Err(SelectError::QValueLength {
                expected: 3,
                got: 1,
            })
        );
    }
}
