//! # Composite State
//!
//! The observation handed to the predictor is four stacked `N x N` layers:
//! scene, scene finger, repr finger and canvas. The same layers, bit-packed,
//! form the [`StateKey`] used to count state visits for the curiosity bonus.

use crate::scene::Grid;
use std::collections::HashMap;

/// Number of stacked layers in a [`CompositeState`].
pub const N_LAYERS: usize = 4;

/// Layer order inside a [`CompositeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Scene = 0,
    SceneFinger = 1,
    ReprFinger = 2,
    Canvas = 3,
}

/// Layer-major `[4][N][N]` tensor of 0.0 / 1.0 values (batch size 1).
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeState {
    dim: usize,
    data: Vec<f32>,
}

impl CompositeState {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; N_LAYERS * dim * dim],
        }
    }

    /// Rebuild every layer from the given grids, in [`Layer`] order.
    pub fn rebuild(&mut self, layers: [&Grid; N_LAYERS]) {
        let area = self.dim * self.dim;
        for (chunk, grid) in self.data.chunks_mut(area.max(1)).zip(layers) {
            debug_assert_eq!(grid.dim(), self.dim);
            grid.write_layer(chunk);
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        [1, N_LAYERS, self.dim, self.dim]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn layer(&self, layer: Layer) -> &[f32] {
        let area = self.dim * self.dim;
        let start = layer as usize * area;
        &self.data[start..start + area]
    }

    #[must_use]
    pub fn key(&self) -> StateKey {
        StateKey::from_bits(self.dim, self.data.iter().map(|&v| v != 0.0))
    }
}

/// Canonical fixed-width encoding of a composite state: one bit per cell,
/// layer-major, packed into 64-bit words.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    dim: usize,
    words: Box<[u64]>,
}

impl StateKey {
    /// Pack grids directly, without going through a float tensor.
    #[must_use]
    pub fn from_layers(layers: [&Grid; N_LAYERS]) -> Self {
        let dim = layers[0].dim();
        Self::from_bits(dim, layers.into_iter().flat_map(Grid::iter))
    }

    fn from_bits(dim: usize, bits: impl Iterator<Item = bool>) -> Self {
        let n_bits = N_LAYERS * dim * dim;
        let mut words = vec![0u64; n_bits.div_ceil(64)];
        for (i, bit) in bits.enumerate() {
            if bit {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        Self {
            dim,
            words: words.into_boxed_slice(),
        }
    }
}

/// Visit counts per canonical state, shared across a whole training run.
#[derive(Clone, Debug, Default)]
pub struct VisitHistory {
    counts: HashMap<StateKey, u32>,
}

impl VisitHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn visits(&self, key: &StateKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Increment the count for `key` and return the count before the increment.
    pub fn record(&mut self, key: StateKey) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        let prior = *count;
        *count = count.saturating_add(1);
        prior
    }

    /// Number of distinct states seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids(dim: usize) -> [Grid; N_LAYERS] {
        std::array::from_fn(|_| Grid::new(dim))
    }

    #[test]
    fn key_matches_tensor_encoding() {
        let mut layers = grids(3);
        layers[0].set(0, 1, true);
        layers[3].set(2, 2, true);
        let refs = [&layers[0], &layers[1], &layers[2], &layers[3]];

        let mut state = CompositeState::new(3);
        state.rebuild(refs);
        assert_eq!(state.key(), StateKey::from_layers(refs));
        assert_eq!(state.layer(Layer::Scene)[1], 1.0);
        assert_eq!(state.layer(Layer::Canvas)[8], 1.0);
        assert_eq!(state.as_slice().iter().sum::<f32>(), 2.0);
    }

    #[test]
    fn keys_distinguish_layers() {
        let mut a = grids(2);
        let mut b = grids(2);
        a[1].set(0, 0, true);
        b[2].set(0, 0, true);
        let ka = StateKey::from_layers([&a[0], &a[1], &a[2], &a[3]]);
        let kb = StateKey::from_layers([&b[0], &b[1], &b[2], &b[3]]);
        assert_ne!(ka, kb);
    }

    #[test]
    fn record_returns_prior_count() {
        let layers = grids(2);
        let key = StateKey::from_layers([&layers[0], &layers[1], &layers[2], &layers[3]]);
        let mut history = VisitHistory::new();
        assert_eq!(history.record(key.clone()), 0);
        assert_eq!(history.record(key.clone()), 1);
        assert_eq!(history.visits(&key), 2);
        assert_eq!(history.len(), 1);
    }
}
