//! # Layers
//!
//! CPU layers with explicit forward and backward passes. A [`Sequential`]
//! keeps the activations of a forward pass so the backward pass can walk
//! them in reverse.

use crate::tensor::Tensor;

/// A differentiable layer.
pub trait Layer: Send {
    fn forward(&self, x: &Tensor) -> Tensor;
    /// Gradient with respect to the input, plus one gradient per parameter
    /// in [`Layer::params`] order.
    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>);
    fn params(&self) -> Vec<&Tensor> {
        Vec::new()
    }
    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }
}

/// A fully connected layer `y = W x + b`.
#[derive(Clone, Debug)]
pub struct Dense {
    /// `[out_dim, in_dim]` weights.
    pub w: Tensor,
    pub b: Tensor,
    in_dim: usize,
    out_dim: usize,
}

impl Dense {
    /// # Panics
    ///
    /// Panics if the buffers do not match `in_dim` and `out_dim`.
    #[must_use]
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_dim: usize, out_dim: usize) -> Self {
        assert_eq!(weights.len(), in_dim * out_dim);
        assert_eq!(bias.len(), out_dim);
        Self {
            w: Tensor::from_vec(vec![out_dim, in_dim], weights),
            b: Tensor::from_vec(vec![out_dim], bias),
            in_dim,
            out_dim,
        }
    }

    /// Glorot-uniform weights and zero bias.
    #[must_use]
    pub fn glorot(in_dim: usize, out_dim: usize, rng: &mut fastrand::Rng) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let limit = (6.0 / (in_dim + out_dim) as f32).sqrt();
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        Self::new(weights, vec![0.0; out_dim], in_dim, out_dim)
    }

    #[must_use]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[must_use]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }
}

impl Layer for Dense {
    fn forward(&self, x: &Tensor) -> Tensor {
        let mut y = self.b.data.clone();
        for (o, out) in y.iter_mut().enumerate() {
            let row = &self.w.data[o * self.in_dim..(o + 1) * self.in_dim];
            *out += row.iter().zip(&x.data).map(|(w, v)| w * v).sum::<f32>();
        }
        Tensor::from_vec(vec![self.out_dim], y)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut grad_input = vec![0.0; self.in_dim];
        let mut grad_w = vec![0.0; self.in_dim * self.out_dim];
        for (o, &go) in grad.data.iter().enumerate() {
            for i in 0..self.in_dim {
                grad_w[o * self.in_dim + i] = go * x.data[i];
                grad_input[i] += self.w.data[o * self.in_dim + i] * go;
            }
        }
        (
            Tensor::from_vec(vec![self.in_dim], grad_input),
            vec![
                Tensor::from_vec(vec![self.out_dim, self.in_dim], grad_w),
                grad.clone(),
            ],
        )
    }

    fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Layer for Relu {
    fn forward(&self, x: &Tensor) -> Tensor {
        let data = x.data.iter().map(|&v| v.max(0.0)).collect();
        Tensor::from_vec(x.shape.clone(), data)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let data = x
            .data
            .iter()
            .zip(&grad.data)
            .map(|(&v, &g)| if v > 0.0 { g } else { 0.0 })
            .collect();
        (Tensor::from_vec(x.shape.clone(), data), Vec::new())
    }
}

/// Layers applied in order.
#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push(Box::new(layer));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Output plus every intermediate activation, input first.
    #[must_use]
    pub fn forward(&self, x: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut out = x.clone();
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        for layer in &self.layers {
            let next = layer.forward(&out);
            activations.push(out);
            out = next;
        }
        activations.push(out.clone());
        (out, activations)
    }

    /// Input gradient and parameter gradients in [`Sequential::params`] order.
    #[must_use]
    pub fn backward(&self, activations: &[Tensor], grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut grad_out = grad.clone();
        let mut per_layer = Vec::with_capacity(self.layers.len());
        for (layer, input) in self.layers.iter().zip(activations).rev() {
            let (grad_in, param_grads) = layer.backward(input, &grad_out);
            grad_out = grad_in;
            per_layer.push(param_grads);
        }
        (grad_out, per_layer.into_iter().rev().flatten().collect())
    }

    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|l| l.params()).collect()
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers.iter_mut().flat_map(|l| l.params_mut()).collect()
    }

    /// Overwrite every parameter with the matching one of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two networks do not have the same parameter shapes.
    pub fn copy_params_from(&mut self, other: &Sequential) {
        let source = other.params();
        let mut target = self.params_mut();
        assert_eq!(source.len(), target.len());
        for (dst, src) in target.iter_mut().zip(source) {
            assert_eq!(dst.shape, src.shape);
            dst.data.copy_from_slice(&src.data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_forward_and_backward() {
        let layer = Dense::new(vec![1.0, 2.0, 3.0, 4.0], vec![0.5, -0.5], 2, 2);
        let x = Tensor::from_vec(vec![2], vec![1.0, -1.0]);
        let y = layer.forward(&x);
        assert_eq!(y.data, vec![-0.5, -1.5]);

        let (dx, grads) = layer.backward(&x, &Tensor::from_vec(vec![2], vec![1.0, 0.0]));
        assert_eq!(dx.data, vec![1.0, 2.0]);
        assert_eq!(grads[0].data, vec![1.0, -1.0, 0.0, 0.0]);
        assert_eq!(grads[1].data, vec![1.0, 0.0]);
    }

    #[test]
    fn relu_masks_gradient() {
        let x = Tensor::from_vec(vec![3], vec![-1.0, 0.0, 2.0]);
        assert_eq!(Relu.forward(&x).data, vec![0.0, 0.0, 2.0]);
        let (dx, _) = Relu.backward(&x, &Tensor::from_vec(vec![3], vec![1.0, 1.0, 1.0]));
        assert_eq!(dx.data, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn sequential_gradients_follow_param_order() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut net = Sequential::new();
        net.push(Dense::glorot(3, 4, &mut rng));
        net.push(Relu);
        net.push(Dense::glorot(4, 2, &mut rng));
        let x = Tensor::from_vec(vec![3], vec![0.2, -0.4, 0.9]);
        let (out, acts) = net.forward(&x);
        assert_eq!(out.shape, vec![2]);
        assert_eq!(acts.len(), 4);

        let (_, grads) = net.backward(&acts, &Tensor::from_vec(vec![2], vec![1.0, 1.0]));
        let shapes: Vec<_> = net.params().iter().map(|p| p.shape.clone()).collect();
        let grad_shapes: Vec<_> = grads.iter().map(|g| g.shape.clone()).collect();
        assert_eq!(shapes, grad_shapes);
    }
}
