use crate::activation::ActivationFn;
use crate::net::layer::{ErrorSignal, Layer, LayerType};
use crate::net::neuron::Neuron;
use crate::tensor::Tensor;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Fully connected layer: every neuron sees the whole input vector.
///
/// Per-neuron work is spread over the rayon pool; each method returns only
/// once all neurons are done, so the next stage always sees a finished layer.
#[derive(Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    input_size: usize,
    activation_fn: ActivationFn,
    neurons: Vec<Neuron>,
}

impl DenseLayer {
    /// `weights` holds one row of `input_size` weights per neuron.
    pub fn new(
        input_size: usize,
        activation_fn: ActivationFn,
        weights: Vec<f32>,
        biases: Vec<f32>,
    ) -> Self {
        assert_eq!(
            weights.len(),
            input_size * biases.len(),
            "Expected {} weights for {} neurons of input size {input_size}",
            input_size * biases.len(),
            biases.len()
        );
        let neurons = std::iter::zip(weights.chunks(input_size.max(1)), biases)
            .map(|(row, bias)| Neuron::new(row.to_vec(), bias))
            .collect();
        DenseLayer {
            input_size,
            activation_fn,
            neurons,
        }
    }

    pub fn from_neurons(input_size: usize, activation_fn: ActivationFn, neurons: Vec<Neuron>) -> Self {
        for (i, n) in neurons.iter().enumerate() {
            assert_eq!(
                n.weights().len(),
                input_size,
                "Neuron {i} has {} weights, layer input size is {input_size}",
                n.weights().len()
            );
        }
        DenseLayer {
            input_size,
            activation_fn,
            neurons,
        }
    }

    #[inline]
    pub fn activation_fn(&self) -> ActivationFn {
        self.activation_fn
    }

    fn outputs(&self) -> Tensor {
        Tensor::from_vec(self.neurons.iter().map(Neuron::output).collect())
    }
}

impl Layer for DenseLayer {
    fn forward(&mut self, input: &Tensor, _dropout_enabled: bool) -> Tensor {
        assert_eq!(
            input.len(),
            self.input_size,
            "Invalid input length for dense layer"
        );
        let input = input.as_slice();
        let activation_fn = self.activation_fn;
        self.neurons.par_iter_mut().for_each(|n| {
            n.output = activation_fn.activate(n.weighted_sum(input));
        });
        self.outputs()
    }

    fn backward(&mut self, signal: ErrorSignal<'_>) {
        let activation_fn = self.activation_fn;
        match signal {
            ErrorSignal::Expected(expected) => {
                assert_eq!(
                    expected.len(),
                    self.neurons.len(),
                    "Invalid expected length for dense layer"
                );
                let expected = expected.as_slice();
                self.neurons
                    .par_iter_mut()
                    .zip(expected.par_iter())
                    .for_each(|(n, &e)| {
                        let error = n.output - e;
                        n.bias_delta = error * activation_fn.derivative(n.output);
                    });
            }
            ErrorSignal::Downstream(downstream) => {
                let size = self.neurons.len();
                assert!(
                    downstream.iter().all(|n| n.weights().len() == size),
                    "Downstream layer does not take {size} inputs"
                );
                self.neurons.par_iter_mut().enumerate().for_each(|(j, n)| {
                    let error = downstream
                        .iter()
                        .fold(0.0, |acc, k| acc + k.weights[j] * k.bias_delta);
                    n.bias_delta = error * activation_fn.derivative(n.output);
                });
            }
        }
    }

    fn accumulate_gradient(&mut self, input: &Tensor, learning_rate: f32) -> Tensor {
        assert_eq!(
            input.len(),
            self.input_size,
            "Invalid input length for dense layer"
        );
        let input = input.as_slice();
        self.neurons
            .par_iter_mut()
            .for_each(|n| n.accumulate(input, learning_rate));
        self.outputs()
    }

    fn apply_update(&mut self, batch_size: usize) {
        assert!(batch_size > 0, "Batch size must be positive");
        let batch_size = batch_size as f32;
        self.neurons.par_iter_mut().for_each(|n| n.apply(batch_size));
    }

    #[inline]
    fn input_size(&self) -> usize {
        self.input_size
    }

    #[inline]
    fn output_size(&self) -> usize {
        self.neurons.len()
    }

    #[inline]
    fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Dense
    }
}

impl Debug for DenseLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseLayer")
            .field("size", &self.neurons.len())
            .field("activation_fn", &self.activation_fn)
            .field("neurons", &self.neurons)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::DenseLayer;
    use crate::activation::ActivationFn;
    use crate::loss::LossFn;
    use crate::net::layer::{ErrorSignal, Layer};
    use crate::net::neuron::Neuron;
    use crate::tensor::Tensor;
    use approx::assert_abs_diff_eq;

    fn layer_2x3(activation_fn: ActivationFn) -> DenseLayer {
        DenseLayer::new(
            3,
            activation_fn,
            vec![0.5, -1.0, 0.25, 1.0, 2.0, -0.5],
            vec![0.1, -0.2],
        )
    }

    #[test]
    fn test_forward() {
        let mut layer = layer_2x3(ActivationFn::Identity);
        let out = layer.forward(&Tensor::from_vec(vec![1.0, 2.0, 4.0]), false);
        assert_abs_diff_eq!(out.get(0), 0.1 + 0.5 - 2.0 + 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out.get(1), -0.2 + 1.0 + 4.0 - 2.0, epsilon = 1e-6);
        assert_eq!(layer.neurons()[1].output(), out.get(1));

        let mut layer = layer_2x3(ActivationFn::ReLU);
        let out = layer.forward(&Tensor::from_vec(vec![1.0, 2.0, 4.0]), false);
        assert_eq!(out.get(0), 0.0);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut layer = DenseLayer::new(
            64,
            ActivationFn::Sigmoid,
            (0..64 * 32).map(|i| ((i % 13) as f32 - 6.0) * 0.173).collect(),
            (0..32).map(|i| i as f32 * 0.01).collect(),
        );
        let input = Tensor::from_vec((0..64).map(|i| (i as f32 * 0.37).sin()).collect());
        let a = layer.forward(&input, true);
        let b = layer.forward(&input, true);
        let bits = |t: &Tensor| t.as_slice().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    #[should_panic(expected = "Invalid input length")]
    fn test_forward_rejects_wrong_input_length() {
        let mut layer = layer_2x3(ActivationFn::Sigmoid);
        layer.forward(&Tensor::from_vec(vec![1.0, 2.0]), false);
    }

    #[test]
    fn test_backward_output_layer() {
        let mut layer = layer_2x3(ActivationFn::Sigmoid);
        let out = layer.forward(&Tensor::from_vec(vec![0.0, 0.0, 0.0]), false);
        let expected = Tensor::from_vec(vec![1.0, 0.0]);
        layer.backward(ErrorSignal::Expected(&expected));
        for j in 0..2 {
            let o = out.get(j);
            let want = (o - expected.get(j)) * o * (1.0 - o);
            assert_abs_diff_eq!(layer.neurons()[j].bias_delta(), want, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_backward_hidden_layer() {
        let mut hidden = layer_2x3(ActivationFn::Identity);
        hidden.forward(&Tensor::from_vec(vec![1.0, 1.0, 1.0]), false);

        let mut next_a = Neuron::new(vec![2.0, -1.0], 0.0);
        next_a.bias_delta = 0.5;
        let mut next_b = Neuron::new(vec![3.0, 4.0], 0.0);
        next_b.bias_delta = -1.0;
        let downstream = [next_a, next_b];

        hidden.backward(ErrorSignal::Downstream(&downstream));
        assert_eq!(hidden.neurons()[0].bias_delta(), 2.0 * 0.5 + 3.0 * -1.0);
        assert_eq!(hidden.neurons()[1].bias_delta(), -1.0 * 0.5 + 4.0 * -1.0);
    }

    #[test]
    fn test_apply_update_averages_and_resets() {
        let mut layer = DenseLayer::new(1, ActivationFn::Identity, vec![1.0], vec![0.0]);
        let input = Tensor::from_vec(vec![2.0]);
        let expected = Tensor::from_vec(vec![0.0]);
        for _ in 0..2 {
            layer.forward(&input, true);
            layer.backward(ErrorSignal::Expected(&expected));
            layer.accumulate_gradient(&input, 0.1);
        }
        // both examples: error 2, delta -0.1 * 2 * 2 = -0.4 on the weight, -0.2 on the bias
        assert_abs_diff_eq!(layer.neurons()[0].weights_delta()[0], -0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(layer.neurons()[0].total_bias_delta(), -0.4, epsilon = 1e-6);

        layer.apply_update(2);
        let n = &layer.neurons()[0];
        assert_abs_diff_eq!(n.weights()[0], 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(n.bias(), -0.2, epsilon = 1e-6);
        assert_eq!(n.weights_delta(), &[0.0]);
        assert_eq!(n.total_bias_delta(), 0.0);
    }

    #[test]
    fn test_single_step_reduces_squared_error() {
        let loss = LossFn::MeanSquared;
        let input = Tensor::from_vec(vec![1.5]);
        let target = Tensor::from_vec(vec![2.0]);
        for &(w, b) in &[(0.5, 0.0), (3.0, 1.0), (-1.0, 0.3)] {
            let mut layer = DenseLayer::new(1, ActivationFn::Identity, vec![w], vec![b]);
            let before = layer.forward(&input, false);
            let loss_before = loss.loss(before.get(0), target.get(0));

            layer.backward(ErrorSignal::Expected(&target));
            layer.accumulate_gradient(&input, 0.01);
            layer.apply_update(1);

            let moved = layer.neurons()[0].weights()[0] - w;
            let gradient = 2.0 * (before.get(0) - target.get(0)) * input.get(0);
            assert!(moved * gradient < 0.0, "weight moved along the gradient");

            let after = layer.forward(&input, false);
            assert!(loss.loss(after.get(0), target.get(0)) < loss_before);
        }
    }
}
