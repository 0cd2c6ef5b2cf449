use crate::net::layer::{ErrorSignal, Layer, LayerType};
use crate::net::neuron::Neuron;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Zeroes each element independently with the configured probability while
/// dropout is enabled. Has no weights, so the backward pass leaves it alone
/// and the error of the surrounding dense layers flows straight through.
#[derive(Clone, Serialize, Deserialize)]
pub struct DropoutLayer {
    size: usize,
    drop_probability_percent: u8,
    #[serde(skip, default = "entropy_rng")]
    rng: StdRng,
    #[serde(skip)]
    mask: Vec<bool>,
    #[serde(skip)]
    output: Vec<f32>,
}

impl DropoutLayer {
    pub fn new(size: usize, drop_probability_percent: u8, seed: u64) -> Self {
        assert!(
            drop_probability_percent <= 100,
            "Drop probability must be at most 100%"
        );
        DropoutLayer {
            size,
            drop_probability_percent,
            rng: StdRng::seed_from_u64(seed),
            mask: vec![true; size],
            output: vec![0.0; size],
        }
    }

    #[inline]
    pub fn drop_probability_percent(&self) -> u8 {
        self.drop_probability_percent
    }

    #[inline]
    pub fn drop_probability(&self) -> f64 {
        self.drop_probability_percent as f64 / 100.0
    }

    /// Which elements the last forward pass kept.
    #[inline]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Layer for DropoutLayer {
    fn forward(&mut self, input: &Tensor, dropout_enabled: bool) -> Tensor {
        assert_eq!(
            input.len(),
            self.size,
            "Invalid input length for dropout layer"
        );
        let p = self.drop_probability();
        self.mask.clear();
        self.output.clear();
        for &x in input.as_slice() {
            let keep = !dropout_enabled || !self.rng.gen_bool(p);
            self.mask.push(keep);
            self.output.push(if keep { x } else { 0.0 });
        }
        Tensor::from_vec(self.output.clone())
    }

    fn backward(&mut self, _signal: ErrorSignal<'_>) {}

    fn accumulate_gradient(&mut self, _input: &Tensor, _learning_rate: f32) -> Tensor {
        Tensor::from_vec(self.output.clone())
    }

    fn apply_update(&mut self, _batch_size: usize) {}

    #[inline]
    fn input_size(&self) -> usize {
        self.size
    }

    #[inline]
    fn output_size(&self) -> usize {
        self.size
    }

    #[inline]
    fn neurons(&self) -> &[Neuron] {
        &[]
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Dropout
    }
}

impl Debug for DropoutLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropoutLayer")
            .field("size", &self.size)
            .field("drop_probability_percent", &self.drop_probability_percent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::DropoutLayer;
    use crate::net::layer::{ErrorSignal, Layer};
    use crate::tensor::Tensor;

    fn input() -> Tensor {
        Tensor::from_vec(vec![1.0, -2.0, 3.5, 0.25, -7.0, 9.0])
    }

    #[test]
    fn test_full_drop_zeroes_everything_when_enabled() {
        let mut layer = DropoutLayer::new(6, 100, 1);
        let out = layer.forward(&input(), true);
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
        assert!(layer.mask().iter().all(|&keep| !keep));
    }

    #[test]
    fn test_disabled_passes_through() {
        let mut layer = DropoutLayer::new(6, 100, 1);
        assert_eq!(layer.forward(&input(), false), input());
        assert!(layer.mask().iter().all(|&keep| keep));
    }

    #[test]
    fn test_zero_drop_passes_through_when_enabled() {
        let mut layer = DropoutLayer::new(6, 0, 1);
        assert_eq!(layer.forward(&input(), true), input());
    }

    #[test]
    fn test_kept_elements_are_unchanged() {
        let mut layer = DropoutLayer::new(6, 50, 7);
        let x = input();
        for _ in 0..10 {
            let out = layer.forward(&x, true);
            for (i, &keep) in layer.mask().iter().enumerate() {
                assert_eq!(out.get(i), if keep { x.get(i) } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_drop_rate_is_roughly_the_probability() {
        let mut layer = DropoutLayer::new(1000, 30, 42);
        let x = Tensor::from_vec(vec![1.0; 1000]);
        layer.forward(&x, true);
        let dropped = layer.mask().iter().filter(|&&keep| !keep).count();
        assert!((200..400).contains(&dropped), "dropped {dropped} of 1000");
    }

    #[test]
    fn test_gradient_steps_return_cached_output() {
        let mut layer = DropoutLayer::new(6, 50, 3);
        let out = layer.forward(&input(), true);
        let expected = Tensor::from_vec(vec![0.0; 6]);
        layer.backward(ErrorSignal::Expected(&expected));
        assert_eq!(layer.accumulate_gradient(&input(), 0.5), out);
        layer.apply_update(4);
        assert!(layer.neurons().is_empty());
    }
}
