use crate::net::layer::LayerType;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// Weight initialization policy used when a network is built from specs.
pub trait NetInitializer {
    /// Row-major weights: one row of `input_size` values per neuron.
    fn get_weights(
        &mut self,
        layer_type: LayerType,
        layer_idx: usize,
        input_size: usize,
        output_size: usize,
    ) -> Vec<f32>;

    fn get_biases(&mut self, layer_type: LayerType, layer_idx: usize, size: usize) -> Vec<f32>;

    /// Seed for the mask generator of a dropout layer.
    fn dropout_seed(&mut self, layer_idx: usize) -> u64;
}

pub const DEFAULT_WEIGHT_RANGE: f32 = 1.0;

/// Weights uniform in `[-range, range]`, biases zero.
pub struct RandomNetInitializer {
    rng: StdRng,
    range: f32,
}

impl RandomNetInitializer {
    pub fn seed_from_u64(seed: u64) -> Self {
        RandomNetInitializer {
            rng: StdRng::seed_from_u64(seed),
            range: DEFAULT_WEIGHT_RANGE,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        assert!(
            range.is_finite() && range > 0.0,
            "Weight range must be positive and finite"
        );
        self.range = range;
        self
    }

    #[inline]
    pub fn range(&self) -> f32 {
        self.range
    }
}

impl Default for RandomNetInitializer {
    fn default() -> Self {
        RandomNetInitializer {
            rng: StdRng::from_entropy(),
            range: DEFAULT_WEIGHT_RANGE,
        }
    }
}

impl NetInitializer for RandomNetInitializer {
    fn get_weights(
        &mut self,
        _layer_type: LayerType,
        _layer_idx: usize,
        input_size: usize,
        output_size: usize,
    ) -> Vec<f32> {
        let dist = Uniform::new_inclusive(-self.range, self.range);
        dist.sample_iter(&mut self.rng)
            .take(input_size * output_size)
            .collect()
    }

    fn get_biases(&mut self, _layer_type: LayerType, _layer_idx: usize, size: usize) -> Vec<f32> {
        vec![0.0; size]
    }

    fn dropout_seed(&mut self, _layer_idx: usize) -> u64 {
        self.rng.next_u64()
    }
}

/// Every weight and bias set to a fixed value. Mostly useful in tests.
#[derive(Copy, Clone, Debug)]
pub struct ConstantInitializer {
    weight: f32,
    bias: f32,
}

impl ConstantInitializer {
    pub fn new(weight: f32, bias: f32) -> Self {
        ConstantInitializer { weight, bias }
    }
}

impl NetInitializer for ConstantInitializer {
    fn get_weights(
        &mut self,
        _layer_type: LayerType,
        _layer_idx: usize,
        input_size: usize,
        output_size: usize,
    ) -> Vec<f32> {
        vec![self.weight; input_size * output_size]
    }

    fn get_biases(&mut self, _layer_type: LayerType, _layer_idx: usize, size: usize) -> Vec<f32> {
        vec![self.bias; size]
    }

    fn dropout_seed(&mut self, layer_idx: usize) -> u64 {
        layer_idx as u64
    }
}
