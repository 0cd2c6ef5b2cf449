use crate::activation::ActivationFn;
use crate::dataset::{Dataset, Preset};
use crate::net::initializer::RandomNetInitializer;
use crate::net::layer::{ConcreteLayer, LayerSpec};
use crate::net::Network;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::StandardNormal;

pub const SIZE_LG: usize = 1024;
pub const SIZE_MD: usize = 256;
pub const SIZE_SM: usize = 64;
const SEED: u64 = 0x8371943;

/// Square sigmoid layer with seeded weights and a matching random input.
pub fn get_square_dense(size: usize) -> (ConcreteLayer, Tensor) {
    let mut init = RandomNetInitializer::seed_from_u64(SEED);
    let layer = LayerSpec::dense(size, size, ActivationFn::Sigmoid)
        .create_layer(0, &mut init)
        .expect("fixture layer spec is valid");
    let mut rng = StdRng::seed_from_u64(SEED);
    let input = Tensor::from_distribution(&mut rng, StandardNormal, size);
    (layer, input)
}

/// A preset's network and dataset, both seeded.
pub fn get_preset(preset: Preset) -> (Network, Dataset) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let dataset = preset.dataset(&mut rng);
    let network = preset
        .builder()
        .with_seed(SEED)
        .build()
        .expect("preset network is valid");
    (network, dataset)
}
