#[macro_use]
extern crate bencher;

use bencher::Bencher;
use ffnet::dataset::Preset;
use ffnet::net::layer::{ErrorSignal, Layer};
use ffnet::net::TrainConfig;
use ffnet::util::bench::*;

macro_rules! impl_forward_bench {
    ($name:ident, $size:expr) => {
        fn $name(bench: &mut Bencher) {
            let (mut layer, input) = get_square_dense($size);
            bench.iter(|| layer.forward(&input, false))
        }
    };
}

macro_rules! impl_step_bench {
    ($name:ident, $size:expr) => {
        fn $name(bench: &mut Bencher) {
            let (mut layer, input) = get_square_dense($size);
            let expected = input.clone();
            bench.iter(|| {
                layer.forward(&input, true);
                layer.backward(ErrorSignal::Expected(&expected));
                layer.accumulate_gradient(&input, 0.01);
                layer.apply_update(1);
            })
        }
    };
}

impl_forward_bench!(forward_lg, SIZE_LG);
impl_forward_bench!(forward_md, SIZE_MD);
impl_forward_bench!(forward_sm, SIZE_SM);
benchmark_group!(forward, forward_lg, forward_md, forward_sm);

impl_step_bench!(step_lg, SIZE_LG);
impl_step_bench!(step_md, SIZE_MD);
impl_step_bench!(step_sm, SIZE_SM);
benchmark_group!(step, step_lg, step_md, step_sm);

fn spiral_epoch(bench: &mut Bencher) {
    let (network, dataset) = get_preset(Preset::Spiral);
    let config = TrainConfig {
        epochs: 1,
        ..*network.config()
    };
    let mut network =
        ffnet::net::Network::from_layers(network.layers().to_vec(), network.loss(), config).unwrap();
    bench.iter(|| network.train(&dataset).unwrap())
}
benchmark_group!(train, spiral_epoch);

benchmark_main!(forward, step, train);
