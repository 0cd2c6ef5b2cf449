use ffnet::activation::ActivationFn;
use ffnet::dataset::{DataItem, Dataset};
use ffnet::net::layer::LayerSpec;
use ffnet::net::{NetBuilder, TrainConfig};
use ffnet::scoring::RoundedScorer;
use ffnet_demos::init_logging;

const WIDTH: usize = 8;

/// Learns whether a number is odd from its binary digits, with a dropout
/// layer between the two dense layers.
pub fn main() -> ffnet::Result<()> {
    init_logging();

    let dataset: Dataset = (0..1u64 << WIDTH)
        .map(|n| DataItem::binary(n, WIDTH, n % 2 == 1))
        .collect();
    let mut net = NetBuilder::new()
        .with_layer(LayerSpec::dense(WIDTH, 8, ActivationFn::Sigmoid))
        .with_layer(LayerSpec::dropout(8, 10))
        .with_layer(LayerSpec::dense(8, 1, ActivationFn::Sigmoid))
        .with_config(TrainConfig::new(1.0, 200, 8).with_seed(42))
        .build()?;
    println!("{}", net.summary());

    let cost = net.train(&dataset)?;
    let mut scorer = RoundedScorer::default();
    net.evaluate(&dataset, &mut scorer)?;
    println!(
        "Final cost {cost:.5}, accuracy {:.1}% over {} numbers",
        scorer.accuracy() * 100.0,
        scorer.total()
    );
    Ok(())
}
