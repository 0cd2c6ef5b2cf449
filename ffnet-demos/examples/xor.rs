use ffnet::activation::ActivationFn;
use ffnet::loss::LossFn;
use ffnet::net::layer::LayerSpec;
use ffnet::net::{NetBuilder, Network, TrainConfig};
use ffnet_demos::{init_logging, xor_dataset};

pub fn main() -> ffnet::Result<()> {
    init_logging();

    let dataset = xor_dataset();
    let mut net = NetBuilder::new()
        .with_layer(LayerSpec::dense(2, 4, ActivationFn::Tanh))
        .with_layer(LayerSpec::dense(4, 1, ActivationFn::Sigmoid))
        .with_loss(LossFn::BinaryCrossEntropy)
        .with_config(TrainConfig::new(0.5, 2000, 2).with_seed(7))
        .build()?;

    let cost = net.train(&dataset)?;
    println!("Final cost: {cost:.5}");

    // the encoded model predicts exactly what the trained one does
    let json = net.to_json_pretty()?;
    let mut restored = Network::from_json(&json)?;
    for item in dataset.items() {
        let out = net.predict(item.input())?;
        let restored_out = restored.predict(item.input())?;
        assert_eq!(out, restored_out);
        println!(
            "{:?} -> {:.4} (expected {})",
            item.input().as_slice(),
            out.get(0),
            item.target().get(0)
        );
    }
    println!("Encoded model is {} bytes", json.len());
    Ok(())
}
