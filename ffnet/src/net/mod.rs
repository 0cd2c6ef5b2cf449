use crate::dataset::{DataItem, Dataset};
use crate::error::{Error, Result};
use crate::loss::LossFn;
use crate::net::initializer::{NetInitializer, RandomNetInitializer};
use crate::net::layer::{ConcreteLayer, ErrorSignal, Layer, LayerSpec};
use crate::scoring::Scorer;
use crate::tensor::Tensor;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

mod config;
mod control;
pub mod initializer;
pub mod layer;
pub mod neuron;
pub mod observer;
mod shared;

pub use config::TrainConfig;
pub use control::TrainControl;
pub use shared::SharedNetwork;

use observer::{EpochStats, NoOpObserver, TrainObserver};

/// An ordered stack of layers together with its loss and training
/// hyperparameters.
///
/// Layers cache their activations and error signals in their neurons, so
/// even inference takes `&mut self`.
pub struct Network {
    layers: Vec<ConcreteLayer>,
    loss: LossFn,
    config: TrainConfig,
    rng: StdRng,
    control: TrainControl,
}

impl Network {
    /// Builds a network with randomly initialized weights.
    pub fn new(
        layers: Vec<LayerSpec>,
        loss: LossFn,
        learning_rate: f32,
        epochs: u32,
        batch_size: u32,
    ) -> Result<Self> {
        NetBuilder::new()
            .with_layers(layers)
            .with_loss(loss)
            .with_config(TrainConfig::new(learning_rate, epochs, batch_size))
            .build()
    }

    /// Assembles a network from already constructed layers, checking that
    /// consecutive layers fit together.
    pub fn from_layers(layers: Vec<ConcreteLayer>, loss: LossFn, config: TrainConfig) -> Result<Self> {
        config.validate()?;
        validate_topology(&layers)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Network {
            layers,
            loss,
            config,
            rng,
            control: TrainControl::default(),
        })
    }

    #[inline]
    pub fn layers(&self) -> &[ConcreteLayer] {
        &self.layers
    }

    #[inline]
    pub fn loss(&self) -> LossFn {
        self.loss
    }

    #[inline]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// Handle for stopping a run from another thread or from an observer.
    pub fn control(&self) -> TrainControl {
        self.control.clone()
    }

    #[inline]
    pub fn is_training(&self) -> bool {
        self.control.is_training()
    }

    /// Restarts shuffling and every dropout mask sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        for layer in self.layers.iter_mut() {
            if let ConcreteLayer::Dropout(dropout) = layer {
                dropout.reseed(self.rng.next_u64());
            }
        }
    }

    /// One line per layer.
    pub fn summary(&self) -> String {
        self.layers
            .iter()
            .map(ConcreteLayer::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn train(&mut self, dataset: &Dataset) -> Result<f32> {
        self.train_with(dataset, &mut NoOpObserver)
    }

    /// Runs the configured number of epochs and returns the cost of the last
    /// completed one. `observer` is notified after every epoch; a stop
    /// requested through [`TrainControl`] ends the run at the next epoch
    /// boundary.
    pub fn train_with(&mut self, dataset: &Dataset, observer: &mut dyn TrainObserver) -> Result<f32> {
        let _guard = self.control.try_begin().ok_or_else(|| {
            warn!("Rejected train call, network is already training");
            Error::AlreadyTraining
        })?;
        self.run_epochs(dataset, observer)
    }

    /// Training loop proper. The caller holds the training guard.
    fn run_epochs(&mut self, dataset: &Dataset, observer: &mut dyn TrainObserver) -> Result<f32> {
        self.validate_items(dataset.items())?;
        let TrainConfig {
            learning_rate,
            epochs,
            batch_size,
            ..
        } = self.config;
        info!(
            "Training {epochs} epochs over {} items, batch size {batch_size}, learning rate {learning_rate}",
            dataset.len()
        );

        let mut cost = 0.0;
        for epoch in 1..=epochs {
            let shuffled = dataset.shuffled(&mut self.rng);
            let mut error_sum = 0.0;
            let mut samples = 0usize;
            let mut guessed = 0usize;

            for batch in shuffled.batches(batch_size as usize) {
                for item in batch {
                    let prediction = self.forward(item.input(), true);
                    for (&p, &e) in std::iter::zip(prediction.as_slice(), item.target().as_slice()) {
                        error_sum += self.loss.loss(p, e);
                        if p.round() == e.round() {
                            guessed += 1;
                        }
                        samples += 1;
                    }
                    self.backward(item.target());
                    self.accumulate_gradient(item.input(), learning_rate);
                }
                // a short final batch is still averaged over the configured size
                for layer in self.layers.iter_mut() {
                    layer.apply_update(batch_size as usize);
                }
            }

            cost = self.loss.cost(error_sum, samples);
            let accuracy = if samples == 0 {
                0.0
            } else {
                guessed as f32 / samples as f32
            };
            let stats = EpochStats {
                epoch,
                cost,
                accuracy,
                samples,
            };
            debug!("Epoch {epoch}: cost {cost:.6}, accuracy {:.2}%", accuracy * 100.0);
            observer.on_epoch(&stats);

            if self.control.is_stop_requested() {
                info!("Training stopped after epoch {epoch}/{epochs}, cost {cost:.6}");
                return Ok(cost);
            }
        }
        info!("Training finished, cost {cost:.6}");
        Ok(cost)
    }

    /// Forward pass with dropout disabled.
    pub fn predict(&mut self, input: &Tensor) -> Result<Tensor> {
        self.check_input(input)?;
        Ok(self.forward(input, false))
    }

    /// Index of the largest output of [`Network::predict`].
    pub fn predict_class(&mut self, input: &Tensor) -> Result<usize> {
        let output = self.predict(input)?;
        Ok(output.argmax().unwrap_or(0))
    }

    /// Feeds every item of `dataset` through the network without training and
    /// hands each prediction to `scorer`.
    pub fn evaluate(&mut self, dataset: &Dataset, scorer: &mut dyn Scorer) -> Result<()> {
        self.validate_items(dataset.items())?;
        for item in dataset.items() {
            let output = self.forward(item.input(), false);
            scorer.process_item(&output, item.target());
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.record())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.record())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: NetworkRecord = serde_json::from_str(json)?;
        let mut network = Network::from_layers(record.layers, record.loss, record.config)?;
        let seed = network.rng.next_u64();
        network.reseed(seed);
        Ok(network)
    }

    fn record(&self) -> NetworkRecordRef<'_> {
        NetworkRecordRef {
            layers: &self.layers,
            loss: self.loss,
            config: &self.config,
        }
    }

    fn forward(&mut self, input: &Tensor, dropout_enabled: bool) -> Tensor {
        let mut output: Option<Tensor> = None;
        for layer in self.layers.iter_mut() {
            let next = layer.forward(output.as_ref().unwrap_or(input), dropout_enabled);
            output = Some(next);
        }
        output.unwrap_or_else(|| input.clone())
    }

    /// Walks the layers back to front. Each weighted layer receives the
    /// neurons of the nearest weighted layer after it, so dropout layers are
    /// never used as the downstream reference.
    fn backward(&mut self, expected: &Tensor) {
        let mut downstream: Option<usize> = None;
        for i in (0..self.layers.len()).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let layer = &mut head[i];
            let signal = match downstream {
                None => ErrorSignal::Expected(expected),
                Some(k) => ErrorSignal::Downstream(tail[k - i - 1].neurons()),
            };
            layer.backward(signal);
            if layer.is_weighted() {
                downstream = Some(i);
            }
        }
    }

    fn accumulate_gradient(&mut self, input: &Tensor, learning_rate: f32) {
        let mut output: Option<Tensor> = None;
        for layer in self.layers.iter_mut() {
            let next = layer.accumulate_gradient(output.as_ref().unwrap_or(input), learning_rate);
            output = Some(next);
        }
    }

    fn check_input(&self, input: &Tensor) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(Error::InputSize {
                layer: 0,
                expected: self.input_size(),
                actual: input.len(),
            });
        }
        Ok(())
    }

    fn validate_items(&self, items: &[DataItem]) -> Result<()> {
        let output_size = self.output_size();
        for item in items {
            self.check_input(item.input())?;
            if item.target().len() != output_size {
                return Err(Error::TargetSize {
                    expected: output_size,
                    actual: item.target().len(),
                });
            }
        }
        Ok(())
    }
}

fn validate_topology(layers: &[ConcreteLayer]) -> Result<()> {
    if layers.is_empty() {
        return Err(Error::EmptyNetwork);
    }
    for (i, layer) in layers.iter().enumerate() {
        if i > 0 && layer.input_size() != layers[i - 1].output_size() {
            return Err(Error::Topology {
                layer: i,
                expected: layers[i - 1].output_size(),
                actual: layer.input_size(),
            });
        }
        if let Some(n) = layer
            .neurons()
            .iter()
            .find(|n| n.weights().len() != layer.input_size())
        {
            return Err(Error::Topology {
                layer: i,
                expected: layer.input_size(),
                actual: n.weights().len(),
            });
        }
        if let ConcreteLayer::Dropout(dropout) = layer {
            if dropout.drop_probability_percent() > 100 {
                return Err(Error::invalid(
                    "drop_probability_percent",
                    dropout.drop_probability_percent(),
                    "must be at most 100",
                ));
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct NetworkRecordRef<'a> {
    layers: &'a [ConcreteLayer],
    loss: LossFn,
    config: &'a TrainConfig,
}

#[derive(Deserialize)]
struct NetworkRecord {
    layers: Vec<ConcreteLayer>,
    loss: LossFn,
    config: TrainConfig,
}

pub struct NetBuilder {
    initializer: Option<Box<dyn NetInitializer>>,
    layers: Vec<LayerSpec>,
    loss: LossFn,
    config: TrainConfig,
}

impl Default for NetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetBuilder {
    pub fn new() -> Self {
        NetBuilder {
            initializer: None,
            layers: Vec::new(),
            loss: LossFn::default(),
            config: TrainConfig::default(),
        }
    }

    /// Defaults to [`RandomNetInitializer`], seeded from the config seed when
    /// there is one.
    pub fn with_initializer<I>(mut self, initializer: I) -> Self
    where
        I: 'static + NetInitializer,
    {
        self.initializer = Some(Box::new(initializer));
        self
    }

    pub fn with_layer(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_layers<I>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = LayerSpec>,
    {
        self.layers.extend(layers);
        self
    }

    pub fn with_loss(mut self, loss: LossFn) -> Self {
        self.loss = loss;
        self
    }

    pub fn with_config(mut self, config: TrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Network> {
        self.config.validate()?;
        if self.layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        let mut initializer: Box<dyn NetInitializer> = match self.initializer {
            Some(initializer) => initializer,
            None => match self.config.seed {
                Some(seed) => Box::new(RandomNetInitializer::seed_from_u64(seed)),
                None => Box::new(RandomNetInitializer::default()),
            },
        };
        let layers = self
            .layers
            .iter()
            .enumerate()
            .map(|(idx, spec)| spec.create_layer(idx, initializer.as_mut()))
            .collect::<Result<Vec<_>>>()?;
        let network = Network::from_layers(layers, self.loss, self.config)?;
        debug!(
            "Built network with {} layers, loss {:?}:\n{}",
            network.layers.len(),
            network.loss,
            network.summary()
        );
        Ok(network)
    }
}

impl Debug for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("layers", &self.layers)
            .field("loss", &self.loss)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
