use super::{DenseLayer, DropoutLayer, ErrorSignal, Layer, LayerType};
use crate::net::neuron::Neuron;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Closed set of layer kinds a network can hold. Also the tagged record the
/// model encoding writes per layer.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "layer", rename_all = "snake_case")]
pub enum ConcreteLayer {
    Dense(DenseLayer),
    Dropout(DropoutLayer),
}

impl ConcreteLayer {
    fn inner(&self) -> &dyn Layer {
        match self {
            ConcreteLayer::Dense(inner) => inner,
            ConcreteLayer::Dropout(inner) => inner,
        }
    }
    fn inner_mut(&mut self) -> &mut dyn Layer {
        match self {
            ConcreteLayer::Dense(inner) => inner,
            ConcreteLayer::Dropout(inner) => inner,
        }
    }

    /// Whether the layer owns weights and takes part in error propagation.
    #[inline]
    pub fn is_weighted(&self) -> bool {
        matches!(self, ConcreteLayer::Dense(_))
    }

    /// One-line human readable description.
    pub fn summary(&self) -> String {
        match self {
            ConcreteLayer::Dense(l) => format!(
                "Fully connected layer: {} neurons, {} inputs, {}",
                l.output_size(),
                l.input_size(),
                l.activation_fn().name()
            ),
            ConcreteLayer::Dropout(l) => format!(
                "Dropout layer: {} neurons, {}% probability",
                l.output_size(),
                l.drop_probability_percent()
            ),
        }
    }
}

impl Layer for ConcreteLayer {
    fn forward(&mut self, input: &Tensor, dropout_enabled: bool) -> Tensor {
        self.inner_mut().forward(input, dropout_enabled)
    }

    fn backward(&mut self, signal: ErrorSignal<'_>) {
        self.inner_mut().backward(signal)
    }

    fn accumulate_gradient(&mut self, input: &Tensor, learning_rate: f32) -> Tensor {
        self.inner_mut().accumulate_gradient(input, learning_rate)
    }

    fn apply_update(&mut self, batch_size: usize) {
        self.inner_mut().apply_update(batch_size)
    }

    #[inline]
    fn input_size(&self) -> usize {
        self.inner().input_size()
    }

    #[inline]
    fn output_size(&self) -> usize {
        self.inner().output_size()
    }

    #[inline]
    fn neurons(&self) -> &[Neuron] {
        self.inner().neurons()
    }

    fn layer_type(&self) -> LayerType {
        self.inner().layer_type()
    }
}

impl From<DenseLayer> for ConcreteLayer {
    fn from(value: DenseLayer) -> Self {
        ConcreteLayer::Dense(value)
    }
}

impl From<DropoutLayer> for ConcreteLayer {
    fn from(value: DropoutLayer) -> Self {
        ConcreteLayer::Dropout(value)
    }
}

impl Debug for ConcreteLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self.inner(), f)
    }
}
