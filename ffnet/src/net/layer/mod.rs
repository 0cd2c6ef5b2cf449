mod concrete;
mod dense;
mod dropout;

use crate::activation::ActivationFn;
use crate::error::{Error, Result};
use crate::net::initializer::NetInitializer;
use crate::net::neuron::Neuron;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub use concrete::ConcreteLayer;
pub use dense::DenseLayer;
pub use dropout::DropoutLayer;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LayerType {
    Dense,
    Dropout,
}

/// What the backward pass of a layer measures its error against.
#[derive(Copy, Clone, Debug)]
pub enum ErrorSignal<'a> {
    /// The layer is the last weighted layer; compare with the target vector.
    Expected(&'a Tensor),
    /// Neurons of the nearest weighted layer towards the output, whose
    /// `bias_delta`s were computed earlier in the same backward pass.
    Downstream(&'a [Neuron]),
}

/// The capability set every layer kind provides to the network.
pub trait Layer: Debug {
    /// Panics if `input.len() != self.input_size()`.
    fn forward(&mut self, input: &Tensor, dropout_enabled: bool) -> Tensor;

    fn backward(&mut self, signal: ErrorSignal<'_>);

    /// Adds this example's learning-rate scaled gradient to the pending deltas
    /// and returns the layer output cached by the forward pass, which is the
    /// input of the next layer.
    fn accumulate_gradient(&mut self, input: &Tensor, learning_rate: f32) -> Tensor;

    /// Applies the pending deltas averaged over `batch_size` examples, then
    /// zeroes them.
    fn apply_update(&mut self, batch_size: usize);

    fn input_size(&self) -> usize;
    fn output_size(&self) -> usize;

    /// Learnable units; empty for layers without weights.
    fn neurons(&self) -> &[Neuron];

    fn layer_type(&self) -> LayerType;
}

/// Construction parameters of a single layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        input_size: usize,
        neuron_count: usize,
        activation: ActivationFn,
    },
    Dropout {
        input_size: usize,
        drop_probability_percent: u8,
    },
}

impl LayerSpec {
    pub fn dense(input_size: usize, neuron_count: usize, activation: ActivationFn) -> Self {
        LayerSpec::Dense {
            input_size,
            neuron_count,
            activation,
        }
    }

    pub fn dropout(input_size: usize, drop_probability_percent: u8) -> Self {
        LayerSpec::Dropout {
            input_size,
            drop_probability_percent,
        }
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        match *self {
            LayerSpec::Dense { input_size, .. } | LayerSpec::Dropout { input_size, .. } => input_size,
        }
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        match *self {
            LayerSpec::Dense { neuron_count, .. } => neuron_count,
            LayerSpec::Dropout { input_size, .. } => input_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            LayerSpec::Dense {
                input_size,
                neuron_count,
                ..
            } => {
                if input_size == 0 {
                    return Err(Error::invalid("input_size", input_size, "must be positive"));
                }
                if neuron_count == 0 {
                    return Err(Error::invalid("neuron_count", neuron_count, "must be positive"));
                }
            }
            LayerSpec::Dropout {
                input_size,
                drop_probability_percent,
            } => {
                if input_size == 0 {
                    return Err(Error::invalid("input_size", input_size, "must be positive"));
                }
                if drop_probability_percent > 100 {
                    return Err(Error::invalid(
                        "drop_probability_percent",
                        drop_probability_percent,
                        "must be at most 100",
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn create_layer(
        &self,
        layer_idx: usize,
        initializer: &mut dyn NetInitializer,
    ) -> Result<ConcreteLayer> {
        self.validate()?;
        Ok(match *self {
            LayerSpec::Dense {
                input_size,
                neuron_count,
                activation,
            } => {
                let weights =
                    initializer.get_weights(LayerType::Dense, layer_idx, input_size, neuron_count);
                let biases = initializer.get_biases(LayerType::Dense, layer_idx, neuron_count);
                ConcreteLayer::Dense(DenseLayer::new(input_size, activation, weights, biases))
            }
            LayerSpec::Dropout {
                input_size,
                drop_probability_percent,
            } => ConcreteLayer::Dropout(DropoutLayer::new(
                input_size,
                drop_probability_percent,
                initializer.dropout_seed(layer_idx),
            )),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{ConcreteLayer, Layer, LayerSpec};
    use crate::activation::ActivationFn;
    use crate::error::Error;
    use crate::net::initializer::ConstantInitializer;

    #[test]
    fn test_sizes() {
        let dense = LayerSpec::dense(4, 3, ActivationFn::ReLU);
        assert_eq!((dense.input_size(), dense.output_size()), (4, 3));
        let dropout = LayerSpec::dropout(5, 20);
        assert_eq!((dropout.input_size(), dropout.output_size()), (5, 5));
    }

    #[test]
    fn test_validate() {
        assert!(LayerSpec::dense(2, 1, ActivationFn::Sigmoid).validate().is_ok());
        assert!(LayerSpec::dropout(2, 100).validate().is_ok());
        assert!(matches!(
            LayerSpec::dense(2, 0, ActivationFn::Sigmoid).validate(),
            Err(Error::InvalidParameter { name: "neuron_count", .. })
        ));
        assert!(matches!(
            LayerSpec::dropout(2, 101).validate(),
            Err(Error::InvalidParameter { name: "drop_probability_percent", .. })
        ));
    }

    #[test]
    fn test_create_layer() {
        let mut init = ConstantInitializer::new(0.5, 0.0);
        let layer = LayerSpec::dense(3, 2, ActivationFn::Identity)
            .create_layer(0, &mut init)
            .unwrap();
        assert!(matches!(layer, ConcreteLayer::Dense(_)));
        assert_eq!(layer.neurons().len(), 2);
        assert!(layer.neurons().iter().all(|n| n.weights() == [0.5, 0.5, 0.5]));

        let layer = LayerSpec::dropout(3, 50).create_layer(1, &mut init).unwrap();
        assert!(matches!(layer, ConcreteLayer::Dropout(_)));
        assert!(layer.neurons().is_empty());
        assert_eq!(layer.output_size(), 3);
    }

    #[test]
    fn test_spec_serde() {
        let spec: LayerSpec = serde_json::from_str(
            r#"{"kind":"dense","input_size":2,"neuron_count":4,"activation":"tanh"}"#,
        )
        .unwrap();
        assert_eq!(spec, LayerSpec::dense(2, 4, ActivationFn::Tanh));
        let spec: LayerSpec =
            serde_json::from_str(r#"{"kind":"dropout","input_size":4,"drop_probability_percent":10}"#)
                .unwrap();
        assert_eq!(spec, LayerSpec::dropout(4, 10));
    }
}
