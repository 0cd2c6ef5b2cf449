use crate::tensor::debug_slice;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Learnable unit of a dense layer: one weight per incoming connection, a bias,
/// and the gradient accumulators filled during a batch.
///
/// Only `weights` and `bias` are encoded; accumulators and the cached output
/// start at zero after decoding.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "NeuronRecord")]
pub struct Neuron {
    #[serde(with = "serialize_vec")]
    pub(crate) weights: Vec<f32>,
    pub(crate) bias: f32,
    #[serde(skip)]
    pub(crate) weights_delta: Vec<f32>,
    #[serde(skip)]
    pub(crate) bias_delta: f32,
    #[serde(skip)]
    pub(crate) total_bias_delta: f32,
    #[serde(skip)]
    pub(crate) output: f32,
}

#[derive(Deserialize)]
struct NeuronRecord {
    #[serde(with = "serialize_vec")]
    weights: Vec<f32>,
    bias: f32,
}

impl From<NeuronRecord> for Neuron {
    fn from(value: NeuronRecord) -> Self {
        Neuron::new(value.weights, value.bias)
    }
}

impl Neuron {
    pub fn new(weights: Vec<f32>, bias: f32) -> Self {
        let weights_delta = vec![0.0; weights.len()];
        Neuron {
            weights,
            bias,
            weights_delta,
            bias_delta: 0.0,
            total_bias_delta: 0.0,
            output: 0.0,
        }
    }

    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Activation cached by the last forward pass.
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Error signal of the last backward pass, already multiplied by the
    /// activation derivative.
    #[inline]
    pub fn bias_delta(&self) -> f32 {
        self.bias_delta
    }

    /// Pending, learning-rate scaled weight changes of the current batch.
    #[inline]
    pub fn weights_delta(&self) -> &[f32] {
        &self.weights_delta
    }

    #[inline]
    pub fn total_bias_delta(&self) -> f32 {
        self.total_bias_delta
    }

    #[inline]
    pub(crate) fn weighted_sum(&self, input: &[f32]) -> f32 {
        std::iter::zip(&self.weights, input).fold(self.bias, |acc, (&w, &x)| acc + w * x)
    }

    pub(crate) fn accumulate(&mut self, input: &[f32], learning_rate: f32) {
        let scaled = learning_rate * self.bias_delta;
        for (d, &x) in std::iter::zip(&mut self.weights_delta, input) {
            *d -= scaled * x;
        }
        self.total_bias_delta -= scaled;
    }

    pub(crate) fn apply(&mut self, batch_size: f32) {
        for (w, d) in std::iter::zip(&mut self.weights, &mut self.weights_delta) {
            *w += *d / batch_size;
            *d = 0.0;
        }
        self.bias += self.total_bias_delta / batch_size;
        self.total_bias_delta = 0.0;
    }
}

impl Debug for Neuron {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Neuron { weights: ")?;
        debug_slice(f, &self.weights)?;
        write!(f, ", bias: {:?} }}", self.bias)
    }
}

mod serialize_vec {
    use serde::de::{Error, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt::Formatter;

    struct Vec32Visitor;

    impl<'de> Visitor<'de> for Vec32Visitor {
        type Value = Vec<f32>;
        fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
            formatter.write_str("a base64-encoded string encoding a f32 array")
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            let data = base64::decode(v).map_err(|e| E::custom(e.to_string()))?;
            if data.len() % 4 != 0 {
                return Err(E::custom("byte length not a multiple of 4"));
            }
            Ok(data
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect())
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<Vec<f32>>,
    {
        deserializer.deserialize_str(Vec32Visitor).map(|vec| vec.into())
    }

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[f32]>,
    {
        let bytes: Vec<u8> = value.as_ref().iter().flat_map(|f| f.to_be_bytes()).collect();
        serializer.serialize_str(base64::encode(bytes).as_str())
    }
}

#[cfg(test)]
mod test {
    use super::Neuron;

    #[test]
    fn test_weighted_sum_starts_from_bias() {
        let n = Neuron::new(vec![0.5, -2.0, 1.0], 0.25);
        assert_eq!(n.weighted_sum(&[2.0, 1.0, 3.0]), 0.25 + 1.0 - 2.0 + 3.0);
    }

    #[test]
    fn test_accumulate_then_apply_resets_pending_state() {
        let mut n = Neuron::new(vec![1.0, 1.0], 0.0);
        n.bias_delta = 0.5;
        n.accumulate(&[1.0, 2.0], 0.1);
        n.accumulate(&[1.0, 2.0], 0.1);
        assert_eq!(n.weights_delta(), &[-0.1, -0.2]);
        assert_eq!(n.total_bias_delta(), -0.1);

        n.apply(2.0);
        assert_eq!(n.weights(), &[0.95, 0.9]);
        assert_eq!(n.bias(), -0.05);
        assert_eq!(n.weights_delta(), &[0.0, 0.0]);
        assert_eq!(n.total_bias_delta(), 0.0);
    }

    #[test]
    fn test_encoding_is_bit_exact() {
        let weights = vec![0.1, -0.0, f32::MIN_POSITIVE, 1.0e-38, -123456.78, f32::MAX];
        let mut n = Neuron::new(weights.clone(), -0.3);
        n.output = 0.9;
        n.bias_delta = 0.2;

        let json = serde_json::to_string(&n).unwrap();
        let decoded: Neuron = serde_json::from_str(&json).unwrap();

        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(decoded.weights()), bits(&weights));
        assert_eq!(decoded.bias(), -0.3);
        assert_eq!(decoded.output(), 0.0);
        assert_eq!(decoded.bias_delta(), 0.0);
        assert_eq!(decoded.weights_delta(), &[0.0; 6]);
    }
}
