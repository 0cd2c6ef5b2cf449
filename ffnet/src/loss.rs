use serde::{Deserialize, Serialize};

/// Predictions are clamped into `[BCE_EPSILON, 1 - BCE_EPSILON]` before taking logs.
pub const BCE_EPSILON: f32 = 1e-7;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LossFn {
    #[default]
    MeanSquared,
    BinaryCrossEntropy,
}

impl LossFn {
    /// Loss of a single output element.
    pub fn loss(&self, prediction: f32, expectation: f32) -> f32 {
        match self {
            LossFn::MeanSquared => (expectation - prediction).powi(2),
            LossFn::BinaryCrossEntropy => {
                let p = prediction.clamp(BCE_EPSILON, 1.0 - BCE_EPSILON);
                -(expectation * p.ln() + (1.0 - expectation) * (1.0 - p).ln())
            }
        }
    }

    /// Aggregates the summed per-element losses of `output_count` elements.
    /// Zero elements cost zero.
    ///
    /// Binary cross-entropy cost is the negated mean, so it is never positive
    /// and improves toward zero. Use [`LossFn::improved`] to compare costs.
    pub fn cost(&self, sum: f32, output_count: usize) -> f32 {
        if output_count == 0 {
            return 0.0;
        }
        match self {
            LossFn::MeanSquared => sum / output_count as f32,
            LossFn::BinaryCrossEntropy => -sum / output_count as f32,
        }
    }

    /// Whether `cost` is better than `previous` under this loss.
    pub fn improved(&self, previous: f32, cost: f32) -> bool {
        match self {
            LossFn::MeanSquared => cost < previous,
            LossFn::BinaryCrossEntropy => cost > previous,
        }
    }

    /// Sum of element losses over a whole output vector.
    pub fn total(&self, predictions: &[f32], expectations: &[f32]) -> f32 {
        debug_assert_eq!(predictions.len(), expectations.len());
        std::iter::zip(predictions, expectations).fold(0.0, |acc, (&p, &e)| acc + self.loss(p, e))
    }
}
