use crate::dataset::Point;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// A scalar derived from a canvas point and fed to one network input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFeature {
    X,
    Y,
    XSquared,
    YSquared,
    SinX,
    SinY,
}

impl InputFeature {
    pub const ALL: [InputFeature; 6] = [
        InputFeature::X,
        InputFeature::Y,
        InputFeature::XSquared,
        InputFeature::YSquared,
        InputFeature::SinX,
        InputFeature::SinY,
    ];

    pub fn value(self, point: Point) -> f32 {
        match self {
            InputFeature::X => point.x,
            InputFeature::Y => point.y,
            InputFeature::XSquared => point.x * point.x,
            InputFeature::YSquared => point.y * point.y,
            InputFeature::SinX => point.x.sin(),
            InputFeature::SinY => point.y.sin(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InputFeature::X => "x",
            InputFeature::Y => "y",
            InputFeature::XSquared => "x^2",
            InputFeature::YSquared => "y^2",
            InputFeature::SinX => "sin(x)",
            InputFeature::SinY => "sin(y)",
        }
    }
}

/// Network input for `point`, one element per feature in order.
pub fn encode_point(features: &[InputFeature], point: Point) -> Tensor {
    Tensor::from_vec(features.iter().map(|f| f.value(point)).collect())
}
