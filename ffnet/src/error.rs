use crate::tensor::Shape;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("tensor body of length {len} does not conform to shape {shape}")]
    ShapeMismatch { shape: Shape, len: usize },

    #[error("layer {layer} expects an input of length {expected}, got {actual}")]
    InputSize {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("network produces {expected} outputs but the target has length {actual}")]
    TargetSize { expected: usize, actual: usize },

    #[error("layer {layer} takes {actual} inputs but the previous layer produces {expected}")]
    Topology {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("network has no layers")]
    EmptyNetwork,

    #[error("network is already training")]
    AlreadyTraining,

    #[error("model encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid<V: ToString>(name: &'static str, value: V, reason: &'static str) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
