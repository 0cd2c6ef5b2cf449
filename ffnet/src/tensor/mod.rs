mod shape;
mod debug;
#[cfg(feature = "approx")]
mod approx;

use crate::error::{Error, Result};
use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
pub use shape::Shape;
pub(crate) use debug::fmt_slice as debug_slice;

/// Flat `f32` buffer tagged with a logical [`Shape`].
///
/// A tensor is never resized or reshaped after construction; layers produce new
/// tensors instead of writing into their inputs. Equality compares the flat body
/// only, so a `(4)` tensor equals a `(2, 2)` tensor holding the same values.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "TensorRecord")]
pub struct Tensor {
    shape: Shape,
    body: Vec<f32>,
}

#[derive(Deserialize)]
struct TensorRecord {
    shape: Shape,
    body: Vec<f32>,
}

impl TryFrom<TensorRecord> for Tensor {
    type Error = Error;
    fn try_from(value: TensorRecord) -> Result<Self> {
        Tensor::try_new(value.body, value.shape)
    }
}

impl Tensor {
    /// Panics if `body.len()` disagrees with `shape`.
    pub fn new<S: Into<Shape>>(body: Vec<f32>, shape: S) -> Self {
        let shape = shape.into();
        assert_eq!(
            body.len(),
            shape.tensor_len(),
            "Tensor body does not conform to shape {shape}"
        );
        Tensor { shape, body }
    }

    pub fn try_new<S: Into<Shape>>(body: Vec<f32>, shape: S) -> Result<Self> {
        let shape = shape.into();
        if body.len() != shape.tensor_len() {
            return Err(Error::ShapeMismatch {
                shape,
                len: body.len(),
            });
        }
        Ok(Tensor { shape, body })
    }

    /// One-dimensional tensor whose width is the length of `body`.
    pub fn from_vec(body: Vec<f32>) -> Self {
        let len = body.len();
        Tensor {
            shape: Shape::D1(len),
            body,
        }
    }

    pub fn zeros<S: Into<Shape>>(shape: S) -> Self {
        let shape = shape.into();
        Tensor {
            body: vec![0.0; shape.tensor_len()],
            shape,
        }
    }

    /// Classifier target with a single `1.0` at `label`.
    pub fn one_hot(label: usize, count: usize) -> Self {
        assert!(
            label < count,
            "One-hot label {label} must be less than class count {count}"
        );
        let mut body = vec![0.0; count];
        body[label] = 1.0;
        Tensor::from_vec(body)
    }

    pub fn from_distribution<R, D, S>(rng: &mut R, dist: D, shape: S) -> Self
    where
        R: Rng + ?Sized,
        D: Distribution<f32>,
        S: Into<Shape>,
    {
        let shape = shape.into();
        let body = dist.sample_iter(rng).take(shape.tensor_len()).collect();
        Tensor { shape, body }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.body
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.body
    }

    #[inline]
    pub fn get(&self, x: usize) -> f32 {
        self.body[x]
    }

    #[inline]
    pub fn get_2d(&self, x: usize, y: usize) -> f32 {
        let width = self.shape.width();
        let height = self.shape.height().unwrap_or(1);
        assert!(
            x < width && y < height,
            "Index ({x}, {y}) out of bounds for shape {}",
            self.shape
        );
        self.body[x + y * width]
    }

    /// Depth is the fastest-varying axis: `body[z + (x + y * width) * depth]`.
    pub fn get_3d(&self, x: usize, y: usize, z: usize) -> f32 {
        let depth = self
            .shape
            .depth()
            .unwrap_or_else(|| panic!("get_3d on tensor of shape {}", self.shape));
        let width = self.shape.width();
        let height = self.shape.height().unwrap_or(1);
        assert!(
            x < width && y < height && z < depth,
            "Index ({x}, {y}, {z}) out of bounds for shape {}",
            self.shape
        );
        self.body[z + (x + y * width) * depth]
    }

    /// Index of the largest element. Ties resolve to the lowest index.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &v) in self.body.iter().enumerate() {
            match best {
                Some((_, b)) if v.partial_cmp(&b) != Some(Ordering::Greater) => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl AsRef<[f32]> for Tensor {
    fn as_ref(&self) -> &[f32] {
        &self.body
    }
}

impl std::ops::Index<usize> for Tensor {
    type Output = f32;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.body[index]
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

impl From<Vec<f32>> for Tensor {
    fn from(value: Vec<f32>) -> Self {
        Tensor::from_vec(value)
    }
}

#[cfg(test)]
mod test {
    use super::{Shape, Tensor};
    use crate::error::Error;

    #[test]
    fn test_try_new_rejects_mismatched_body() {
        let cases: [(usize, Shape); 4] = [
            (3, Shape::D1(4)),
            (5, Shape::D2(2, 3)),
            (6, Shape::D3(1, 2, 4)),
            (1, Shape::D2(0, 3)),
        ];
        for (len, shape) in cases {
            match Tensor::try_new(vec![0.0; len], shape) {
                Err(Error::ShapeMismatch { shape: s, len: l }) => {
                    assert_eq!(s, shape);
                    assert_eq!(l, len);
                }
                other => panic!("expected shape mismatch, got {:?}", other.map(|t| t.shape())),
            }
        }
    }

    #[test]
    #[should_panic(expected = "does not conform to shape")]
    fn test_new_panics_on_mismatch() {
        Tensor::new(vec![1.0, 2.0, 3.0], Shape::D2(2, 2));
    }

    #[test]
    fn test_indexing_2d() {
        // width 3, height 2
        let t = Tensor::new(vec![0., 1., 2., 10., 11., 12.], Shape::D2(3, 2));
        assert_eq!(t.get_2d(0, 0), 0.);
        assert_eq!(t.get_2d(2, 0), 2.);
        assert_eq!(t.get_2d(0, 1), 10.);
        assert_eq!(t.get_2d(2, 1), 12.);
        assert_eq!(t.get(4), 11.);
    }

    #[test]
    fn test_indexing_3d() {
        let body: Vec<f32> = (0..24).map(|v| v as f32).collect();
        let t = Tensor::new(body, Shape::D3(2, 3, 4));
        for y in 0..3 {
            for x in 0..2 {
                for z in 0..4 {
                    assert_eq!(t.get_3d(x, y, z), (z + (x + y * 2) * 4) as f32);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_indexing_2d_past_width() {
        let t = Tensor::new(vec![0., 1., 2., 10., 11., 12.], Shape::D2(3, 2));
        t.get_2d(3, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_indexing_3d_past_height() {
        let t = Tensor::new(vec![0.; 24], Shape::D3(2, 3, 4));
        t.get_3d(0, 3, 0);
    }

    #[test]
    fn test_equality_ignores_shape() {
        let a = Tensor::new(vec![1., 2., 3., 4.], Shape::D1(4));
        let b = Tensor::new(vec![1., 2., 3., 4.], Shape::D2(2, 2));
        let c = Tensor::new(vec![1., 2., 3., 5.], Shape::D2(2, 2));
        assert_eq!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_one_hot_and_argmax() {
        let t = Tensor::one_hot(2, 4);
        assert_eq!(t.as_slice(), &[0., 0., 1., 0.]);
        assert_eq!(t.argmax(), Some(2));
        assert_eq!(Tensor::from_vec(vec![0.3, 0.7, 0.7]).argmax(), Some(1));
        assert_eq!(Tensor::from_vec(vec![]).argmax(), None);
    }

    #[test]
    #[should_panic]
    fn test_one_hot_label_out_of_range() {
        Tensor::one_hot(3, 3);
    }

    #[test]
    fn test_decode_validates_shape() {
        let ok: Tensor = serde_json::from_str(r#"{"shape":{"D2":[2,1]},"body":[1.0,2.0]}"#).unwrap();
        assert_eq!(ok.shape(), Shape::D2(2, 1));
        let bad = serde_json::from_str::<Tensor>(r#"{"shape":{"D1":3},"body":[1.0]}"#);
        assert!(bad.is_err());
    }
}
