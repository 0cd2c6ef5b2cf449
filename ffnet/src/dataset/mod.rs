use crate::tensor::Tensor;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::slice::Chunks;

pub mod features;
pub mod synthetic;

pub use features::InputFeature;
pub use synthetic::{Point, Preset, Rect};

/// An input vector paired with the output the network should produce for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    input: Tensor,
    target: Tensor,
    /// Canvas position the input was derived from, for plotting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point: Option<Point>,
}

impl DataItem {
    pub fn new(input: Tensor, target: Tensor) -> Self {
        DataItem {
            input,
            target,
            point: None,
        }
    }

    pub fn from_flat(input: Vec<f32>, target: Vec<f32>) -> Self {
        Self::new(Tensor::from_vec(input), Tensor::from_vec(target))
    }

    /// `width` binary digits of `value`, most significant first, with a
    /// single 0/1 target.
    pub fn binary(value: u64, width: usize, label: bool) -> Self {
        let digits = (0..width)
            .rev()
            .map(|shift| (value.checked_shr(shift as u32).unwrap_or(0) & 1) as f32)
            .collect();
        Self::from_flat(digits, vec![if label { 1.0 } else { 0.0 }])
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }

    #[inline]
    pub fn input(&self) -> &Tensor {
        &self.input
    }

    #[inline]
    pub fn target(&self) -> &Tensor {
        &self.target
    }

    #[inline]
    pub fn point(&self) -> Option<Point> {
        self.point
    }
}

/// Ordered collection of training items. Never reordered in place; each
/// epoch works on a [`Shuffled`] view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    items: Vec<DataItem>,
}

impl Dataset {
    pub fn new(items: Vec<DataItem>) -> Self {
        Dataset { items }
    }

    #[inline]
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: DataItem) {
        self.items.push(item);
    }

    /// Uniformly random permutation of the items.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Shuffled<'_> {
        let mut order: Vec<&DataItem> = self.items.iter().collect();
        order.shuffle(rng);
        Shuffled { order }
    }
}

impl FromIterator<DataItem> for Dataset {
    fn from_iter<T: IntoIterator<Item = DataItem>>(iter: T) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataItem;
    type IntoIter = std::slice::Iter<'a, DataItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One epoch's ordering of a dataset.
#[derive(Clone, Debug)]
pub struct Shuffled<'a> {
    order: Vec<&'a DataItem>,
}

impl<'a> Shuffled<'a> {
    #[inline]
    pub fn items(&self) -> &[&'a DataItem] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consecutive batches of `size` items; the last one may be shorter.
    pub fn batches(&self, size: usize) -> Chunks<'_, &'a DataItem> {
        assert!(size > 0, "Batch size must be positive");
        self.order.chunks(size)
    }
}
