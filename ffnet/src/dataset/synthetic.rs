use crate::activation::ActivationFn;
use crate::dataset::features::{encode_point, InputFeature};
use crate::dataset::{DataItem, Dataset};
use crate::error::{Error, Result};
use crate::loss::LossFn;
use crate::net::layer::LayerSpec;
use crate::net::{NetBuilder, TrainConfig};
use crate::tensor::Tensor;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Axis aligned canvas bounds. Contains its minimum edges but not its
/// maximum ones.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// `size` by `size`, centered on the origin.
    pub fn centered(size: f32) -> Self {
        Rect::new(-size / 2.0, -size / 2.0, size, size)
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }
}

impl Dataset {
    /// `count / 2` items labelled `1` drawn from `first`, followed by as many
    /// labelled `0` drawn from `second`. Points outside `canvas` are redrawn,
    /// so each generator must be able to land inside it.
    pub fn two_class<R, F, G>(
        rng: &mut R,
        canvas: Rect,
        count: usize,
        features: &[InputFeature],
        mut first: F,
        mut second: G,
    ) -> Dataset
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Point,
        G: FnMut(&mut R) -> Point,
    {
        assert!(
            canvas.width > 0.0 && canvas.height > 0.0,
            "Canvas must have a positive area"
        );
        let half = count / 2;
        let mut items = Vec::with_capacity(half * 2);
        for _ in 0..half {
            let p = sample_inside(rng, canvas, &mut first);
            items.push(labelled(features, p, 1.0));
        }
        for _ in 0..half {
            let p = sample_inside(rng, canvas, &mut second);
            items.push(labelled(features, p, 0.0));
        }
        Dataset::new(items)
    }
}

fn sample_inside<R, F>(rng: &mut R, canvas: Rect, generator: &mut F) -> Point
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Point,
{
    loop {
        let p = generator(rng);
        if canvas.contains(p) {
            return p;
        }
    }
}

fn labelled(features: &[InputFeature], p: Point, label: f32) -> DataItem {
    DataItem::new(encode_point(features, p), Tensor::from_vec(vec![label])).with_point(p)
}

/// Built-in two-class problems on a 20 by 20 canvas centered on the origin.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Lower left quadrant against upper right.
    Quadrants,
    /// A disc of radius 5 inside a ring reaching radius 10.
    CircleInCircle,
    /// Upper left and lower right against the other two quarters.
    Quarters,
    /// Two interleaved arms of an Archimedean spiral.
    Spiral,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Quadrants,
        Preset::CircleInCircle,
        Preset::Quarters,
        Preset::Spiral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Quadrants => "quadrants",
            Preset::CircleInCircle => "circle_in_circle",
            Preset::Quarters => "quarters",
            Preset::Spiral => "spiral",
        }
    }

    pub fn canvas(self) -> Rect {
        Rect::centered(20.0)
    }

    pub fn sample_count(self) -> usize {
        match self {
            Preset::Quadrants => 100,
            _ => 400,
        }
    }

    pub fn features(self) -> Vec<InputFeature> {
        use InputFeature::*;
        match self {
            Preset::Quadrants => vec![X, Y],
            Preset::CircleInCircle | Preset::Quarters => vec![X, Y, SinX, SinY],
            Preset::Spiral => vec![X, Y, XSquared, YSquared, SinX, SinY],
        }
    }

    pub fn layers(self) -> Vec<LayerSpec> {
        use ActivationFn::*;
        let inputs = self.features().len();
        let (hidden, hidden_activation): (&[usize], &[ActivationFn]) = match self {
            Preset::Quadrants => (&[2], &[Tanh]),
            Preset::CircleInCircle => (&[4, 4], &[Tanh, Sigmoid]),
            Preset::Quarters => (&[4, 2], &[Tanh, Tanh]),
            Preset::Spiral => (&[16, 4], &[Tanh, Tanh]),
        };
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut input_size = inputs;
        for (&size, &activation) in hidden.iter().zip(hidden_activation) {
            layers.push(LayerSpec::dense(input_size, size, activation));
            input_size = size;
        }
        layers.push(LayerSpec::dense(input_size, 1, Sigmoid));
        layers
    }

    pub fn loss(self) -> LossFn {
        LossFn::MeanSquared
    }

    pub fn config(self) -> TrainConfig {
        match self {
            Preset::Quadrants => TrainConfig::new(0.0003, 1000, 1),
            Preset::CircleInCircle => TrainConfig::new(0.3, 1000, 16),
            Preset::Quarters | Preset::Spiral => TrainConfig::new(0.03, 1000, 16),
        }
    }

    /// Builder preloaded with this preset's layers, loss and config.
    pub fn builder(self) -> NetBuilder {
        NetBuilder::new()
            .with_layers(self.layers())
            .with_loss(self.loss())
            .with_config(self.config())
    }

    pub fn dataset<R: Rng + ?Sized>(self, rng: &mut R) -> Dataset {
        let canvas = self.canvas();
        let features = self.features();
        let count = self.sample_count();
        match self {
            Preset::Quadrants => Dataset::two_class(
                rng,
                canvas,
                count,
                &features,
                |rng| Point::new(rng.gen_range(canvas.min_x()..=0.0), rng.gen_range(canvas.min_y()..=0.0)),
                |rng| Point::new(rng.gen_range(0.0..=canvas.max_x()), rng.gen_range(0.0..=canvas.max_y())),
            ),
            Preset::CircleInCircle => {
                let inner = canvas.width / 4.0;
                let outer = canvas.width / 2.0;
                Dataset::two_class(
                    rng,
                    canvas,
                    count,
                    &features,
                    |rng| {
                        let x = rng.gen_range(-inner..=inner);
                        let limit = (inner * inner - x * x).max(0.0).sqrt();
                        Point::new(x, rng.gen_range(-limit..=limit))
                    },
                    |rng| {
                        let x = rng.gen_range(-outer..=outer);
                        let upper = (outer * outer - x * x).max(0.0).sqrt();
                        let lower = if x.abs() > inner {
                            0.0
                        } else {
                            (inner * inner - x * x).max(0.0).sqrt()
                        };
                        let y = rng.gen_range(lower..=upper);
                        Point::new(x, if rng.gen_bool(0.5) { -y } else { y })
                    },
                )
            }
            Preset::Quarters => Dataset::two_class(
                rng,
                canvas,
                count,
                &features,
                |rng| {
                    let x = rng.gen_range(canvas.min_x()..=canvas.max_x());
                    let y = rng.gen_range(0.0..canvas.max_y());
                    Point::new(x, if x < 0.0 { y } else { -y })
                },
                |rng| {
                    let x = rng.gen_range(canvas.min_x()..=canvas.max_x());
                    let y = rng.gen_range(0.0..canvas.max_y());
                    Point::new(x, if x < 0.0 { -y } else { y })
                },
            ),
            Preset::Spiral => {
                let max_radius = canvas.width / 2.0;
                Dataset::two_class(
                    rng,
                    canvas,
                    count,
                    &features,
                    |rng| spiral_point(rng.gen_range(0.0..=max_radius), 0.0),
                    |rng| spiral_point(rng.gen_range(0.0..=max_radius), PI),
                )
            }
        }
    }
}

/// Point at `radius` on the spiral `theta = radius`, rotated by `phase`.
fn spiral_point(radius: f32, phase: f32) -> Point {
    let theta = radius + phase;
    Point::new(radius * theta.cos(), radius * theta.sin())
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::invalid("preset", s, "unknown preset"))
    }
}
