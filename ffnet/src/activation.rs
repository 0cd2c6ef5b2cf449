use serde::{Deserialize, Serialize};

/// Transfer function applied to a neuron's weighted sum.
///
/// `derivative` takes the already-activated output rather than the raw sum, so
/// the backward pass never has to keep pre-activation values around.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFn {
    #[default]
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
}

impl ActivationFn {
    #[inline]
    pub fn activate(&self, x: f32) -> f32 {
        match self {
            ActivationFn::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFn::Tanh => x.tanh(),
            ActivationFn::ReLU => x.max(0.0),
            ActivationFn::Identity => x,
        }
    }

    #[inline]
    pub fn derivative(&self, output: f32) -> f32 {
        match self {
            ActivationFn::Sigmoid => output * (1.0 - output),
            // output is already tanh(x)
            ActivationFn::Tanh => 1.0 - output * output,
            ActivationFn::ReLU => {
                if output <= 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            ActivationFn::Identity => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFn::Sigmoid => "sigmoid",
            ActivationFn::Tanh => "tanh",
            ActivationFn::ReLU => "relu",
            ActivationFn::Identity => "identity",
        }
    }
}

#[cfg(test)]
mod test {
    use super::ActivationFn;
    use approx::assert_abs_diff_eq;

    const SAMPLES: [f32; 9] = [-8.0, -3.5, -1.0, -0.25, 0.0, 0.25, 1.0, 3.5, 8.0];

    #[test]
    fn test_sigmoid() {
        let f = ActivationFn::Sigmoid;
        assert_abs_diff_eq!(f.activate(0.0), 0.5);
        for x in SAMPLES {
            let out = f.activate(x);
            assert!(out > 0.0 && out < 1.0);
            assert_abs_diff_eq!(f.derivative(out), out * (1.0 - out), epsilon = 1e-7);
        }
        assert_abs_diff_eq!(f.derivative(f.activate(0.0)), 0.25);
    }

    #[test]
    fn test_tanh_derivative_matches_analytic() {
        let f = ActivationFn::Tanh;
        for x in SAMPLES {
            let expected = 1.0 - x.tanh().powi(2);
            assert_abs_diff_eq!(f.derivative(f.activate(x)), expected, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(f.derivative(f.activate(0.0)), 1.0);
    }

    #[test]
    fn test_relu() {
        let f = ActivationFn::ReLU;
        for x in SAMPLES {
            let out = f.activate(x);
            assert_eq!(out, x.max(0.0));
            if x < 0.0 {
                assert_eq!(f.derivative(out), 0.0);
            } else if x > 0.0 {
                assert_eq!(f.derivative(out), 1.0);
            }
        }
    }

    #[test]
    fn test_identity() {
        let f = ActivationFn::Identity;
        for x in SAMPLES {
            assert_eq!(f.activate(x), x);
            assert_eq!(f.derivative(x), 1.0);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ActivationFn::ReLU).unwrap(), "\"relu\"");
        let f: ActivationFn = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(f, ActivationFn::Tanh);
    }
}
