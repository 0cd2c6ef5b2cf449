use crate::tensor::Tensor;
use approx::{AbsDiffEq, RelativeEq};
use std::iter::zip;

impl AbsDiffEq for Tensor {
    type Epsilon = f32;
    fn default_epsilon() -> Self::Epsilon {
        f32::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.len() == other.len()
            && zip(self.as_slice(), other.as_slice()).all(|(a, b)| f32::abs_diff_eq(a, b, epsilon))
    }
}

impl RelativeEq for Tensor {
    fn default_max_relative() -> Self::Epsilon {
        f32::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.len() == other.len()
            && zip(self.as_slice(), other.as_slice())
                .all(|(a, b)| f32::relative_eq(a, b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod test {
    use crate::tensor::{Shape, Tensor};
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq};

    #[test]
    fn test_tolerance() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0]);
        let b = Tensor::new(vec![1.0, 2.0 + 1e-7, 3.0], Shape::D2(3, 1));
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        assert_relative_eq!(a, b, max_relative = 1e-6);
        assert_abs_diff_ne!(a, Tensor::from_vec(vec![1.0, 2.0]), epsilon = 1.0);
    }
}
