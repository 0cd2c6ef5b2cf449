use crate::tensor::Tensor;
use std::fmt::{Debug, Formatter, Write};

const DEBUG_LIMIT: usize = 10;

fn fmt_elements(f: &mut Formatter<'_>, slice: &[f32]) -> std::fmt::Result {
    for (i, x) in slice.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        Debug::fmt(x, f)?;
    }
    Ok(())
}

pub(crate) fn fmt_slice(f: &mut Formatter<'_>, slice: &[f32]) -> std::fmt::Result {
    f.write_char('[')?;
    if slice.len() > DEBUG_LIMIT {
        let half = DEBUG_LIMIT / 2;
        fmt_elements(f, &slice[..half])?;
        write!(f, ", ...({} hidden), ", slice.len() - DEBUG_LIMIT)?;
        fmt_elements(f, &slice[slice.len() - half..])?;
    } else {
        fmt_elements(f, slice)?;
    }
    f.write_char(']')
}

impl Debug for Tensor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_slice(f, self.as_slice())?;
        write!(f, " shape={} len={}", self.shape(), self.len())
    }
}

#[cfg(test)]
mod test {
    use crate::tensor::Tensor;

    #[test]
    fn test_debug_truncates_long_bodies() {
        let short = Tensor::from_vec(vec![1.0, 2.5]);
        assert_eq!(format!("{short:?}"), "[1.0, 2.5] shape=(2) len=2");

        let long = Tensor::from_vec((0..14).map(|v| v as f32).collect());
        assert_eq!(
            format!("{long:?}"),
            "[0.0, 1.0, 2.0, 3.0, 4.0, ...(4 hidden), 9.0, 10.0, 11.0, 12.0, 13.0] shape=(14) len=14"
        );
    }
}
