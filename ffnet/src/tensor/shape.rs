use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Write};

/// Logical layout of a flat tensor body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// `width`
    D1(usize),
    /// `width`, `height`
    D2(usize, usize),
    /// `width`, `height`, `depth`
    D3(usize, usize, usize),
}

impl Shape {
    #[inline]
    pub fn rank(&self) -> usize {
        match self {
            Shape::D1(..) => 1,
            Shape::D2(..) => 2,
            Shape::D3(..) => 3,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        match *self {
            Shape::D1(w) | Shape::D2(w, _) | Shape::D3(w, _, _) => w,
        }
    }

    #[inline]
    pub fn height(&self) -> Option<usize> {
        match *self {
            Shape::D1(_) => None,
            Shape::D2(_, h) | Shape::D3(_, h, _) => Some(h),
        }
    }

    #[inline]
    pub fn depth(&self) -> Option<usize> {
        match *self {
            Shape::D3(_, _, d) => Some(d),
            _ => None,
        }
    }

    /// Number of elements a body of this shape holds.
    #[inline]
    pub fn tensor_len(&self) -> usize {
        self.width() * self.height().unwrap_or(1) * self.depth().unwrap_or(1)
    }

    pub fn as_vec(&self) -> Vec<usize> {
        match *self {
            Shape::D1(w) => vec![w],
            Shape::D2(w, h) => vec![w, h],
            Shape::D3(w, h, d) => vec![w, h, d],
        }
    }
}

impl From<usize> for Shape {
    fn from(width: usize) -> Self {
        Shape::D1(width)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((w, h): (usize, usize)) -> Self {
        Shape::D2(w, h)
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((w, h, d): (usize, usize, usize)) -> Self {
        Shape::D3(w, h, d)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('(')?;
        for (i, extent) in self.as_vec().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(&extent, f)?;
        }
        f.write_char(')')
    }
}

#[cfg(test)]
mod test {
    use super::Shape;

    #[test]
    fn test_tensor_len() {
        assert_eq!(Shape::D1(7).tensor_len(), 7);
        assert_eq!(Shape::D2(3, 4).tensor_len(), 12);
        assert_eq!(Shape::D3(2, 3, 4).tensor_len(), 24);
        assert_eq!(Shape::D2(0, 4).tensor_len(), 0);
    }

    #[test]
    fn test_extents() {
        let shape: Shape = (2, 3, 4).into();
        assert_eq!(shape.rank(), 3);
        assert_eq!(shape.width(), 2);
        assert_eq!(shape.height(), Some(3));
        assert_eq!(shape.depth(), Some(4));
        assert_eq!(Shape::D1(5).height(), None);
        assert_eq!(Shape::D2(5, 1).depth(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::D1(3).to_string(), "(3)");
        assert_eq!(Shape::D3(1, 2, 3).to_string(), "(1, 2, 3)");
    }
}
