use std::fmt::{Debug, Display, Formatter, Write};
use std::ops::{Index, IndexMut};

/// A square, row-major matrix of doubles.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn filled(size: usize, value: f64) -> Self {
        Matrix {
            size,
            data: vec![value; size * size],
        }
    }

    #[inline]
    pub fn zeroed(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    pub fn from_vec(size: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), size * size, "matrix data does not match {size}x{size}");
        Matrix { size, data }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.size && col < self.size {
            Some(self.data[row * self.size + col])
        } else {
            None
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.size.max(1))
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.size && col < self.size, "index ({row}, {col}) out of bounds");
        &self.data[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(row < self.size && col < self.size, "index ({row}, {col}) out of bounds");
        &mut self.data[row * self.size + col]
    }
}

impl AsRef<[f64]> for Matrix {
    #[inline]
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

impl AsMut<[f64]> for Matrix {
    #[inline]
    fn as_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                write!(f, "{value:.6}")?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl Debug for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("size", &self.size)
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for Matrix {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.size == other.size
            && std::iter::zip(&self.data, &other.data).all(|(a, b)| <f64 as approx::AbsDiffEq>::abs_diff_eq(a, b, epsilon))
    }
}
