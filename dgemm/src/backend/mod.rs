use crate::matrix::Matrix;

mod cpu;

pub use cpu::*;

/// Scalars of `C := alpha * (A * B) + beta * C`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GemmParams {
    pub alpha: f64,
    pub beta: f64,
}

impl GemmParams {
    #[inline]
    pub const fn new(alpha: f64, beta: f64) -> Self {
        GemmParams { alpha, beta }
    }
}

impl Default for GemmParams {
    fn default() -> Self {
        GemmParams::new(0.3, 0.4)
    }
}

pub trait Gemm {
    type Error: std::error::Error + Send + Sync + 'static;

    fn name(&self) -> &str;

    /// performs a generic matrix multiplication (gemm), overwriting `c` in place
    fn gemm(&self, params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<(), Self::Error>;
}

impl<G: Gemm + ?Sized> Gemm for &G {
    type Error = G::Error;

    #[inline]
    fn name(&self) -> &str {
        G::name(self)
    }

    #[inline]
    fn gemm(&self, params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<(), Self::Error> {
        G::gemm(self, params, a, b, c)
    }
}

/// Panics unless all three operands share one size.
pub fn assert_same_size(a: &Matrix, b: &Matrix, c: &Matrix) {
    assert_eq!(a.size(), b.size(), "A and B must have the same size");
    assert_eq!(a.size(), c.size(), "A and C must have the same size");
}
