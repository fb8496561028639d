use crate::backend::cpu::math;
use crate::backend::{Gemm, GemmParams, assert_same_size};
use crate::matrix::Matrix;
use std::convert::Infallible;

/// Serial host-side reference path.
#[derive(Debug, Default, Copy, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Gemm for CpuBackend {
    type Error = Infallible;

    fn name(&self) -> &str {
        "cpu"
    }

    fn gemm(&self, params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<(), Infallible> {
        assert_same_size(a, b, c);
        math::gemm_naive(params, a, b, c);
        Ok(())
    }
}
