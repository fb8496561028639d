use crate::backend::GemmParams;
use crate::matrix::Matrix;

/// Triple loop gemm (i outer, j middle, k inner) with a single accumulator per cell.
pub fn gemm_naive(params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = a.size();
    assert_eq!(b.size(), n);
    assert_eq!(c.size(), n);
    let GemmParams { alpha, beta } = *params;
    let pa = a.as_slice();
    let pb = b.as_slice();
    let pc = c.as_mut_slice();
    for i in 0..n {
        let a_row = &pa[i * n..(i + 1) * n];
        for j in 0..n {
            let mut acc = 0.0f64;
            for k in 0..n {
                acc += a_row[k] * pb[k * n + j];
            }
            let cij = &mut pc[i * n + j];
            *cij = alpha * acc + beta * *cij;
        }
    }
}

/// Largest absolute element-wise difference between two matrices of equal size.
pub fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
    assert_eq!(a.size(), b.size(), "compared matrices must have the same size");
    let mut max = 0.0f64;
    for (&x, &y) in std::iter::zip(a.as_slice(), b.as_slice()) {
        let diff = (x - y).abs();
        if max < diff {
            max = diff;
        }
    }
    max
}
