use super::*;
use crate::buffer::Access;
use crate::source::ProgramSource;
use approx::assert_abs_diff_eq;
use dgemm::backend::{CpuBackend, Gemm};
use dgemm::matrix::Matrix;
use dgemm::util::bench::get_square_matrices;

#[test]
fn test_work_sizes() {
    assert_eq!(work_sizes(1024), ([1024, 1024], [4, 4]));
    assert_eq!(work_sizes(1), ([4, 4], [4, 4]));
    assert_eq!(work_sizes(6), ([8, 8], [4, 4]));
}

#[test]
fn test_fits_kernel_index() {
    assert!(fits_kernel_index(1));
    assert!(fits_kernel_index(1024));
    assert!(fits_kernel_index(46340));
    assert!(!fits_kernel_index(46341));
    assert!(!fits_kernel_index(i32::MAX as usize));
    assert!(!fits_kernel_index(usize::MAX));
}

fn run_device_gemm(variant: KernelVariant, params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    let TestContext { context, queue, .. } = create_test_context()?;
    let source = ProgramSource::builtin();
    let program = GemmProgram::create(&context, &source.load()?, variant, "")?;
    assert_eq!(program.variant(), variant);
    let a_ocl = DeviceMatrix::from_host(&context, Access::ReadOnly, a)?;
    let b_ocl = DeviceMatrix::from_host(&context, Access::ReadOnly, b)?;
    let c_ocl = DeviceMatrix::from_host(&context, Access::ReadWrite, c)?;
    let event = program.gemm(&queue, params, &a_ocl, &b_ocl, &c_ocl)?;
    c_ocl.read_sync(&queue, c, &[event.get()])
}

macro_rules! impl_tests {
    ($mod_name:ident, $variant:expr) => {
        mod $mod_name {
            use super::*;

            #[test]
            #[ignore = "requires an OpenCL GPU device"]
            fn test_constant_inputs() -> Result<()> {
                let params = GemmParams::new(0.3, 0.4);
                for n in [1, 2, 5, 64] {
                    let a = Matrix::filled(n, 1.0);
                    let b = Matrix::filled(n, 2.0);
                    let mut c = Matrix::zeroed(n);
                    run_device_gemm($variant, &params, &a, &b, &mut c)?;
                    let expected = 0.3 * n as f64 * 2.0;
                    for &v in c.as_slice() {
                        assert_abs_diff_eq!(v, expected, epsilon = 1e-9);
                    }
                }
                Ok(())
            }

            #[test]
            #[ignore = "requires an OpenCL GPU device"]
            fn test_matches_reference() -> Result<()> {
                let params = GemmParams::new(0.75, -0.5);
                let [a, b, c] = get_square_matrices(67);
                let mut expected = c.clone();
                CpuBackend::new().gemm(&params, &a, &b, &mut expected).unwrap();
                let mut actual = c;
                run_device_gemm($variant, &params, &a, &b, &mut actual)?;
                assert_abs_diff_eq!(expected, actual, epsilon = 1e-9);
                Ok(())
            }

            #[test]
            #[ignore = "requires an OpenCL GPU device"]
            fn test_scalar() -> Result<()> {
                let a = Matrix::filled(1, 3.0);
                let b = Matrix::filled(1, -2.0);
                let mut c = Matrix::filled(1, 10.0);
                run_device_gemm($variant, &GemmParams::new(0.5, 0.25), &a, &b, &mut c)?;
                assert_abs_diff_eq!(c[(0, 0)], -0.5, epsilon = 1e-12);
                Ok(())
            }
        }
    };
}

impl_tests!(baseline, KernelVariant::Baseline);
impl_tests!(tiled, KernelVariant::Tiled);
