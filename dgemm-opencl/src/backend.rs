use crate::buffer::{Access, DeviceMatrix};
use crate::config::OffloadConfig;
use crate::error::{Error, Stage};
use crate::kernels::{GemmProgram, KernelVariant, fits_kernel_index};
use crate::util::{self, Result, validate, wrap_cl_error};
use dgemm::backend::{Gemm, GemmParams, assert_same_size};
use dgemm::matrix::Matrix;
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::Device;
use tracing::{debug, debug_span};

/// Context and command queue that live for a single offload invocation.
///
/// The queue is declared first so it is released before the context.
#[derive(Debug)]
pub struct Session {
    pub queue: CommandQueue,
    pub context: Context,
}

impl Session {
    pub fn open(device: &Device) -> Result<Self> {
        let context = util::get_context(device)?;
        let queue = util::create_queue(&context)?;
        Ok(Session { queue, context })
    }
}

/// GEMM offloaded to an OpenCL GPU.
///
/// Only the selected device is kept between calls. Every [`OpenCLBackend::gemm`] call builds its
/// own context, queue, program, kernel and buffers and releases all of them before returning,
/// so calls do not depend on one another.
#[derive(Debug)]
pub struct OpenCLBackend {
    device: Device,
    device_name: String,
    config: OffloadConfig,
}

impl OpenCLBackend {
    pub fn new(config: OffloadConfig) -> Result<Self> {
        let device = util::select_device(config.platform.as_deref())?;
        Self::from_device(device, config)
    }

    pub fn from_device(device: Device, config: OffloadConfig) -> Result<Self> {
        let device_name = wrap_cl_error!(device.name(), Stage::Device, "Failed to query device name")?;
        Ok(OpenCLBackend {
            device,
            device_name,
            config,
        })
    }

    #[inline]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    #[inline]
    pub fn variant(&self) -> KernelVariant {
        self.config.variant
    }

    /// Computes `c := alpha * a * b + beta * c` on the device.
    pub fn gemm(&self, params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
        assert_same_size(a, b, c);
        let n = a.size();
        validate!(n >= 1, "matrix size must be at least 1");
        validate!(fits_kernel_index(n), "matrix size overflows the kernel int index range");

        let variant = self.config.variant;
        let span = debug_span!("offload_gemm", size = n, %variant);
        let _enter = span.enter();

        let session = Session::open(&self.device)?;
        debug!("session opened");

        let source = self.config.source.load()?;
        debug!(bytes = source.len(), "program source loaded");

        let a_ocl = DeviceMatrix::from_host(&session.context, Access::ReadOnly, a)?;
        let b_ocl = DeviceMatrix::from_host(&session.context, Access::ReadOnly, b)?;
        let c_ocl = DeviceMatrix::from_host(&session.context, Access::ReadWrite, c)?;
        debug!("device buffers created");

        let program = GemmProgram::create(&session.context, &source, variant, &self.config.build_options)?;
        debug!(entry_point = program.variant().entry_point(), "program built");

        let kernel_evt = program.gemm(&session.queue, params, &a_ocl, &b_ocl, &c_ocl)?;
        c_ocl.read_sync(&session.queue, c, &[kernel_evt.get()])?;

        if let (Ok(start), Ok(end)) = (kernel_evt.profiling_command_start(), kernel_evt.profiling_command_end()) {
            debug!(kernel_ns = end.saturating_sub(start), "kernel finished");
        }
        Ok(())
    }
}

impl Gemm for OpenCLBackend {
    type Error = Error;

    fn name(&self) -> &str {
        "opencl"
    }

    fn gemm(&self, params: &GemmParams, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
        OpenCLBackend::gemm(self, params, a, b, c)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::ProgramSource;
    use approx::assert_abs_diff_eq;
    use dgemm::backend::{CpuBackend, max_abs_diff};
    use dgemm::bench::{BenchmarkConfig, run_benchmark};

    fn builtin_backend(variant: KernelVariant) -> Result<OpenCLBackend> {
        let config = OffloadConfig::builder()
            .variant(variant)
            .source(ProgramSource::builtin())
            .build()?;
        OpenCLBackend::new(config)
    }

    #[test]
    #[ignore = "requires an OpenCL GPU device"]
    fn test_repeated_invocations() -> Result<()> {
        let backend = builtin_backend(KernelVariant::Baseline)?;
        let params = GemmParams::default();
        let a = Matrix::filled(32, 1.0);
        let b = Matrix::filled(32, 2.0);
        let mut first = Matrix::zeroed(32);
        let mut second = Matrix::zeroed(32);
        backend.gemm(&params, &a, &b, &mut first)?;
        backend.gemm(&params, &a, &b, &mut second)?;
        assert_eq!(max_abs_diff(&first, &second), 0.0);
        Ok(())
    }

    #[test]
    #[ignore = "requires an OpenCL GPU device"]
    fn test_missing_source() -> Result<()> {
        let config = OffloadConfig::builder()
            .source(ProgramSource::file("missing-kernel.cl"))
            .build()?;
        let backend = OpenCLBackend::new(config)?;
        let mut c = Matrix::zeroed(4);
        let err = backend
            .gemm(&GemmParams::default(), &Matrix::zeroed(4), &Matrix::zeroed(4), &mut c)
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
        Ok(())
    }

    #[test]
    #[ignore = "requires an OpenCL GPU device"]
    fn test_bad_source() -> Result<()> {
        let config = OffloadConfig::builder()
            .source(ProgramSource::inline("__kernel void dgemm( {"))
            .build()?;
        let backend = OpenCLBackend::new(config)?;
        let mut c = Matrix::zeroed(4);
        let err = backend
            .gemm(&GemmParams::default(), &Matrix::zeroed(4), &Matrix::zeroed(4), &mut c)
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Program));
        Ok(())
    }

    #[test]
    #[ignore = "requires an OpenCL GPU device"]
    fn test_benchmark_end_to_end() -> Result<()> {
        for variant in KernelVariant::ALL {
            let backend = builtin_backend(variant)?;
            let config = BenchmarkConfig::default();
            let report = run_benchmark(&CpuBackend::new(), &backend, &config).unwrap();
            assert!(report.max_error <= 1e-6);
            assert!(report.speedup().is_finite() && report.speedup() > 0.0);
            assert_abs_diff_eq!(config.expected_value(), 614.4, epsilon = 1e-9);
        }
        Ok(())
    }
}
