#[cfg(test)]
mod test;

use crate::buffer::DeviceMatrix;
use crate::error::Stage;
use crate::kernels::KernelVariant;
use crate::util::*;
use dgemm::backend::GemmParams;
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::event::Event;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use opencl3::types::{cl_double, cl_int, cl_uint};
use std::ptr;

#[allow(unused)]
pub mod constants {
    /// Work-group edge length in both dimensions.
    pub const WORK_GROUP_SIZE: usize = 4;
    pub const WORK_DIM: u32 = 2;
}

/// Global and local NDRange sizes for an `n x n` output.
pub(crate) fn work_sizes(n: usize) -> ([usize; 2], [usize; 2]) {
    let global = next_multiple(n, constants::WORK_GROUP_SIZE);
    (
        [global, global],
        [constants::WORK_GROUP_SIZE, constants::WORK_GROUP_SIZE],
    )
}

/// Whether every flat index of an `n x n` matrix fits the kernels' `int` arithmetic.
pub(crate) fn fits_kernel_index(n: usize) -> bool {
    n.checked_mul(n).is_some_and(|len| len <= cl_int::MAX as usize)
}

// Fields drop in declaration order: kernel before program.
#[derive(Debug)]
pub(crate) struct GemmProgram {
    kernel: Kernel,
    #[allow(unused)]
    program: Program,
    variant: KernelVariant,
}

impl GemmProgram {
    pub(crate) fn create(context: &Context, source: &str, variant: KernelVariant, options: &str) -> Result<Self> {
        let mut code = format_c_defines!("BSIZE" => constants::WORK_GROUP_SIZE);
        code.push_str(source);
        let program = create_program(context, code.as_str(), options)?;
        let kernel = create_kernel(&program, variant.entry_point())?;
        Ok(GemmProgram { kernel, program, variant })
    }

    #[inline]
    pub(crate) fn variant(&self) -> KernelVariant {
        self.variant
    }

    fn set_arg<T>(&self, index: cl_uint, name: &str, value: &T) -> Result<()> {
        wrap_cl_error!(
            unsafe { self.kernel.set_arg(index, value) },
            Stage::KernelArg,
            "Failed to set argument {index} ({name}) of {}",
            self.variant.entry_point()
        )
    }

    fn bind_args(&self, params: &GemmParams, a: &DeviceMatrix, b: &DeviceMatrix, c: &DeviceMatrix) -> Result<()> {
        let n = a.size() as cl_int;
        let alpha: cl_double = params.alpha;
        let beta: cl_double = params.beta;
        self.set_arg(0, "M", &n)?;
        self.set_arg(1, "N", &n)?;
        self.set_arg(2, "K", &n)?;
        self.set_arg(3, "alpha", &alpha)?;
        self.set_arg(4, "A", a.buffer())?;
        self.set_arg(5, "lda", &n)?;
        self.set_arg(6, "B", b.buffer())?;
        self.set_arg(7, "ldb", &n)?;
        self.set_arg(8, "beta", &beta)?;
        self.set_arg(9, "C", c.buffer())?;
        self.set_arg(10, "ldc", &n)?;
        Ok(())
    }

    /// Binds all kernel arguments and enqueues the NDRange; `c` is updated in place on the device.
    pub(crate) fn gemm(
        &self,
        queue: &CommandQueue,
        params: &GemmParams,
        a: &DeviceMatrix,
        b: &DeviceMatrix,
        c: &DeviceMatrix,
    ) -> Result<Event> {
        let n = a.size();
        assert_eq!(b.size(), n);
        assert_eq!(c.size(), n);
        self.bind_args(params, a, b, c)?;
        let (global, local) = work_sizes(n);
        wrap_cl_error!(
            unsafe {
                queue.enqueue_nd_range_kernel(
                    self.kernel.get(),
                    constants::WORK_DIM,
                    ptr::null(),
                    global.as_ptr(),
                    local.as_ptr(),
                    &[],
                )
            },
            Stage::Enqueue,
            "Failed to enqueue {} kernel",
            self.variant.entry_point()
        )
    }
}
