use crate::error::Stage;
use crate::util::{Result, wrap_cl_error};
use dgemm::matrix::Matrix;
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::event::CL_COMPLETE;
use opencl3::memory::{Buffer, CL_MEM_COPY_HOST_PTR, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE};
use opencl3::types::{CL_BLOCKING, cl_double, cl_event, cl_mem_flags};
use std::ffi::c_void;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

impl Access {
    fn flags(self) -> cl_mem_flags {
        match self {
            Access::ReadOnly => CL_MEM_READ_ONLY,
            Access::ReadWrite => CL_MEM_READ_WRITE,
        }
    }
}

/// Device-side copy of a square matrix. Released when dropped.
#[derive(Debug)]
pub struct DeviceMatrix {
    buffer: Buffer<cl_double>,
    size: usize,
}

impl DeviceMatrix {
    /// Allocates a buffer and copies `host` into it as part of creation.
    pub fn from_host(context: &Context, access: Access, host: &Matrix) -> Result<Self> {
        let size = host.size();
        let src = host.as_slice();
        // the runtime copies from host_ptr during creation and never writes through it
        let buffer = unsafe {
            wrap_cl_error!(
                Buffer::<cl_double>::create(
                    context,
                    access.flags() | CL_MEM_COPY_HOST_PTR,
                    src.len(),
                    src.as_ptr() as *mut c_void,
                ),
                Stage::Buffer,
                "Failed to create {size}x{size} {access:?} buffer"
            )?
        };
        Ok(DeviceMatrix { buffer, size })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer<cl_double> {
        &self.buffer
    }

    /// Blocking copy of the buffer back into `dst`, after the events in `wait_list` complete.
    pub fn read_sync(&self, queue: &CommandQueue, dst: &mut Matrix, wait_list: &[cl_event]) -> Result<()> {
        assert_eq!(self.size, dst.size());
        let read_event = unsafe {
            wrap_cl_error!(
                queue.enqueue_read_buffer(&self.buffer, CL_BLOCKING, 0, dst.as_mut_slice(), wait_list),
                Stage::ReadBack,
                "Failed to enqueue buffer read"
            )?
        };
        if cfg!(debug_assertions) {
            let status = wrap_cl_error!(
                read_event.command_execution_status(),
                Stage::ReadBack,
                "Failed to get command execution status"
            )?;
            assert_eq!(status.0, CL_COMPLETE);
        }
        Ok(())
    }
}
