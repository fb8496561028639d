mod kernel_macros;

use crate::error::{Error, Stage};
pub(crate) use kernel_macros::*;
use opencl3::command_queue::{CL_QUEUE_PROFILING_ENABLE, CommandQueue};
use opencl3::context::Context;
use opencl3::device::{CL_DEVICE_TYPE_GPU, Device};
use opencl3::error_codes::CL_DEVICE_NOT_FOUND;
use opencl3::kernel::Kernel;
use opencl3::platform::get_platforms;
use opencl3::program::Program;
use tracing::{debug, info, warn};

pub type Result<T> = std::result::Result<T, Error>;

#[inline]
pub(crate) const fn next_multiple(n: usize, of: usize) -> usize {
    let rem = n % of;
    if rem == 0 { n } else { n + (of - rem) }
}

/// Case-insensitive substring match of a platform name against an optional hint.
pub(crate) fn platform_matches(name: &str, hint: Option<&str>) -> bool {
    match hint {
        Some(hint) => name.to_lowercase().contains(&hint.to_lowercase()),
        None => true,
    }
}

/// Picks the first GPU of the first platform whose name matches `platform_hint`.
pub fn select_device(platform_hint: Option<&str>) -> Result<Device> {
    let platforms = wrap_cl_error!(get_platforms(), Stage::Platform, "Failed to enumerate platforms")?;
    for platform in platforms {
        let name = wrap_cl_error!(platform.name(), Stage::Platform, "Failed to query platform name")?;
        if !platform_matches(&name, platform_hint) {
            debug!(platform = %name, "skipping platform");
            continue;
        }
        let device_ids = match platform.get_devices(CL_DEVICE_TYPE_GPU) {
            Ok(ids) => ids,
            Err(err) if err.0 == CL_DEVICE_NOT_FOUND => Vec::new(),
            Err(err) => return Err(Error::from_cl_err(err, Stage::Device, format!("Failed to enumerate devices of {name}"))),
        };
        if let Some(&device_id) = device_ids.first() {
            let device = Device::new(device_id);
            let device_name = wrap_cl_error!(device.name(), Stage::Device, "Failed to query device name")?;
            info!(platform = %name, device = %device_name, "selected OpenCL device");
            if !supports_fp64(&device)? {
                warn!(device = %device_name, "device does not report cl_khr_fp64");
            }
            return Ok(device);
        }
    }
    Err(Error::NoDevicesFound)
}

pub fn get_default_device() -> Result<Device> {
    select_device(None)
}

pub fn supports_fp64(device: &Device) -> Result<bool> {
    let extensions = wrap_cl_error!(device.extensions(), Stage::Device, "Failed to query device extensions")?;
    Ok(extensions.split_whitespace().any(|ext| ext == "cl_khr_fp64"))
}

pub fn get_context(device: &Device) -> Result<Context> {
    wrap_cl_error!(Context::from_device(device), Stage::Context, "Failed to get context")
}

pub fn create_program(context: &Context, source: &str, options: &str) -> Result<Program> {
    Program::create_and_build_from_source(context, source, options).map_err(|log| Error::CreateProgramError { log })
}

pub fn create_kernel(program: &Program, name: &str) -> Result<Kernel> {
    wrap_cl_error!(Kernel::create(program, name), Stage::Kernel, "Failed to create kernel: {name}")
}

#[allow(deprecated)]
pub fn create_queue(context: &Context) -> Result<CommandQueue> {
    wrap_cl_error!(
        CommandQueue::create_default(context, CL_QUEUE_PROFILING_ENABLE),
        Stage::Queue,
        "Failed to create command queue"
    )
}

#[cfg(test)]
#[allow(unused)]
pub struct TestContext {
    pub device: Device,
    pub context: Context,
    pub queue: CommandQueue,
}

#[cfg(test)]
pub fn create_test_context() -> Result<TestContext> {
    let device = get_default_device()?;
    let context = get_context(&device)?;
    let queue = create_queue(&context)?;
    Ok(TestContext { device, context, queue })
}
