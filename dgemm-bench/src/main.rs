//! Compares the serial reference GEMM against the OpenCL offload path.
//!
//! ```bash
//! dgemm-bench        # 1024 x 1024
//! dgemm-bench 256
//! ```
//!
//! The kernel source is read from `dgemm-kernelLocal.cl` in the working directory.

use anyhow::{Context, Result};
use clap::Parser;
use dgemm::backend::CpuBackend;
use dgemm::bench::{BenchmarkConfig, BenchmarkInputs, DEFAULT_SIZE, ReferenceDone, run_offload, run_reference};
use dgemm_opencl::{OffloadConfig, OpenCLBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Dense matrix multiply benchmark: naive CPU vs. OpenCL GPU
#[derive(Parser, Debug)]
#[command(name = "dgemm-bench")]
#[command(version)]
struct Args {
    /// Matrix dimension N (matrices are N x N)
    #[arg(value_parser = clap::value_parser!(u32).range(1..), default_value_t = DEFAULT_SIZE as u32)]
    size: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = BenchmarkConfig::with_size(args.size as usize);

    let mut inputs = BenchmarkInputs::new(&config);

    // reference line is printed before any device work
    let reference_time = run_reference(&CpuBackend::new(), &config.params, &mut inputs)?;
    print!("{}", ReferenceDone(reference_time));

    let offload = OpenCLBackend::new(OffloadConfig::default()).context("failed to set up the OpenCL backend")?;
    info!(device = offload.device_name(), size = config.size, "running offload");

    let report = run_offload(&offload, &config.params, &mut inputs, reference_time)?;
    print!("{}", report.offload_done());
    Ok(())
}
