//! Reference vs. offload benchmark orchestration.
//!
//! Both paths receive the same inputs: `A` filled with one constant, `B` with another and
//! zeroed outputs. Each path is timed on its own; the outputs are then compared element-wise.

use crate::backend::{Gemm, GemmParams, max_abs_diff};
use crate::matrix::Matrix;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_SIZE: usize = 1024;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BenchmarkConfig {
    pub size: usize,
    pub params: GemmParams,
    pub a_value: f64,
    pub b_value: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            size: DEFAULT_SIZE,
            params: GemmParams::default(),
            a_value: 1.0,
            b_value: 2.0,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_size(size: usize) -> Self {
        BenchmarkConfig {
            size,
            ..Default::default()
        }
    }

    /// Value every output cell should hold when the outputs start zeroed.
    pub fn expected_value(&self) -> f64 {
        self.params.alpha * self.size as f64 * self.a_value * self.b_value
    }
}

pub struct BenchmarkInputs {
    pub a: Matrix,
    pub b: Matrix,
    pub c_host: Matrix,
    pub c_device: Matrix,
}

impl BenchmarkInputs {
    pub fn new(config: &BenchmarkConfig) -> Self {
        BenchmarkInputs {
            a: Matrix::filled(config.size, config.a_value),
            b: Matrix::filled(config.size, config.b_value),
            c_host: Matrix::zeroed(config.size),
            c_device: Matrix::zeroed(config.size),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub reference_time: Duration,
    pub offload_time: Duration,
    pub max_error: f64,
}

impl BenchmarkReport {
    /// Reference time divided by offload time.
    pub fn speedup(&self) -> f64 {
        self.reference_time.as_secs_f64() / self.offload_time.as_secs_f64()
    }

    /// The console lines that follow [`ReferenceDone`].
    pub fn offload_done(&self) -> OffloadDone<'_> {
        OffloadDone(self)
    }
}

/// First console line, printable as soon as the reference path finishes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReferenceDone(pub Duration);

impl Display for ReferenceDone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Reference done, time - {:.6}", self.0.as_secs_f64())
    }
}

/// Error, offload time and speedup lines.
#[derive(Debug, Copy, Clone)]
pub struct OffloadDone<'a>(&'a BenchmarkReport);

impl Display for OffloadDone<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let report = self.0;
        writeln!(f, "Error - {:.6}", report.max_error)?;
        writeln!(f, "Offload done, time - {:.6}", report.offload_time.as_secs_f64())?;
        writeln!(f, "Speedup - {:.6}", report.speedup())
    }
}

impl Display for BenchmarkReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", ReferenceDone(self.reference_time), self.offload_done())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("reference gemm ({backend}) failed")]
    Reference {
        backend: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("offload gemm ({backend}) failed")]
    Offload {
        backend: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub fn timed<T, F>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Runs the reference path, then the offload path, on freshly initialized inputs.
pub fn run_benchmark<R, O>(reference: &R, offload: &O, config: &BenchmarkConfig) -> Result<BenchmarkReport, BenchmarkError>
where
    R: Gemm,
    O: Gemm,
{
    let mut inputs = BenchmarkInputs::new(config);
    run_benchmark_with(reference, offload, &config.params, &mut inputs)
}

pub fn run_benchmark_with<R, O>(
    reference: &R,
    offload: &O,
    params: &GemmParams,
    inputs: &mut BenchmarkInputs,
) -> Result<BenchmarkReport, BenchmarkError>
where
    R: Gemm,
    O: Gemm,
{
    let reference_time = run_reference(reference, params, inputs)?;
    run_offload(offload, params, inputs, reference_time)
}

/// Times the reference path into `inputs.c_host`.
pub fn run_reference<R>(reference: &R, params: &GemmParams, inputs: &mut BenchmarkInputs) -> Result<Duration, BenchmarkError>
where
    R: Gemm,
{
    let BenchmarkInputs { a, b, c_host, .. } = inputs;
    debug!(backend = reference.name(), size = a.size(), "running reference gemm");
    let (result, reference_time) = timed(|| reference.gemm(params, a, b, c_host));
    result.map_err(|err| BenchmarkError::Reference {
        backend: reference.name().to_string(),
        source: Box::new(err),
    })?;
    debug!(?reference_time, "reference gemm finished");
    Ok(reference_time)
}

/// Times the offload path into `inputs.c_device` and compares it against the reference output,
/// which must already be in `inputs.c_host`.
pub fn run_offload<O>(
    offload: &O,
    params: &GemmParams,
    inputs: &mut BenchmarkInputs,
    reference_time: Duration,
) -> Result<BenchmarkReport, BenchmarkError>
where
    O: Gemm,
{
    let BenchmarkInputs { a, b, c_host, c_device } = inputs;
    debug!(backend = offload.name(), size = a.size(), "running offload gemm");
    let (result, offload_time) = timed(|| offload.gemm(params, a, b, c_device));
    result.map_err(|err| BenchmarkError::Offload {
        backend: offload.name().to_string(),
        source: Box::new(err),
    })?;

    let max_error = max_abs_diff(c_host, c_device);
    debug!(?reference_time, ?offload_time, max_error, "benchmark finished");
    Ok(BenchmarkReport {
        reference_time,
        offload_time,
        max_error,
    })
}
