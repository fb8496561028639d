mod gemm;

pub(crate) use gemm::*;
use crate::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Device entry point used for the offloaded gemm.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KernelVariant {
    /// One work-item per output cell reading straight from global memory.
    #[default]
    Baseline,
    /// Work-groups stage `BSIZE x BSIZE` tiles of A and B in local memory.
    Tiled,
}

impl KernelVariant {
    pub const ALL: [KernelVariant; 2] = [KernelVariant::Baseline, KernelVariant::Tiled];

    pub const fn entry_point(&self) -> &'static str {
        match self {
            KernelVariant::Baseline => "dgemm",
            KernelVariant::Tiled => "gemm_OpenCL_local",
        }
    }
}

impl Display for KernelVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelVariant::Baseline => f.write_str("baseline"),
            KernelVariant::Tiled => f.write_str("tiled"),
        }
    }
}

impl FromStr for KernelVariant {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" => Ok(KernelVariant::Baseline),
            "tiled" => Ok(KernelVariant::Tiled),
            _ => Err(Error::ValidationError(format!("Invalid kernel variant: {s}"))),
        }
    }
}
