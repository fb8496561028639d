pub mod backend;
pub mod buffer;
pub mod config;
pub mod error;
mod kernels;
pub mod source;
pub mod util;

pub use backend::OpenCLBackend;
pub use config::{OffloadConfig, OffloadConfigBuilder};
pub use error::{Error, Stage};
pub use kernels::KernelVariant;
pub use source::ProgramSource;
