use opencl3::error_codes::ClError;
use opencl3::types::cl_int;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Point of the offload sequence at which an OpenCL call failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Platform,
    Device,
    Context,
    Queue,
    Buffer,
    Program,
    Kernel,
    KernelArg,
    Enqueue,
    ReadBack,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Platform => "platform",
            Stage::Device => "device",
            Stage::Context => "context",
            Stage::Queue => "command queue",
            Stage::Buffer => "buffer",
            Stage::Program => "program",
            Stage::Kernel => "kernel",
            Stage::KernelArg => "kernel argument",
            Stage::Enqueue => "enqueue",
            Stage::ReadBack => "read back",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("OpenCL {stage} error {code} ({code_str}){}", .msg.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    ClError {
        stage: Stage,
        code: cl_int,
        code_str: String,
        msg: Option<String>,
    },
    #[error("failed to build program:\n{log}")]
    CreateProgramError { log: String },
    #[error("failed to load kernel source from {}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no OpenCL GPU device found")]
    NoDevicesFound,
    #[error("{0}")]
    ValidationError(String),
}

impl Error {
    pub fn from_cl_err<M>(err: ClError, stage: Stage, msg: M) -> Self
    where
        M: Into<String>,
    {
        Error::ClError {
            stage,
            code: err.0,
            code_str: err.to_string(),
            msg: Some(msg.into()),
        }
    }

    /// Stage of a failed OpenCL call, if this error came from one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::ClError { stage, .. } => Some(*stage),
            Error::CreateProgramError { .. } => Some(Stage::Program),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<cl_int> {
        match self {
            Error::ClError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use opencl3::error_codes::CL_OUT_OF_RESOURCES;

    #[test]
    fn test_cl_error_display() {
        let err = Error::from_cl_err(ClError(CL_OUT_OF_RESOURCES), Stage::Enqueue, "Failed to enqueue dgemm kernel");
        assert_eq!(err.stage(), Some(Stage::Enqueue));
        assert_eq!(err.code(), Some(CL_OUT_OF_RESOURCES));
        let text = err.to_string();
        assert!(text.starts_with("OpenCL enqueue error -5"), "{text}");
        assert!(text.ends_with(": Failed to enqueue dgemm kernel"), "{text}");
    }

    #[test]
    fn test_program_error_stage() {
        let err = Error::CreateProgramError { log: "syntax error".into() };
        assert_eq!(err.stage(), Some(Stage::Program));
        assert_eq!(err.code(), None);
    }
}
