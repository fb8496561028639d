use crate::error::Error;
use crate::util::Result;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// File name the kernel source is loaded from, relative to the working directory.
pub const DEFAULT_SOURCE_FILE: &str = "dgemm-kernelLocal.cl";

static BUILTIN_SOURCE: &str = include_str!("../../dgemm-kernelLocal.cl");

/// Where the device program text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    /// Read in full at build time; a missing file is reported as [`Error::SourceNotFound`].
    File(PathBuf),
    Inline(Cow<'static, str>),
}

impl ProgramSource {
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        ProgramSource::File(path.into())
    }

    pub fn inline<S: Into<Cow<'static, str>>>(text: S) -> Self {
        ProgramSource::Inline(text.into())
    }

    /// The kernels shipped with this crate.
    pub fn builtin() -> Self {
        ProgramSource::Inline(Cow::Borrowed(BUILTIN_SOURCE))
    }

    pub fn load(&self) -> Result<Cow<'_, str>> {
        match self {
            ProgramSource::File(path) => read_source(path).map(Cow::Owned),
            ProgramSource::Inline(text) => Ok(Cow::Borrowed(text.as_ref())),
        }
    }
}

impl Default for ProgramSource {
    fn default() -> Self {
        ProgramSource::File(PathBuf::from(DEFAULT_SOURCE_FILE))
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let source = ProgramSource::file("does/not/exist/dgemm-kernelLocal.cl");
        match source.load() {
            Err(Error::SourceNotFound { path, source }) => {
                assert_eq!(path, PathBuf::from("does/not/exist/dgemm-kernelLocal.cl"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"__kernel void dgemm() {}").unwrap();
        let source = ProgramSource::file(file.path());
        assert_eq!(source.load().unwrap(), "__kernel void dgemm() {}");
    }

    #[test]
    fn test_default_and_builtin() {
        assert_eq!(ProgramSource::default(), ProgramSource::file(DEFAULT_SOURCE_FILE));
        let builtin = ProgramSource::builtin();
        let text = builtin.load().unwrap();
        assert!(text.contains("__kernel void dgemm("));
        assert!(text.contains("__kernel void gemm_OpenCL_local("));
        // dimension 0 walks along a row of C
        assert_eq!(text.matches("const int col = get_global_id(0);").count(), 2);
        assert_eq!(text.matches("const int row = get_global_id(1);").count(), 2);
    }
}
