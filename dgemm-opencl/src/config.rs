use crate::error::Error;
use crate::kernels::KernelVariant;
use crate::source::ProgramSource;
use derive_builder::Builder;

#[derive(Debug, Clone, Default, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct OffloadConfig {
    #[builder(default)]
    pub variant: KernelVariant,
    #[builder(default, setter(into))]
    pub source: ProgramSource,
    /// Substring of the platform name to prefer, e.g. `"intel"`. `None` takes the first platform
    /// that has a GPU.
    #[builder(default, setter(into, strip_option))]
    pub platform: Option<String>,
    /// Passed verbatim to the OpenCL compiler.
    #[builder(default, setter(into))]
    pub build_options: String,
}

impl OffloadConfig {
    pub fn builder() -> OffloadConfigBuilder {
        OffloadConfigBuilder::default()
    }
}

impl OffloadConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(platform)) = &self.platform {
            if platform.trim().is_empty() {
                return Err("platform hint must not be blank".to_string());
            }
        }
        Ok(())
    }
}

impl From<OffloadConfigBuilderError> for Error {
    fn from(value: OffloadConfigBuilderError) -> Self {
        Error::ValidationError(value.to_string())
    }
}
