//! Configuration parsing errors.

use buildmaster_core::CompileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("project {project}: {source}")]
    Project {
        project: String,
        #[source]
        source: CompileError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn project(project: &str, source: CompileError) -> Self {
        ConfigError::Project {
            project: project.to_string(),
            source,
        }
    }

    /// The compile error behind a project-level failure, if any.
    pub fn compile_error(&self) -> Option<&CompileError> {
        match self {
            ConfigError::Project { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
