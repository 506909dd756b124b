//! Error types for project compilation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("no valid worker name in {0:?}")]
    InvalidWorkerSet(Vec<String>),

    #[error("{0} not supported yet")]
    UnsupportedVcs(String),

    #[error("invalid {field} definition: {value:?}")]
    MalformedSchedulerConfig { field: &'static str, value: String },

    #[error("unknown project: {0}")]
    UnknownDependency(String),

    #[error("dependency loop detected: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    #[error("malformed repository locator {0:?}: expected <root>!<module>")]
    MalformedRepositoryLocator(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CompileError {
    pub(crate) fn scheduler(field: &'static str, value: impl Into<String>) -> Self {
        CompileError::MalformedSchedulerConfig {
            field,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
