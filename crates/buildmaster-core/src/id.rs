//! Builder identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The name of a builder: one project paired with one worker.
///
/// Formatted as `"<project> <worker>"`; schedulers and notifiers refer to
/// builders by this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct BuilderName(String);

impl BuilderName {
    /// Name the builder running `project` on `worker`.
    pub fn new(project: &str, worker: &str) -> Self {
        Self(format!("{} {}", project, worker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BuilderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<BuilderName> for String {
    fn from(name: BuilderName) -> Self {
        name.0
    }
}
