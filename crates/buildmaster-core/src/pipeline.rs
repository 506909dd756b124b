//! Pipeline, step and builder definitions.

use serde::{Deserialize, Serialize};

use crate::{BuilderName, Credentials, VcsMode};

/// An ordered build pipeline: checkout, build, test and lint steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn checkout(&self) -> Option<&Checkout> {
        self.steps.iter().find_map(|step| match &step.kind {
            StepKind::Checkout(checkout) => Some(checkout),
            _ => None,
        })
    }
}

/// A step in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    /// Maximum execution time in seconds.
    pub timeout: u64,
    /// Whether a failure stops the remaining steps.
    pub halt_on_failure: bool,
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Refresh the working copy.
    Checkout(Checkout),
    /// Run a build command.
    Shell { command: Vec<String> },
    /// Run a test command; failures are reported.
    Test { command: Vec<String> },
    /// Run a lint command.
    Lint { command: Vec<String> },
}

impl StepKind {
    /// The command line of a shell, test or lint step.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            StepKind::Checkout(_) => None,
            StepKind::Shell { command } | StepKind::Test { command } | StepKind::Lint { command } => {
                Some(command)
            }
        }
    }
}

/// A VCS checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub source: CheckoutSource,
    pub mode: VcsMode,
    pub retry: RetryPolicy,
    /// Always check out the newest revision instead of the one that
    /// triggered the build.
    pub always_use_latest: bool,
}

/// Where a checkout comes from, per VCS kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "vcs", rename_all = "lowercase")]
pub enum CheckoutSource {
    Svn {
        url: String,
        auth: Option<Credentials>,
    },
    Git {
        url: String,
        branch: String,
    },
    Hg {
        url: String,
    },
    Bzr {
        url: String,
    },
    Cvs {
        root: String,
        module: String,
        branch: String,
    },
}

/// Retry policy for checkouts: number of attempts and seconds between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub spacing_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            spacing_secs: 3,
        }
    }
}

/// One worker running one project's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Builder {
    pub name: BuilderName,
    pub worker: String,
    /// Directory on the worker, `<project>_<worker>`.
    pub build_dir: String,
    pub pipeline: Pipeline,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svn_checkout() -> Step {
        Step {
            kind: StepKind::Checkout(Checkout {
                source: CheckoutSource::Svn {
                    url: "https://svn.example.com/app".to_string(),
                    auth: Some(Credentials::new("gael", "s3cret")),
                },
                mode: VcsMode::Update,
                retry: RetryPolicy::default(),
                always_use_latest: false,
            }),
            timeout: 3600,
            halt_on_failure: true,
        }
    }

    #[test]
    fn test_svn_checkout_serializes_credentials() {
        let step = svn_checkout();
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["kind"]["type"], "checkout");
        assert_eq!(json["kind"]["source"]["vcs"], "svn");
        assert_eq!(json["kind"]["source"]["auth"]["username"], "gael");
        assert_eq!(json["kind"]["source"]["auth"]["password"], "s3cret");

        let back: Step = serde_json::from_value(json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_pipeline_finds_checkout() {
        let pipeline = Pipeline {
            steps: vec![
                Step {
                    kind: StepKind::Shell {
                        command: vec!["make".to_string()],
                    },
                    timeout: 60,
                    halt_on_failure: true,
                },
                svn_checkout(),
            ],
        };
        let checkout = pipeline.checkout().unwrap();
        assert_eq!(checkout.retry.attempts, 10);
        assert!(pipeline.steps[1].kind.command().is_none());
        assert_eq!(pipeline.steps[0].kind.command().unwrap(), ["make"]);
    }
}
