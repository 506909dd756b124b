//! Build pipeline assembly.

use buildmaster_core::pipeline::{Builder, Checkout, CheckoutSource, Pipeline, RetryPolicy, Step, StepKind};
use buildmaster_core::{BuilderName, CompileError, ProjectConfig, Result, Vcs};
use tracing::{debug, info};

/// Interpreter that commands starting with `python` are rewritten to,
/// relative to the builder's working copy.
pub const DEFAULT_INTERPRETER: &str = "../../bin/python";

/// Turns a project configuration into a pipeline and one builder per worker.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    interpreter: String,
    retry: RetryPolicy,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different project-local interpreter path.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Build one builder per configured worker, all sharing the same pipeline.
    pub fn builders(&self, config: &ProjectConfig) -> Result<Vec<Builder>> {
        let pipeline = self.pipeline(config)?;

        Ok(config
            .workers
            .iter()
            .map(|worker| {
                info!(project = %config.name, worker = %worker, "Adding worker to project");
                Builder {
                    name: BuilderName::new(&config.name, worker),
                    worker: worker.clone(),
                    build_dir: format!("{}_{}", config.name, worker),
                    pipeline: pipeline.clone(),
                }
            })
            .collect())
    }

    /// Checkout, then build, test and lint steps, in that order.
    pub fn pipeline(&self, config: &ProjectConfig) -> Result<Pipeline> {
        let mut steps = vec![self.checkout(config)?];

        steps.extend(
            config
                .build_sequence
                .iter()
                .filter_map(|cmd| self.rewrite_command(cmd))
                .map(|command| Step {
                    kind: StepKind::Shell { command },
                    timeout: config.timeouts.build,
                    halt_on_failure: true,
                }),
        );

        steps.extend(
            config
                .test_sequence
                .iter()
                .filter_map(|cmd| self.rewrite_command(cmd))
                .map(|command| Step {
                    kind: StepKind::Test { command },
                    timeout: config.timeouts.test,
                    halt_on_failure: false,
                }),
        );

        if let Some(lint) = &config.lint {
            steps.extend(lint.lines().filter(|line| !line.trim().is_empty()).map(|line| Step {
                kind: StepKind::Lint {
                    command: line.split_whitespace().map(str::to_string).collect(),
                },
                timeout: config.timeouts.global,
                halt_on_failure: false,
            }));
        }

        debug!(project = %config.name, steps = steps.len(), "Assembled pipeline");
        Ok(Pipeline { steps })
    }

    /// The checkout step for the project's VCS.
    pub fn checkout(&self, config: &ProjectConfig) -> Result<Step> {
        let url = config.repository.clone();
        let source = match config.vcs {
            Vcs::Svn => CheckoutSource::Svn {
                url,
                auth: config.credentials.clone(),
            },
            Vcs::Git => CheckoutSource::Git {
                url,
                branch: config.branch.clone(),
            },
            Vcs::Hg => CheckoutSource::Hg { url },
            Vcs::Bzr => CheckoutSource::Bzr { url },
            Vcs::Cvs => {
                let (root, module) = split_cvs_locator(&config.repository)?;
                CheckoutSource::Cvs {
                    root: root.to_string(),
                    module: module.to_string(),
                    branch: config.branch.clone(),
                }
            }
        };

        Ok(Step {
            kind: StepKind::Checkout(Checkout {
                source,
                mode: config.vcs_mode,
                retry: self.retry,
                always_use_latest: config.always_use_latest,
            }),
            timeout: config.timeouts.global,
            halt_on_failure: true,
        })
    }

    /// Tokenize a raw command, pointing a leading `python*` at the
    /// project-local interpreter. Blank commands yield `None`.
    pub fn rewrite_command(&self, raw: &str) -> Option<Vec<String>> {
        let mut tokens: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        let first = tokens.first_mut()?;
        if first.starts_with("python") {
            *first = self.interpreter.clone();
        }
        Some(tokens)
    }
}

/// Split a CVS locator of the form `<root>!<module>`.
fn split_cvs_locator(locator: &str) -> Result<(&str, &str)> {
    locator
        .split_once('!')
        .filter(|(root, module)| !root.is_empty() && !module.is_empty() && !module.contains('!'))
        .ok_or_else(|| CompileError::MalformedRepositoryLocator(locator.to_string()))
}
