//! Per-project build configuration.

use serde::Serialize;

use crate::{CompileError, CronSpec, Credentials, FixedWindow, Period, Result, Vcs, VcsMode};

/// Test command used when a project configures none.
pub const DEFAULT_TEST_COMMAND: &str = "bin/test";

/// Default global step timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Default SMTP relay for notifications.
pub const DEFAULT_MAIL_HOST: &str = "localhost";

/// A fully validated project definition.
///
/// Built through [`ProjectConfigBuilder`], which applies defaults and
/// checks invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    pub vcs: Vcs,
    pub vcs_mode: VcsMode,
    pub repository: String,
    pub branch: String,
    pub credentials: Option<Credentials>,
    pub always_use_latest: bool,
    /// Worker names, in configuration order.
    pub workers: Vec<String>,
    pub build_sequence: Vec<String>,
    /// Never empty; defaults to [`DEFAULT_TEST_COMMAND`].
    pub test_sequence: Vec<String>,
    /// Path fragments whose changes trigger a rebuild.
    pub dependencies: Vec<String>,
    pub schedule: ScheduleOptions,
    /// Lint commands, one per line.
    pub lint: Option<String>,
    pub email_sender: String,
    pub email_recipients: Vec<String>,
    pub mail_host: String,
    pub timeouts: Timeouts,
}

/// Optional scheduling policies, each independently present or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleOptions {
    pub fixed_window: Option<FixedWindow>,
    pub periodic: Option<Period>,
    pub cron: Option<CronSpec>,
    /// Name of the project whose schedulers this project chains onto.
    pub dependent: Option<String>,
}

/// Step timeouts, in seconds. All strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeouts {
    pub global: u64,
    pub build: u64,
    pub test: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            global: DEFAULT_TIMEOUT_SECS,
            build: DEFAULT_TIMEOUT_SECS,
            test: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProjectConfig {
    pub fn builder(name: impl Into<String>) -> ProjectConfigBuilder {
        ProjectConfigBuilder::new(name)
    }

    /// Whether both a sender and at least one recipient are configured.
    pub fn wants_notifications(&self) -> bool {
        !self.email_sender.is_empty() && !self.email_recipients.is_empty()
    }
}

/// Builder for [`ProjectConfig`].
#[derive(Debug, Clone)]
pub struct ProjectConfigBuilder {
    name: String,
    vcs: Vcs,
    vcs_mode: VcsMode,
    repository: String,
    branch: String,
    credentials: Option<Credentials>,
    always_use_latest: bool,
    workers: Vec<String>,
    build_sequence: Vec<String>,
    test_sequence: Vec<String>,
    dependencies: Vec<String>,
    schedule: ScheduleOptions,
    lint: Option<String>,
    email_sender: String,
    email_recipients: Vec<String>,
    mail_host: String,
    timeout: Option<i64>,
    build_timeout: Option<i64>,
    test_timeout: Option<i64>,
}

impl ProjectConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vcs: Vcs::Svn,
            vcs_mode: VcsMode::default(),
            repository: String::new(),
            branch: String::new(),
            credentials: None,
            always_use_latest: false,
            workers: Vec::new(),
            build_sequence: Vec::new(),
            test_sequence: Vec::new(),
            dependencies: Vec::new(),
            schedule: ScheduleOptions::default(),
            lint: None,
            email_sender: String::new(),
            email_recipients: Vec::new(),
            mail_host: DEFAULT_MAIL_HOST.to_string(),
            timeout: None,
            build_timeout: None,
            test_timeout: None,
        }
    }

    pub fn with_vcs(mut self, vcs: Vcs) -> Self {
        self.vcs = vcs;
        self
    }

    pub fn with_vcs_mode(mut self, mode: VcsMode) -> Self {
        self.vcs_mode = mode;
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_always_use_latest(mut self, always: bool) -> Self {
        self.always_use_latest = always;
        self
    }

    pub fn with_worker(mut self, worker: impl Into<String>) -> Self {
        self.workers.push(worker.into());
        self
    }

    pub fn with_workers<I, S>(mut self, workers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workers.extend(workers.into_iter().map(Into::into));
        self
    }

    pub fn with_build_command(mut self, command: impl Into<String>) -> Self {
        self.build_sequence.push(command.into());
        self
    }

    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_sequence.push(command.into());
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn with_fixed_window(mut self, window: FixedWindow) -> Self {
        self.schedule.fixed_window = Some(window);
        self
    }

    pub fn with_periodic(mut self, period: Period) -> Self {
        self.schedule.periodic = Some(period);
        self
    }

    pub fn with_cron(mut self, cron: CronSpec) -> Self {
        self.schedule.cron = Some(cron);
        self
    }

    pub fn with_dependent(mut self, parent: impl Into<String>) -> Self {
        self.schedule.dependent = Some(parent.into());
        self
    }

    pub fn with_lint(mut self, lint: impl Into<String>) -> Self {
        self.lint = Some(lint.into());
        self
    }

    pub fn with_email_sender(mut self, sender: impl Into<String>) -> Self {
        self.email_sender = sender.into().trim().to_string();
        self
    }

    pub fn with_email_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.email_recipients.push(recipient.into());
        self
    }

    pub fn with_mail_host(mut self, host: impl Into<String>) -> Self {
        self.mail_host = host.into();
        self
    }

    pub fn with_timeout(mut self, secs: i64) -> Self {
        self.timeout = Some(secs);
        self
    }

    pub fn with_build_timeout(mut self, secs: i64) -> Self {
        self.build_timeout = Some(secs);
        self
    }

    pub fn with_test_timeout(mut self, secs: i64) -> Self {
        self.test_timeout = Some(secs);
        self
    }

    /// Apply defaults and validate.
    pub fn build(self) -> Result<ProjectConfig> {
        if self.name.trim().is_empty() {
            return Err(CompileError::InvalidConfig(
                "project name must not be empty".to_string(),
            ));
        }

        let global = positive("timeout", self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS as i64))?;
        let timeouts = Timeouts {
            global,
            build: match self.build_timeout {
                Some(secs) => positive("build timeout", secs)?,
                None => global,
            },
            test: match self.test_timeout {
                Some(secs) => positive("test timeout", secs)?,
                None => global,
            },
        };

        let mut test_sequence = self.test_sequence;
        if test_sequence.is_empty() {
            test_sequence.push(DEFAULT_TEST_COMMAND.to_string());
        }

        Ok(ProjectConfig {
            name: self.name,
            vcs: self.vcs,
            vcs_mode: self.vcs_mode,
            repository: self.repository,
            branch: self.branch,
            credentials: self.credentials,
            always_use_latest: self.always_use_latest,
            workers: self.workers,
            build_sequence: self.build_sequence,
            test_sequence,
            dependencies: self.dependencies,
            schedule: self.schedule,
            lint: self.lint,
            email_sender: self.email_sender,
            email_recipients: self.email_recipients,
            mail_host: self.mail_host,
            timeouts,
        })
    }
}

fn positive(field: &str, secs: i64) -> Result<u64> {
    if secs < 1 {
        return Err(CompileError::InvalidConfig(format!(
            "{} must be a positive number of seconds, got {}",
            field, secs
        )));
    }
    Ok(secs as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::builder("app").build().unwrap();
        assert_eq!(config.vcs, Vcs::Svn);
        assert_eq!(config.vcs_mode, VcsMode::Update);
        assert_eq!(config.test_sequence, vec![DEFAULT_TEST_COMMAND]);
        assert_eq!(config.mail_host, "localhost");
        assert_eq!(config.timeouts, Timeouts::default());
        assert!(!config.wants_notifications());
    }

    #[test]
    fn test_build_and_test_timeouts_follow_global() {
        let config = ProjectConfig::builder("app")
            .with_timeout(120)
            .with_test_timeout(30)
            .build()
            .unwrap();
        assert_eq!(config.timeouts.global, 120);
        assert_eq!(config.timeouts.build, 120);
        assert_eq!(config.timeouts.test, 30);
    }

    #[test]
    fn test_non_positive_timeout_rejected() {
        let err = ProjectConfig::builder("app")
            .with_build_timeout(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_global_timeout_rejected() {
        let err = ProjectConfig::builder("app").with_timeout(0).build().unwrap_err();
        assert!(matches!(err, CompileError::InvalidConfig(_)));
    }

    #[test]
    fn test_explicit_test_sequence_kept() {
        let config = ProjectConfig::builder("app")
            .with_test_command("bin/test -m app")
            .build()
            .unwrap();
        assert_eq!(config.test_sequence, vec!["bin/test -m app"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(ProjectConfig::builder("  ").build().is_err());
    }
}
