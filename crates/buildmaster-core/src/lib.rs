//! Core domain types and traits for the buildmaster configuration compiler.
//!
//! This crate contains:
//! - Project configuration and its typed scheduling options
//! - Scheduler descriptors and the change filter used by dependency watches
//! - Pipeline, step and builder definitions
//! - Collaborator traits (credentials, workers, notifiers)

pub mod change;
pub mod credentials;
pub mod error;
pub mod id;
pub mod notify;
pub mod pipeline;
pub mod project;
pub mod schedule;
pub mod scheduler;
pub mod vcs;
pub mod worker;

pub use change::{Change, ChangeFilter};
pub use credentials::{CredentialStore, Credentials, NoCredentials};
pub use error::{CompileError, Result};
pub use id::BuilderName;
pub use notify::{
    MailNotifier, NotifierError, NotifierRequest, NotifierService, NotifyMode, SmtpNotifierService,
};
pub use pipeline::{Builder, Checkout, CheckoutSource, Pipeline, RetryPolicy, Step, StepKind};
pub use project::{ProjectConfig, ProjectConfigBuilder, ScheduleOptions, Timeouts};
pub use schedule::{CronField, CronSpec, FixedWindow, Period};
pub use scheduler::{SchedulerDescriptor, SchedulerKind};
pub use vcs::{Vcs, VcsMode};
pub use worker::WorkerDirectory;
