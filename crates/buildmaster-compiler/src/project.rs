//! Per-project compilation: workers, schedulers, builders, notifier.

use std::sync::Arc;

use buildmaster_core::notify::{MailNotifier, NotifierRequest, NotifierService, SmtpNotifierService};
use buildmaster_core::pipeline::Builder;
use buildmaster_core::{
    BuilderName, CompileError, ProjectConfig, Result, SchedulerDescriptor, WorkerDirectory,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::pipeline::PipelineBuilder;
use crate::registry::{ProjectAssembler, ProjectRegistry};
use crate::schedulers::SchedulerFactory;

/// A fully assembled project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,
    pub schedulers: Vec<SchedulerDescriptor>,
    pub builders: Vec<Builder>,
    pub notifier: Option<MailNotifier>,
}

impl Project {
    pub fn builder_names(&self) -> Vec<BuilderName> {
        self.builders.iter().map(|b| b.name.clone()).collect()
    }
}

/// Everything a compilation pass installs on the master.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterConfig {
    pub schedulers: Vec<SchedulerDescriptor>,
    pub builders: Vec<Builder>,
    pub notifiers: Vec<MailNotifier>,
}

impl MasterConfig {
    /// Append a project's schedulers, builders and notifier.
    pub fn install(&mut self, project: &Project) {
        self.schedulers.extend(project.schedulers.iter().cloned());
        self.builders.extend(project.builders.iter().cloned());
        self.notifiers.extend(project.notifier.iter().cloned());
    }
}

/// Names of the builders of a project, one per configured worker.
pub fn builder_names(config: &ProjectConfig) -> Vec<BuilderName> {
    config
        .workers
        .iter()
        .map(|worker| BuilderName::new(&config.name, worker))
        .collect()
}

/// Compiles project configurations against the master's workers.
pub struct ProjectCompiler {
    workers: Arc<dyn WorkerDirectory>,
    notifiers: Arc<dyn NotifierService>,
    pipelines: PipelineBuilder,
}

impl std::fmt::Debug for ProjectCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCompiler")
            .field("pipelines", &self.pipelines)
            .finish_non_exhaustive()
    }
}

impl ProjectCompiler {
    pub fn new(workers: Arc<dyn WorkerDirectory>) -> Self {
        Self {
            workers,
            notifiers: Arc::new(SmtpNotifierService),
            pipelines: PipelineBuilder::default(),
        }
    }

    pub fn with_notifier_service(mut self, notifiers: Arc<dyn NotifierService>) -> Self {
        self.notifiers = notifiers;
        self
    }

    pub fn with_pipeline_builder(mut self, pipelines: PipelineBuilder) -> Self {
        self.pipelines = pipelines;
        self
    }

    /// Compile one project, registering it first if needed.
    ///
    /// Projects it depends on must already be registered. A project already
    /// registered under the same name must have the same configuration.
    pub fn compile(
        &self,
        config: &ProjectConfig,
        registry: &mut ProjectRegistry,
    ) -> Result<Arc<Project>> {
        match registry.config(&config.name) {
            Some(registered) if registered != config => {
                return Err(CompileError::InvalidConfig(format!(
                    "project {} is already registered with a different configuration",
                    config.name
                )));
            }
            Some(_) => {}
            None => registry.register(config.clone())?,
        }
        registry.resolve(&config.name, self)
    }

    /// Compile every registered project in declaration order.
    ///
    /// The output lists projects in the order they finished resolving, so a
    /// dependent project's parent comes first. Fails on the first project
    /// that fails.
    pub fn compile_all(&self, registry: &mut ProjectRegistry) -> Result<MasterConfig> {
        let names = registry.names().to_vec();
        for name in &names {
            registry.resolve(name, self)?;
        }

        let mut master = MasterConfig::default();
        for project in registry.resolved() {
            master.install(project);
        }
        info!(
            projects = names.len(),
            schedulers = master.schedulers.len(),
            builders = master.builders.len(),
            "Compiled master configuration"
        );
        Ok(master)
    }

    fn check_workers(&self, config: &ProjectConfig) -> Result<()> {
        let unknown: Vec<&str> = config
            .workers
            .iter()
            .filter(|w| !self.workers.is_known(w))
            .map(String::as_str)
            .collect();

        if unknown.len() == config.workers.len() {
            return Err(CompileError::InvalidWorkerSet(config.workers.clone()));
        }
        if !unknown.is_empty() {
            warn!(project = %config.name, workers = ?unknown, "Project names unknown workers");
        }
        Ok(())
    }

    fn notifier(&self, config: &ProjectConfig, builders: &[Builder]) -> Option<MailNotifier> {
        if !config.wants_notifications() {
            info!(
                project = %config.name,
                from = %config.email_sender,
                to = ?config.email_recipients,
                "Skipping mail notifier"
            );
            return None;
        }

        let request = NotifierRequest {
            builder_names: builders.iter().map(|b| b.name.clone()).collect(),
            from: config.email_sender.clone(),
            recipients: config.email_recipients.clone(),
            relay_host: config.mail_host.clone(),
        };
        match self.notifiers.mail_notifier(request) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                warn!(
                    project = %config.name,
                    from = %config.email_sender,
                    to = ?config.email_recipients,
                    error = %e,
                    "Error adding mail notifier"
                );
                None
            }
        }
    }

    fn try_assemble(&self, config: &ProjectConfig, registry: &mut ProjectRegistry) -> Result<Project> {
        self.check_workers(config)?;
        let schedulers = SchedulerFactory::new(config).build(|parent| registry.resolve(parent, self))?;
        let builders = self.pipelines.builders(config)?;
        let notifier = self.notifier(config, &builders);

        Ok(Project {
            name: config.name.clone(),
            schedulers,
            builders,
            notifier,
        })
    }
}

impl ProjectAssembler for ProjectCompiler {
    fn assemble(&self, config: &ProjectConfig, registry: &mut ProjectRegistry) -> Result<Project> {
        info!(project = %config.name, "Trying to add project");
        match self.try_assemble(config, registry) {
            Ok(project) => {
                info!(project = %config.name, "Project added");
                Ok(project)
            }
            Err(e) => {
                error!(project = %config.name, error = %e, "Error while adding project");
                Err(e)
            }
        }
    }
}
