//! Scheduler assembly.

use std::sync::Arc;

use buildmaster_core::{
    BuilderName, ChangeFilter, ProjectConfig, Result, SchedulerDescriptor, SchedulerKind, Vcs,
};
use tracing::{error, info};

use crate::project::Project;

/// Stabilization window for dependency-watch schedulers, in seconds.
pub const DEPENDENCY_STABLE_TIMER: u64 = 60;

/// Builds the schedulers of one project.
///
/// Blocks are evaluated in a fixed order: VCS trigger, default (fixed
/// window), periodic, cron, dependent and dependency watch. Every
/// scheduler is bound to all of the project's builders.
#[derive(Debug)]
pub struct SchedulerFactory<'a> {
    config: &'a ProjectConfig,
    builder_names: Vec<BuilderName>,
}

impl<'a> SchedulerFactory<'a> {
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self {
            config,
            builder_names: crate::project::builder_names(config),
        }
    }

    /// Assemble the schedulers. `resolve_parent` resolves the project named
    /// by the dependent-scheduler option; any error aborts the whole set.
    pub fn build<F>(&self, mut resolve_parent: F) -> Result<Vec<SchedulerDescriptor>>
    where
        F: FnMut(&str) -> Result<Arc<Project>>,
    {
        let name = &self.config.name;
        let schedule = &self.config.schedule;
        let mut schedulers = Vec::new();

        if let Some(kind) = self.vcs_trigger() {
            schedulers.push(self.descriptor(format!("Scheduler for {}", name), kind));
        }

        if let Some(window) = schedule.fixed_window {
            schedulers.push(self.descriptor(
                format!("Default scheduler for {}", name),
                SchedulerKind::FixedWindow {
                    tree_stable_timer: window.secs(),
                },
            ));
        }

        if let Some(period) = schedule.periodic {
            schedulers.push(self.descriptor(
                format!("Periodic scheduler for {}", name),
                SchedulerKind::Periodic {
                    period_secs: period.secs(),
                },
            ));
        }

        if let Some(cron) = schedule.cron {
            schedulers.push(self.descriptor(
                format!("Cron scheduler for {} at {}", name, cron),
                SchedulerKind::Cron {
                    minute: cron.minute,
                    hour: cron.hour,
                    day_of_month: cron.day_of_month,
                    month: cron.month,
                    day_of_week: cron.day_of_week,
                },
            ));
        }

        if let Some(parent) = &schedule.dependent {
            let upstream = resolve_parent(parent).inspect_err(|e| {
                error!(project = %name, parent = %parent, error = %e, "Invalid project selected as dependency");
            })?;
            for parent_scheduler in &upstream.schedulers {
                schedulers.push(self.descriptor(
                    format!(
                        "Dependent scheduler between scheduler <{}> and project {}",
                        parent_scheduler.name, name
                    ),
                    SchedulerKind::Dependent {
                        upstream: parent_scheduler.name.clone(),
                    },
                ));
            }
        }

        let dependencies = &self.config.dependencies;
        if !dependencies.is_empty() {
            let watched: Vec<String> = dependencies.iter().map(|d| format!("'{}'", d)).collect();
            schedulers.push(self.descriptor(
                format!(
                    "Dependency scheduler watching {} for {}",
                    watched.join(", "),
                    name
                ),
                SchedulerKind::DependencyWatch {
                    filter: ChangeFilter::new(dependencies.iter().cloned()),
                    tree_stable_timer: DEPENDENCY_STABLE_TIMER,
                },
            ));
        }

        let names: Vec<&str> = schedulers.iter().map(|s| s.name.as_str()).collect();
        info!(project = %name, schedulers = ?names, "Adding schedulers");

        Ok(schedulers)
    }

    fn vcs_trigger(&self) -> Option<SchedulerKind> {
        let repository = self.config.repository.clone();
        match self.config.vcs {
            Vcs::Svn => Some(SchedulerKind::SvnPoll { repository }),
            Vcs::Git | Vcs::Hg => Some(SchedulerKind::RepositoryChange { repository }),
            Vcs::Bzr | Vcs::Cvs => None,
        }
    }

    fn descriptor(&self, name: String, kind: SchedulerKind) -> SchedulerDescriptor {
        SchedulerDescriptor::new(name, self.builder_names.clone(), kind)
    }
}
