//! Scheduler descriptors produced for the CI master.

use serde::{Deserialize, Serialize};

use crate::{BuilderName, ChangeFilter, CronField};

/// A named trigger bound to a set of builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerDescriptor {
    /// Unique scheduler name; dependent schedulers refer to their upstream by it.
    pub name: String,
    /// Builders started when the scheduler fires.
    pub builder_names: Vec<BuilderName>,
    pub kind: SchedulerKind,
}

/// When a scheduler fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerKind {
    /// Fed by an SVN poller watching `repository`.
    SvnPoll { repository: String },
    /// Fed by a generic repository poller (git, hg).
    RepositoryChange { repository: String },
    /// Fires once the tree has been stable for `tree_stable_timer` seconds.
    FixedWindow { tree_stable_timer: u64 },
    /// Fires every `period_secs` seconds.
    Periodic { period_secs: u64 },
    /// Cron-style schedule.
    Cron {
        minute: CronField,
        hour: CronField,
        day_of_month: CronField,
        month: CronField,
        day_of_week: CronField,
    },
    /// Fires after the `upstream` scheduler's builds complete.
    Dependent { upstream: String },
    /// Fires when a change matching `filter` has been stable for
    /// `tree_stable_timer` seconds.
    DependencyWatch {
        filter: ChangeFilter,
        tree_stable_timer: u64,
    },
}

impl SchedulerDescriptor {
    pub fn new(name: impl Into<String>, builder_names: Vec<BuilderName>, kind: SchedulerKind) -> Self {
        Self {
            name: name.into(),
            builder_names,
            kind,
        }
    }
}
