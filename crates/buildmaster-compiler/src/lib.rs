//! Configuration resolution for the buildmaster CI master.
//!
//! Turns validated project configurations into schedulers and builders:
//! - [`PipelineBuilder`] assembles checkout, build, test and lint steps
//! - [`SchedulerFactory`] assembles the scheduling policies of a project
//! - [`ProjectRegistry`] resolves cross-project dependencies lazily, once
//!   per project, and detects cycles
//! - [`ProjectCompiler`] drives the above for each project

pub mod pipeline;
pub mod project;
pub mod registry;
pub mod schedulers;

pub use pipeline::{DEFAULT_INTERPRETER, PipelineBuilder};
pub use project::{MasterConfig, Project, ProjectCompiler};
pub use registry::{ProjectAssembler, ProjectRegistry, Resolution};
pub use schedulers::SchedulerFactory;
