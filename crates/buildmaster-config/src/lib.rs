//! KDL configuration parsing for the buildmaster configuration compiler.
//!
//! This crate handles parsing of:
//! - The master section (known workers, mail relay, interpreter)
//! - Project definitions (buildmaster.kdl)
//! - Repository credentials (`.httpauth`)

pub mod error;
pub mod httpauth;
pub mod master;
mod nodes;
pub mod project;

pub use error::{ConfigError, ConfigResult};
pub use httpauth::HttpAuthFile;
pub use master::{MasterFile, MasterSection, parse_master};
pub use project::parse_project;
