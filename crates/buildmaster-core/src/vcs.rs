//! Version control kinds and checkout modes.

use serde::{Deserialize, Serialize};

use crate::CompileError;

/// Version control system a project is hosted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    Svn,
    Git,
    Hg,
    Bzr,
    Cvs,
}

impl std::fmt::Display for Vcs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vcs::Svn => write!(f, "svn"),
            Vcs::Git => write!(f, "git"),
            Vcs::Hg => write!(f, "hg"),
            Vcs::Bzr => write!(f, "bzr"),
            Vcs::Cvs => write!(f, "cvs"),
        }
    }
}

impl std::str::FromStr for Vcs {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svn" => Ok(Vcs::Svn),
            "git" => Ok(Vcs::Git),
            "hg" => Ok(Vcs::Hg),
            "bzr" => Ok(Vcs::Bzr),
            "cvs" => Ok(Vcs::Cvs),
            _ => Err(CompileError::UnsupportedVcs(s.trim().to_string())),
        }
    }
}

/// How a worker refreshes its checkout before a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsMode {
    /// Update the existing working copy in place.
    #[default]
    Update,
    /// Keep a pristine copy and duplicate it for each build.
    Copy,
    /// Delete the working copy and check out from scratch.
    Clobber,
    /// Export a clean tree without VCS metadata.
    Export,
}

impl std::fmt::Display for VcsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VcsMode::Update => write!(f, "update"),
            VcsMode::Copy => write!(f, "copy"),
            VcsMode::Clobber => write!(f, "clobber"),
            VcsMode::Export => write!(f, "export"),
        }
    }
}

impl std::str::FromStr for VcsMode {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "update" => Ok(VcsMode::Update),
            "copy" => Ok(VcsMode::Copy),
            "clobber" => Ok(VcsMode::Clobber),
            "export" => Ok(VcsMode::Export),
            _ => Err(CompileError::InvalidConfig(format!(
                "unknown vcs mode: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_vcs() {
        assert_eq!("svn".parse::<Vcs>().unwrap(), Vcs::Svn);
        assert_eq!(" Git ".parse::<Vcs>().unwrap(), Vcs::Git);
        assert_eq!("cvs".parse::<Vcs>().unwrap(), Vcs::Cvs);
    }

    #[test]
    fn test_unknown_vcs_is_unsupported() {
        let err = "darcs".parse::<Vcs>().unwrap_err();
        assert_eq!(err, CompileError::UnsupportedVcs("darcs".to_string()));
        assert_eq!(err.to_string(), "darcs not supported yet");
    }

    #[test]
    fn test_vcs_mode() {
        assert_eq!("clobber".parse::<VcsMode>().unwrap(), VcsMode::Clobber);
        assert_eq!(VcsMode::default(), VcsMode::Update);
        assert!(matches!(
            "rebase".parse::<VcsMode>(),
            Err(CompileError::InvalidConfig(_))
        ));
    }
}
