//! Master configuration file parsing.

use std::collections::HashSet;

use buildmaster_core::{CredentialStore, ProjectConfig, WorkerDirectory};
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};

use crate::nodes::{get_first_string_arg, get_word_list, key};
use crate::project::parse_project;
use crate::{ConfigError, ConfigResult};

/// Settings of the CI master itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterSection {
    /// Workers known to the master.
    pub workers: Vec<String>,
    /// Default mail relay for project notifiers.
    pub mail_host: Option<String>,
    /// Project-local interpreter that `python` commands are rewritten to.
    pub interpreter: Option<String>,
}

impl WorkerDirectory for MasterSection {
    fn is_known(&self, name: &str) -> bool {
        self.workers.iter().any(|w| w == name)
    }
}

/// A parsed master configuration file.
#[derive(Debug, Clone)]
pub struct MasterFile {
    pub master: MasterSection,
    /// Projects in declaration order.
    pub projects: Vec<ProjectConfig>,
}

/// Parse a master configuration from KDL text.
///
/// The `master` node may appear anywhere in the document; it is read before
/// any project so that its defaults apply to all of them.
pub fn parse_master(kdl: &str, credentials: &dyn CredentialStore) -> ConfigResult<MasterFile> {
    let doc: KdlDocument = kdl.parse()?;

    let mut master = None;
    for node in doc.nodes() {
        if node.name().value() == "master" {
            if master.is_some() {
                return Err(ConfigError::Duplicate("master".to_string()));
            }
            master = Some(parse_master_section(node)?);
        }
    }
    let master = master.ok_or_else(|| ConfigError::MissingField("master".to_string()))?;

    let mut projects = Vec::new();
    let mut seen = HashSet::new();
    for node in doc.nodes() {
        match node.name().value() {
            "project" => {
                let project = parse_project(node, &master, credentials)?;
                if !seen.insert(project.name.clone()) {
                    return Err(ConfigError::Duplicate(format!("project '{}'", project.name)));
                }
                projects.push(project);
            }
            "master" => {}
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(MasterFile { master, projects })
}

fn parse_master_section(node: &KdlNode) -> ConfigResult<MasterSection> {
    let mut section = MasterSection::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match key(child).as_str() {
                "workers" | "worker" | "slaves" => {
                    section.workers.extend(get_word_list(child));
                }
                "mail-host" => {
                    section.mail_host = get_first_string_arg(child);
                }
                "interpreter" => {
                    section.interpreter = get_first_string_arg(child);
                }
                _ => {}
            }
        }
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildmaster_core::{
        CompileError, CronField, Credentials, NoCredentials, Vcs, VcsMode,
    };

    struct FixedCredentials;

    impl CredentialStore for FixedCredentials {
        fn credentials_for(&self, repository: &str) -> Option<Credentials> {
            repository
                .starts_with("https://svn.example.com")
                .then(|| Credentials::new("gael", "secret"))
        }
    }

    #[test]
    fn test_parse_full_project() {
        let kdl = r#"
            master {
                workers "linux" "mac"
                mail-host "smtp.example.com"
            }

            project "collective.buildbot" {
                vcs "git"
                vcs-mode "clobber"
                repository "git://example.com/collective.buildbot.git"
                branch "main"
                workers "linux mac"
                build-sequence "python bootstrap.py" "bin/buildout"
                test-sequence "bin/test -v"
                dependencies "collective.foo" "plone.app"
                default-scheduler 0
                periodic-scheduler 30
                cron-scheduler "0 3 * * 1"
                lint "pyflakes src"
                email-notification-sender "ci@example.com"
                email-notification-recipients "dev@example.com qa@example.com"
                timeout 600
                build_timeout 300
                always-use-latest "yes"
            }
        "#;

        let file = parse_master(kdl, &NoCredentials).unwrap();
        assert_eq!(file.master.workers, vec!["linux", "mac"]);
        assert_eq!(file.projects.len(), 1);

        let project = &file.projects[0];
        assert_eq!(project.name, "collective.buildbot");
        assert_eq!(project.vcs, Vcs::Git);
        assert_eq!(project.vcs_mode, VcsMode::Clobber);
        assert_eq!(project.branch, "main");
        assert_eq!(project.workers, vec!["linux", "mac"]);
        assert_eq!(project.build_sequence, vec!["python bootstrap.py", "bin/buildout"]);
        assert_eq!(project.test_sequence, vec!["bin/test -v"]);
        assert_eq!(project.dependencies, vec!["collective.foo", "plone.app"]);
        assert_eq!(project.schedule.fixed_window.unwrap().secs(), 600);
        assert_eq!(project.schedule.periodic.unwrap().minutes(), 30);
        assert_eq!(project.schedule.cron.unwrap().day_of_week, CronField::Value(1));
        assert_eq!(project.lint.as_deref(), Some("pyflakes src"));
        assert_eq!(project.email_sender, "ci@example.com");
        assert_eq!(
            project.email_recipients,
            vec!["dev@example.com", "qa@example.com"]
        );
        assert_eq!(project.mail_host, "smtp.example.com");
        assert_eq!(project.timeouts.global, 600);
        assert_eq!(project.timeouts.build, 300);
        assert_eq!(project.timeouts.test, 600);
        assert!(project.always_use_latest);
        assert!(project.credentials.is_none());
    }

    #[test]
    fn test_defaults_and_multiline_sequences() {
        let kdl = r#"
            master {
                worker "linux"
            }

            project "app" {
                repository "https://svn.example.com/app/trunk"
                workers "linux"
                build-sequence """
                    python bootstrap.py

                    bin/buildout
                    """
            }
        "#;

        let file = parse_master(kdl, &FixedCredentials).unwrap();
        let project = &file.projects[0];
        assert_eq!(project.vcs, Vcs::Svn);
        assert_eq!(project.build_sequence, vec!["python bootstrap.py", "bin/buildout"]);
        assert_eq!(project.test_sequence, vec!["bin/test"]);
        assert_eq!(project.mail_host, "localhost");
        assert!(!project.always_use_latest);
        assert_eq!(
            project.credentials,
            Some(Credentials::new("gael", "secret"))
        );
    }

    #[test]
    fn test_projects_keep_declaration_order() {
        let kdl = r#"
            project "b" {
                repository "https://svn.example.com/b"
            }
            master {
                worker "linux"
            }
            project "a" {
                repository "https://svn.example.com/a"
            }
        "#;

        let file = parse_master(kdl, &NoCredentials).unwrap();
        let names: Vec<&str> = file.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(file.master.is_known("linux"));
        assert!(!file.master.is_known("mac"));
    }

    #[test]
    fn test_unsupported_vcs() {
        let kdl = r#"
            master {
                worker "linux"
            }
            project "app" {
                vcs "darcs"
                repository "http://darcs.example.com/app"
            }
        "#;

        let err = parse_master(kdl, &NoCredentials).unwrap_err();
        assert_eq!(
            err.compile_error(),
            Some(&CompileError::UnsupportedVcs("darcs".to_string()))
        );
    }

    #[test]
    fn test_malformed_scheduler_options() {
        for option in [
            r#"default-scheduler "-5""#,
            r#"default-scheduler "soon""#,
            r#"periodic-scheduler 0"#,
            r#"cron-scheduler "0 3 *""#,
            r#"cron-scheduler "0 3 * * monday""#,
        ] {
            let kdl = format!(
                r#"
                master {{
                    worker "linux"
                }}
                project "app" {{
                    repository "https://svn.example.com/app"
                    {}
                }}
                "#,
                option
            );
            let err = parse_master(&kdl, &NoCredentials).unwrap_err();
            assert!(
                matches!(
                    err.compile_error(),
                    Some(CompileError::MalformedSchedulerConfig { .. })
                ),
                "{option}: {err}"
            );
        }
    }

    #[test]
    fn test_bad_timeout() {
        let kdl = r#"
            master {
                worker "linux"
            }
            project "app" {
                repository "https://svn.example.com/app"
                test-timeout "forever"
            }
        "#;
        assert!(matches!(
            parse_master(kdl, &NoCredentials),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_master_and_duplicates() {
        let kdl = r#"
            project "app" {
                repository "https://svn.example.com/app"
            }
        "#;
        assert!(matches!(
            parse_master(kdl, &NoCredentials),
            Err(ConfigError::MissingField(_))
        ));

        let kdl = r#"
            master {
                worker "linux"
            }
            project "app" {
                repository "https://svn.example.com/app"
            }
            project "app" {
                repository "https://svn.example.com/app2"
            }
        "#;
        assert!(matches!(
            parse_master(kdl, &NoCredentials),
            Err(ConfigError::Duplicate(_))
        ));
    }

    #[test]
    fn test_missing_repository() {
        let kdl = r#"
            master {
                worker "linux"
            }
            project "app" {
                vcs "git"
            }
        "#;
        assert!(matches!(
            parse_master(kdl, &NoCredentials),
            Err(ConfigError::MissingField(_))
        ));
    }
}
