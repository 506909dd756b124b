//! Project definition parsing.

use buildmaster_core::{
    CompileError, CredentialStore, CronSpec, FixedWindow, Period, ProjectConfig, Vcs, VcsMode,
};

use crate::master::MasterSection;
use crate::nodes::{
    get_first_scalar_arg, get_first_string_arg, get_flag_arg, get_line_list, get_word_list, key,
};
use crate::{ConfigError, ConfigResult};
use kdl::KdlNode;

/// Parse one `project "<name>" { ... }` node.
///
/// `master` supplies defaults shared by all projects (mail relay), and
/// `credentials` is queried once with the project's repository URL.
pub fn parse_project(
    node: &KdlNode,
    master: &MasterSection,
    credentials: &dyn CredentialStore,
) -> ConfigResult<ProjectConfig> {
    let name = get_first_string_arg(node)
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField("project name".to_string()))?;
    let fail = |e: CompileError| ConfigError::project(&name, e);

    let mut builder = ProjectConfig::builder(&name);
    if let Some(host) = &master.mail_host {
        builder = builder.with_mail_host(host);
    }

    let mut repository = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match key(child).as_str() {
                "vcs" => {
                    let raw = required_scalar(child, &name)?;
                    builder = builder.with_vcs(raw.parse::<Vcs>().map_err(fail)?);
                }
                "vcs-mode" => {
                    let raw = required_scalar(child, &name)?;
                    builder = builder.with_vcs_mode(raw.parse::<VcsMode>().map_err(fail)?);
                }
                "repository" => {
                    let url = required_scalar(child, &name)?.trim().to_string();
                    builder = builder.with_repository(&url);
                    repository = Some(url);
                }
                "branch" => {
                    builder = builder.with_branch(required_scalar(child, &name)?.trim());
                }
                "workers" | "worker" | "slave-names" => {
                    builder = builder.with_workers(get_word_list(child));
                }
                "build-sequence" => {
                    for cmd in get_line_list(child) {
                        builder = builder.with_build_command(cmd);
                    }
                }
                "test-sequence" => {
                    for cmd in get_line_list(child) {
                        builder = builder.with_test_command(cmd);
                    }
                }
                "dependencies" => {
                    for dep in get_line_list(child) {
                        builder = builder.with_dependency(dep);
                    }
                }
                "default-scheduler" => {
                    let raw = required_scalar(child, &name)?;
                    builder = builder.with_fixed_window(FixedWindow::parse(&raw).map_err(fail)?);
                }
                "periodic-scheduler" => {
                    let raw = required_scalar(child, &name)?;
                    builder = builder.with_periodic(Period::parse(&raw).map_err(fail)?);
                }
                "cron-scheduler" => {
                    let raw = required_scalar(child, &name)?;
                    builder = builder.with_cron(raw.parse::<CronSpec>().map_err(fail)?);
                }
                "dependent-scheduler" => {
                    builder = builder.with_dependent(required_scalar(child, &name)?.trim());
                }
                "lint" | "pyflakes" => {
                    builder = builder.with_lint(get_line_list(child).join("\n"));
                }
                "email-notification-sender" => {
                    builder = builder.with_email_sender(required_scalar(child, &name)?);
                }
                "email-notification-recipients" => {
                    for recipient in get_word_list(child) {
                        builder = builder.with_email_recipient(recipient);
                    }
                }
                "mail-host" => {
                    builder = builder.with_mail_host(required_scalar(child, &name)?.trim());
                }
                "timeout" => {
                    builder = builder.with_timeout(seconds(child, &name)?);
                }
                "build-timeout" => {
                    builder = builder.with_build_timeout(seconds(child, &name)?);
                }
                "test-timeout" => {
                    builder = builder.with_test_timeout(seconds(child, &name)?);
                }
                "always-use-latest" => {
                    builder = builder.with_always_use_latest(get_flag_arg(child));
                }
                _ => {} // Ignore unknown nodes
            }
        }
    }

    let repository = repository
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ConfigError::MissingField(format!("repository for project '{}'", name)))?;
    builder = builder.with_credentials(credentials.credentials_for(&repository));

    builder.build().map_err(fail)
}

fn required_scalar(node: &KdlNode, project: &str) -> ConfigResult<String> {
    get_first_scalar_arg(node).ok_or_else(|| {
        ConfigError::MissingField(format!("{} for project '{}'", key(node), project))
    })
}

fn seconds(node: &KdlNode, project: &str) -> ConfigResult<i64> {
    let raw = required_scalar(node, project)?;
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: format!("{} for project '{}'", key(node), project),
        message: format!("expected a number of seconds, got {:?}", raw),
    })
}
