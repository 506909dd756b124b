//! Failure notification by email.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::BuilderName;

/// Which build results trigger a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    All,
    #[default]
    Failing,
    Problem,
}

/// An email notifier installed on the master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailNotifier {
    pub builder_names: Vec<BuilderName>,
    pub from: String,
    pub extra_recipients: Vec<String>,
    pub relay_host: String,
    pub mode: NotifyMode,
    pub add_logs: bool,
    pub send_to_interested_users: bool,
}

/// Parameters for a mail notifier.
#[derive(Debug, Clone)]
pub struct NotifierRequest {
    pub builder_names: Vec<BuilderName>,
    pub from: String,
    pub recipients: Vec<String>,
    pub relay_host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    #[error("invalid email address: {0:?}")]
    InvalidAddress(String),

    #[error("notifier needs at least one builder")]
    NoBuilders,
}

/// Builds notifiers; may reject malformed requests.
pub trait NotifierService {
    fn mail_notifier(&self, request: NotifierRequest) -> Result<MailNotifier, NotifierError>;
}

impl<T: NotifierService + ?Sized> NotifierService for &T {
    fn mail_notifier(&self, request: NotifierRequest) -> Result<MailNotifier, NotifierError> {
        (**self).mail_notifier(request)
    }
}

static ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s<>]+@[^@\s<>]+$").unwrap());

/// Notifier service for an SMTP relay: failing builds only, logs attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpNotifierService;

impl NotifierService for SmtpNotifierService {
    fn mail_notifier(&self, request: NotifierRequest) -> Result<MailNotifier, NotifierError> {
        if request.builder_names.is_empty() {
            return Err(NotifierError::NoBuilders);
        }
        for address in std::iter::once(&request.from).chain(&request.recipients) {
            if !ADDRESS_REGEX.is_match(address) {
                return Err(NotifierError::InvalidAddress(address.clone()));
            }
        }

        Ok(MailNotifier {
            builder_names: request.builder_names,
            from: request.from,
            extra_recipients: request.recipients,
            relay_host: request.relay_host,
            mode: NotifyMode::Failing,
            add_logs: true,
            send_to_interested_users: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: &str, to: &[&str]) -> NotifierRequest {
        NotifierRequest {
            builder_names: vec![BuilderName::new("app", "linux")],
            from: from.to_string(),
            recipients: to.iter().map(|s| s.to_string()).collect(),
            relay_host: "localhost".to_string(),
        }
    }

    #[test]
    fn test_valid_notifier() {
        let notifier = SmtpNotifierService
            .mail_notifier(request("ci@example.com", &["dev@example.com", "qa@example.com"]))
            .unwrap();
        assert_eq!(notifier.mode, NotifyMode::Failing);
        assert!(notifier.add_logs);
        assert_eq!(notifier.extra_recipients.len(), 2);
    }

    #[test]
    fn test_malformed_address_rejected() {
        let err = SmtpNotifierService
            .mail_notifier(request("ci@example.com", &["not-an-address"]))
            .unwrap_err();
        assert_eq!(err, NotifierError::InvalidAddress("not-an-address".to_string()));
    }
}
