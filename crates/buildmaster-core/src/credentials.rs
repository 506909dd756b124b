//! Repository credential lookup.

use serde::{Deserialize, Serialize};

/// Basic-auth credentials for a repository.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    /// Masked in `Debug` output only.
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Trait for credential backends.
///
/// Queried once per project, with the project's repository URL, while the
/// project configuration is being built.
pub trait CredentialStore {
    /// Credentials for `repository`, or `None` when the store has no entry.
    fn credentials_for(&self, repository: &str) -> Option<Credentials>;
}

/// A store that never has credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn credentials_for(&self, _repository: &str) -> Option<Credentials> {
        None
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn credentials_for(&self, repository: &str) -> Option<Credentials> {
        (**self).credentials_for(repository)
    }
}
