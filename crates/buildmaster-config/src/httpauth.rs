//! Credential store backed by a buildout `.httpauth` file.
//!
//! Each non-blank line holds `realm, url, username, password`. A repository
//! gets the credentials of the first line whose url is a prefix of the
//! repository URL.

use std::path::{Path, PathBuf};

use buildmaster_core::{CredentialStore, Credentials};

use crate::{ConfigError, ConfigResult};

#[derive(Debug, Clone)]
struct HttpAuthEntry {
    url: String,
    credentials: Credentials,
}

/// Parsed `.httpauth` entries, in file order.
#[derive(Debug, Clone, Default)]
pub struct HttpAuthFile {
    entries: Vec<HttpAuthEntry>,
}

impl HttpAuthFile {
    /// `~/.buildout/.httpauth`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".buildout").join(".httpauth"))
    }

    /// Load entries from `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut entries = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let [_realm, url, username, password] = fields[..] else {
                return Err(ConfigError::InvalidValue {
                    field: format!(".httpauth line {}", lineno + 1),
                    message: format!("expected 4 comma-separated fields, got {}", fields.len()),
                });
            };
            entries.push(HttpAuthEntry {
                url: url.to_string(),
                credentials: Credentials::new(username, password),
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialStore for HttpAuthFile {
    fn credentials_for(&self, repository: &str) -> Option<Credentials> {
        self.entries
            .iter()
            .find(|e| repository.starts_with(&e.url))
            .map(|e| e.credentials.clone())
    }
}
