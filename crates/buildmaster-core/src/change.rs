//! Change events and the path filter used by dependency watches.

use serde::{Deserialize, Serialize};

/// A change reported by a VCS poller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    /// Paths touched by the change.
    pub files: Vec<String>,
}

impl Change {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decides whether a change is relevant to a dependency watch.
///
/// A change is important when any touched path contains any of the
/// configured fragments as a substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    fragments: Vec<String>,
}

impl ChangeFilter {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_important(&self, change: &Change) -> bool {
        self.matches(change.files.iter().map(String::as_str))
    }

    pub fn matches<'a>(&self, files: impl IntoIterator<Item = &'a str>) -> bool {
        files
            .into_iter()
            .any(|file| self.fragments.iter().any(|frag| file.contains(frag.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_substring_match() {
        let filter = ChangeFilter::new(["collective.foo", "plone.app"]);
        let change = Change::new(["src/collective.foo/setup.py", "README.txt"]);
        assert!(filter.is_important(&change));
    }

    #[test]
    fn test_unrelated_change_is_ignored() {
        let filter = ChangeFilter::new(["collective.foo"]);
        let change = Change::new(["src/collective.bar/setup.py"]);
        assert!(!filter.is_important(&change));
    }

    #[test]
    fn test_empty_inputs_never_match() {
        assert!(!ChangeFilter::new(Vec::<String>::new()).is_important(&Change::new(["a"])));
        assert!(!ChangeFilter::new(["a"]).is_important(&Change::default()));
    }
}
